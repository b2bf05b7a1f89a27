//! Crash-safe file replacement.

use std::io::{self, Write};
use std::path::Path;

/// Replace `path` with `contents` by writing a sibling temp file and
/// renaming it over the target. Readers see either the old or the new
/// contents, never a truncated file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    // Dot-prefixed and extension-less so directory scans never pick it up.
    let mut tmp = tempfile::Builder::new()
        .prefix(".legado-")
        .tempfile_in(dir)?;
    tmp.write_all(contents)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
