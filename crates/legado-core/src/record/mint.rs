//! Mint timestamps: a uniform whole-second offset into a fixed window.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use rand::Rng;

use crate::config::ConfigError;

/// Closed interval `[start, end]` of mint instants, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl MintWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, ConfigError> {
        if end < start {
            return Err(ConfigError::Invalid {
                field: "mint_end",
                reason: format!("{end} is before mint_start {start}"),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Whole seconds between start and end.
    pub fn span_seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at <= self.end
    }

    /// Uniform draw over every whole second in the window, both ends included.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> MintedAt {
        let offset = rng.gen_range(0..=self.span_seconds());
        MintedAt((self.start + Duration::seconds(offset)).and_utc())
    }
}

/// One mint instant and its three renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintedAt(DateTime<Utc>);

impl MintedAt {
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// ISO-8601 UTC instant, `2024-07-14T09:30:00Z`.
    pub fn timestamp(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// Calendar day, rendered `2024-07-14`.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Compact day, `240714`.
    pub fn compact_date(&self) -> String {
        self.0.format("%y%m%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn default_window() -> MintWindow {
        MintWindow::new(at("2024-01-01T00:00:00"), at("2025-04-02T23:59:59")).unwrap()
    }

    #[test]
    fn samples_fall_inside_window() {
        let window = default_window();
        let mut rng = StdRng::seed_from_u64(51);
        for _ in 0..10_000 {
            let m = window.sample(&mut rng);
            assert!(window.contains(m.instant().naive_utc()), "{}", m.timestamp());
        }
    }

    /// ✓ All three renderings denote the same instant.
    #[test]
    fn renderings_agree() {
        let window = default_window();
        let mut rng = StdRng::seed_from_u64(52);
        for _ in 0..1_000 {
            let m = window.sample(&mut rng);
            let parsed = NaiveDateTime::parse_from_str(&m.timestamp(), "%Y-%m-%dT%H:%M:%SZ").unwrap();
            assert_eq!(parsed, m.instant().naive_utc());
            assert_eq!(parsed.date(), m.date());
            let compact = NaiveDate::parse_from_str(&format!("20{}", m.compact_date()), "%Y%m%d").unwrap();
            assert_eq!(compact, m.date());
        }
    }

    #[test]
    fn degenerate_window_always_returns_start() {
        let t = at("2024-02-29T12:00:00");
        let window = MintWindow::new(t, t).unwrap();
        let mut rng = StdRng::seed_from_u64(53);
        assert_eq!(window.sample(&mut rng).timestamp(), "2024-02-29T12:00:00Z");
    }

    #[test]
    fn reversed_window_rejected() {
        assert!(MintWindow::new(at("2025-01-01T00:00:00"), at("2024-01-01T00:00:00")).is_err());
    }

    #[test]
    fn renderings_format() {
        let m = MintedAt::from_utc(at("2024-07-04T09:05:03").and_utc());
        assert_eq!(m.timestamp(), "2024-07-04T09:05:03Z");
        assert_eq!(m.date().to_string(), "2024-07-04");
        assert_eq!(m.compact_date(), "240704");
    }
}
