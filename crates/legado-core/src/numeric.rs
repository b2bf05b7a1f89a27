use std::cmp::Ordering;

/// Round to `places` decimal places, ties to even.
///
/// Rounds the exact binary value of `value`, not the already-rounded scaled
/// product: 0.15 is stored just below 0.15 and goes to 0.1, while 1013.25 is
/// an exact tie and goes to 1013.2. The result is the f64 closest to the
/// decimal (e.g. 2.06 → 2.1, 421.37 → 421.4) and serialises without trailing
/// noise.
#[inline]
pub fn round_dp(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    let scaled = value * scale;
    if !scaled.is_finite() || scaled.abs() >= 2f64.powi(52) {
        return value;
    }
    // value * scale == scaled + residual, exactly.
    let residual = value.mul_add(scale, -scaled);
    let floor = scaled.floor();
    let rounded = match (scaled - floor).partial_cmp(&0.5) {
        Some(Ordering::Less) => floor,
        Some(Ordering::Greater) => floor + 1.0,
        _ if residual > 0.0 => floor + 1.0,
        _ if residual < 0.0 => floor,
        _ if floor % 2.0 == 0.0 => floor,
        _ => floor + 1.0,
    };
    rounded / scale
}
