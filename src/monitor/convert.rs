//! Unit and value converters.
//!
//! Scale constants here feed long-lived dashboards, so they are fixed:
//! hashrate GHS -> PHS at 1e6 (4 decimal places), network difficulty
//! scaled by 1e12, raw token balances divided by 10^decimals.

/// Round `value` to `places` decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Convert a raw integer balance string into a decimal balance.
///
/// Explorer APIs report balances as base-unit integer strings. Anything
/// that is not a plain non-negative integer (missing, empty, error text)
/// converts to 0.0. Rounded to 8 decimal places.
pub fn to_decimal(raw: Option<&str>, decimals: u32) -> f64 {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => return 0.0,
    };
    match raw.parse::<u128>() {
        Ok(units) => round_to(units as f64 / 10f64.powi(decimals as i32), 8),
        Err(_) => 0.0,
    }
}

/// Scale a gigahash-per-second figure to petahashes, 4 decimal places.
pub fn scale_hashrate(ghs: f64) -> f64 {
    round_to(ghs / 1e6, 4)
}

/// Scale raw network difficulty to terahash terms.
pub fn scale_difficulty(raw: f64) -> f64 {
    raw / 1e12
}
