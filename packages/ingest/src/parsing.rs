//! Field parsing for the incident export.
//!
//! The export has been through spreadsheet software, so dates show up in
//! several layouts and numbers may carry currency symbols or thousands
//! separators.

use chrono::{NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parses a flight date. Date-only values are placed at midnight.
#[must_use]
pub fn parse_flight_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Whether a cleaned cell means "no value": blank, or the `NaN` marker
/// spreadsheet exports write for empty numeric cells.
fn is_missing(cleaned: &str) -> bool {
    cleaned.is_empty() || cleaned.eq_ignore_ascii_case("nan")
}

/// Parses a dollar amount such as `"$1,250.50"`. Blank and `NaN` cells
/// are `None`.
///
/// # Errors
///
/// Returns a message if the value is not a finite number.
pub fn parse_cost(s: &str) -> Result<Option<f64>, String> {
    let cleaned: String = s.trim().chars().filter(|c| !matches!(c, '$' | ',')).collect();
    if is_missing(&cleaned) {
        return Ok(None);
    }
    let value = cleaned
        .parse::<f64>()
        .map_err(|e| format!("not a number: {e}"))?;
    if !value.is_finite() {
        return Err(format!("expected a finite amount, got {cleaned}"));
    }
    Ok(Some(value))
}

/// Parses a non-negative whole count. Accepts `"3"` as well as the
/// `"3.0"` that spreadsheet exports tend to produce. Blank and `NaN`
/// cells are `None`.
///
/// # Errors
///
/// Returns a message if the value is negative, fractional, or not a
/// number.
pub fn parse_count(s: &str) -> Result<Option<u32>, String> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    if is_missing(&cleaned) {
        return Ok(None);
    }
    if let Ok(n) = cleaned.parse::<u32>() {
        return Ok(Some(n));
    }
    let value = cleaned
        .parse::<f64>()
        .map_err(|e| format!("not a number: {e}"))?;
    if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(format!("expected a whole non-negative count, got {value}"));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(Some(value as u32))
}
