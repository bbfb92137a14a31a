//! Date normalization for output file names.

use chrono::NaiveDate;

use crate::error::NamingError;

/// Canonical output layout.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Accepted input layouts, tried in order: chrono format and exact shape
/// (`d` = ASCII digit, anything else must match literally).
const INPUT_LAYOUTS: &[(&str, &str)] = &[
    ("%Y-%m-%d", "dddd-dd-dd"),
    ("%Y/%m/%d", "dddd/dd/dd"),
    ("%Y%m%d", "dddddddd"),
];

/// Normalize `YYYY-MM-DD`, `YYYY/MM/DD` or `YYYYMMDD` to `YYYY-MM-DD`.
pub fn normalize_date(input: &str) -> Result<String, NamingError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(NamingError::EmptyDate);
    }

    INPUT_LAYOUTS
        .iter()
        .filter(|(_, shape)| has_shape(s, shape))
        .find_map(|(format, _)| NaiveDate::parse_from_str(s, format).ok())
        .map(|date| date.format(CANONICAL_DATE_FORMAT).to_string())
        .ok_or_else(|| NamingError::UnparseableDate(input.to_string()))
}

fn has_shape(s: &str, shape: &str) -> bool {
    s.len() == shape.len()
        && s.bytes().zip(shape.bytes()).all(|(c, p)| match p {
            b'd' => c.is_ascii_digit(),
            _ => c == p,
        })
}
