//! Output file naming: `{YYYY-MM-DD}-{departure}-{destination}.pdf`.

mod dates;
mod sanitize;

pub use dates::{CANONICAL_DATE_FORMAT, normalize_date};
pub use sanitize::sanitize_file_name_part;

use std::path::Path;

use crate::error::NamingError;
use crate::models::invoice::{DateField, InvoiceInfo};

/// Extension of every written file.
pub const PDF_EXTENSION: &str = "pdf";

/// Result type for naming operations.
pub type Result<T> = std::result::Result<T, NamingError>;

/// Build the output file name for an invoice.
///
/// Only the date selected by `field` is used; a missing selection is an
/// error even when the other date is present.
pub fn output_file_name(info: &InvoiceInfo, field: DateField) -> Result<String> {
    let date = normalize_date(info.date(field)?)?;
    let departure = station_part(info.departure_station.as_deref())?;
    let destination = station_part(info.destination_station.as_deref())?;

    let name = format!("{date}-{departure}-{destination}.{PDF_EXTENSION}");
    validate_output_file_name(&name)?;
    Ok(name)
}

fn station_part(station: Option<&str>) -> Result<String> {
    let part = sanitize_file_name_part(station.unwrap_or_default());
    if part.is_empty() {
        return Err(NamingError::EmptyStation);
    }
    Ok(part)
}

/// Reject blank names and names that are not a single path component.
pub fn validate_output_file_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(NamingError::EmptyFileName);
    }
    let single_component = Path::new(name).file_name().is_some_and(|base| base == name);
    if name.contains(['/', '\\']) || !single_component {
        return Err(NamingError::PathSeparator(name.to_string()));
    }
    Ok(())
}
