//! Invoice field extraction module.

mod parser;

pub use parser::XbrlInvoiceParser;

use crate::error::MetadataError;
use crate::models::invoice::InvoiceInfo;
use crate::pdf::XbrlExtractor;

/// Result type for metadata operations.
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Trait for invoice metadata parsers.
pub trait InvoiceParser {
    /// Parse invoice fields from an XBRL fragment.
    fn parse(&self, xbrl: &[u8]) -> Result<InvoiceInfo>;
}

/// Locate the XBRL fragment in a PDF buffer and parse its invoice fields.
pub fn extract_invoice_info(pdf: &[u8]) -> crate::Result<InvoiceInfo> {
    let xbrl = XbrlExtractor::new().extract(pdf)?;
    Ok(XbrlInvoiceParser::new().parse(&xbrl)?)
}
