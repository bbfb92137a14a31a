//! Core library for renaming railway e-invoice PDFs.
//!
//! This crate provides:
//! - XBRL extraction from PDFs, stored either as plain text or inside a
//!   compressed `/Type /EmbeddedFile` stream
//! - Parsing of travel date, date of issue and the two station names
//! - Output naming as `{YYYY-MM-DD}-{departure}-{destination}.pdf`
//! - Recursive traversal of directories and (nested) ZIP archives with
//!   deduplication by file name

pub mod error;
pub mod invoice;
pub mod models;
pub mod naming;
pub mod pdf;
pub mod processor;

pub use error::{ConfigError, Error, MetadataError, NamingError, PdfError, Result};
pub use invoice::{InvoiceParser, XbrlInvoiceParser, extract_invoice_info};
pub use models::config::{RunConfig, Settings};
pub use models::invoice::{DateField, InvoiceInfo, RunSummary};
pub use naming::output_file_name;
pub use pdf::{XbrlExtractor, XbrlStrategy};
pub use processor::{InputKind, run};
