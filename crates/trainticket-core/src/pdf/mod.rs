//! PDF processing module.
//!
//! XBRL is located by scanning raw bytes; there is no general PDF object model.

mod decode;
mod extractor;
mod locator;
pub mod scan;

pub use decode::inflate;
pub use extractor::{EmbeddedFileStrategy, PlainTextStrategy, XbrlExtractor, find_plain_xbrl};
pub use locator::{EmbeddedFileLocator, LengthSpec, ObjectRef, parse_length_spec};

use std::borrow::Cow;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Half-open byte range into a PDF buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Borrow the bytes this span covers.
    pub fn slice<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.start..self.end]
    }
}

/// One way of pulling an XBRL fragment out of a PDF.
pub trait XbrlStrategy {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// `Ok(None)` when this strategy does not apply to the document;
    /// `Err` when it applies but failed.
    fn extract<'a>(&self, pdf: &'a [u8]) -> Result<Option<Cow<'a, [u8]>>>;
}
