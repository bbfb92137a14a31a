//! XBRL fragment extraction composed from ordered strategies.

use std::borrow::Cow;

use tracing::{debug, trace};

use super::decode::inflate;
use super::locator::EmbeddedFileLocator;
use super::scan::find;
use super::{Result, Span, XbrlStrategy};
use crate::error::PdfError;

const XBRL_START: &[u8] = b"<xbrl";
const XBRL_END: &[u8] = b"</xbrl>";

/// Span of the first `<xbrl` … `</xbrl>` region, end tag included.
pub fn find_plain_xbrl(data: &[u8]) -> Option<Span> {
    let start = find(data, XBRL_START, 0)?;
    let end = find(data, XBRL_END, start)? + XBRL_END.len();
    Some(Span::new(start, end))
}

/// Literal XBRL stored uncompressed in the file.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextStrategy;

impl XbrlStrategy for PlainTextStrategy {
    fn name(&self) -> &'static str {
        "plain-text"
    }

    fn extract<'a>(&self, pdf: &'a [u8]) -> Result<Option<Cow<'a, [u8]>>> {
        Ok(find_plain_xbrl(pdf).map(|span| Cow::Borrowed(span.slice(pdf))))
    }
}

/// XBRL inside a compressed `/Type /EmbeddedFile` stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedFileStrategy;

impl EmbeddedFileStrategy {
    fn extract_at(locator: &EmbeddedFileLocator<'_>, pdf: &[u8], type_pos: usize) -> Result<Vec<u8>> {
        let span = locator.payload(type_pos)?;
        let mut raw = inflate(span.slice(pdf))?;
        let xbrl = find_plain_xbrl(&raw).ok_or(PdfError::NoEmbeddedXbrl)?;
        raw.truncate(xbrl.end);
        raw.drain(..xbrl.start);
        Ok(raw)
    }
}

impl XbrlStrategy for EmbeddedFileStrategy {
    fn name(&self) -> &'static str {
        "embedded-file"
    }

    fn extract<'a>(&self, pdf: &'a [u8]) -> Result<Option<Cow<'a, [u8]>>> {
        let locator = EmbeddedFileLocator::new(pdf);
        let candidates = locator.candidates();
        if candidates.is_empty() {
            return Ok(None);
        }
        debug!("Found {} EmbeddedFile candidate(s)", candidates.len());

        let mut first_err = None;
        for type_pos in candidates {
            match Self::extract_at(&locator, pdf, type_pos) {
                Ok(xbrl) => return Ok(Some(Cow::Owned(xbrl))),
                Err(e) => {
                    trace!("EmbeddedFile candidate at {type_pos} rejected: {e}");
                    first_err.get_or_insert(e);
                }
            }
        }
        Err(first_err.unwrap_or(PdfError::NoEmbeddedXbrl))
    }
}

/// Tries each strategy in order and keeps the first fragment found.
pub struct XbrlExtractor {
    strategies: Vec<Box<dyn XbrlStrategy + Send + Sync>>,
}

impl XbrlExtractor {
    /// Plain-text search first, embedded-file streams second.
    pub fn new() -> Self {
        Self {
            strategies: vec![Box::new(PlainTextStrategy), Box::new(EmbeddedFileStrategy)],
        }
    }

    /// Extract the XBRL fragment from a PDF buffer.
    ///
    /// Fails with the first strategy error when every strategy failed, or with
    /// [`PdfError::NoXbrl`] when no strategy applied at all.
    pub fn extract<'a>(&self, pdf: &'a [u8]) -> Result<Cow<'a, [u8]>> {
        let mut first_err = None;
        for strategy in &self.strategies {
            match strategy.extract(pdf) {
                Ok(Some(xbrl)) => {
                    debug!("XBRL found by {} strategy ({} bytes)", strategy.name(), xbrl.len());
                    return Ok(xbrl);
                }
                Ok(None) => trace!("{} strategy found nothing", strategy.name()),
                Err(e) => {
                    trace!("{} strategy failed: {e}", strategy.name());
                    first_err.get_or_insert(e);
                }
            }
        }
        Err(first_err.unwrap_or(PdfError::NoXbrl))
    }
}

impl Default for XbrlExtractor {
    fn default() -> Self {
        Self::new()
    }
}
