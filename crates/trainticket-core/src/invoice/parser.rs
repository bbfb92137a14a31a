//! Streaming XBRL parser for the four invoice fields used in file names.

use std::borrow::Cow;

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::{debug, trace};

use super::{InvoiceParser, Result};
use crate::error::MetadataError;
use crate::models::invoice::InvoiceInfo;

/// Reads `TravelDate`, `DateOfIssue`, `DepartureStation` and
/// `DestinationStation` regardless of namespace prefix.
#[derive(Debug, Default, Clone, Copy)]
pub struct XbrlInvoiceParser;

impl XbrlInvoiceParser {
    pub fn new() -> Self {
        Self
    }
}

impl InvoiceParser for XbrlInvoiceParser {
    fn parse(&self, xbrl: &[u8]) -> Result<InvoiceInfo> {
        let mut reader = Reader::from_reader(xbrl);
        let mut info = InvoiceInfo::default();
        let mut depth = 0usize;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| parse_error(&e, reader.buffer_position()))?;
            match event {
                Event::Start(start) => {
                    let local = start.local_name();
                    let field = field_name(local.as_ref());
                    let Some(field) = field else {
                        depth += 1;
                        continue;
                    };

                    let text = read_element_text(&mut reader, field)?;
                    let text = text.trim();
                    if let Some(slot) = info.slot_mut(local.as_ref()) {
                        if slot.is_none() && !text.is_empty() {
                            trace!("{field} = {text:?}");
                            *slot = Some(text.to_string());
                        }
                    }
                }
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Eof => {
                    if depth > 0 {
                        return Err(MetadataError::Parse("unexpected end of XML".to_string()));
                    }
                    break;
                }
                _ => {}
            }
        }

        if !info.is_usable() {
            debug!("XBRL lacks required fields: {info:?}");
            return Err(MetadataError::MissingRequiredField);
        }
        Ok(info)
    }
}

fn field_name(local: &[u8]) -> Option<&'static str> {
    match local {
        b"TravelDate" => Some("TravelDate"),
        b"DateOfIssue" => Some("DateOfIssue"),
        b"DepartureStation" => Some("DepartureStation"),
        b"DestinationStation" => Some("DestinationStation"),
        _ => None,
    }
}

/// Collect the direct character data of the element just opened, consuming
/// events up to its matching end tag. Nested elements are skipped.
fn read_element_text<'a>(reader: &mut Reader<&'a [u8]>, field: &'static str) -> Result<String> {
    let field_err = |reason: String| MetadataError::Field { field, reason };
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| field_err(e.to_string()))?;
        match event {
            Event::Text(t) if depth == 0 => {
                let chunk: Cow<'_, str> = t.unescape().map_err(|e| field_err(e.to_string()))?;
                text.push_str(&chunk);
            }
            Event::CData(c) if depth == 0 => {
                let chunk = std::str::from_utf8(&c).map_err(|e| field_err(e.to_string()))?;
                text.push_str(chunk);
            }
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => return Ok(text),
            Event::End(_) => depth -= 1,
            Event::Eof => return Err(field_err("unexpected end of XML".to_string())),
            _ => {}
        }
    }
}

fn parse_error(err: &quick_xml::Error, position: impl std::fmt::Display) -> MetadataError {
    MetadataError::Parse(format!("{err} at byte {position}"))
}
