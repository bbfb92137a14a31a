//! Raw-byte location of `/Type /EmbeddedFile` stream payloads.
//!
//! No cross-reference table is consulted. Each declaration is tied to its
//! enclosing object by scanning backward for the nearest `N G obj` header
//! line and forward for the next `stream` keyword; the dictionary between
//! the two supplies `/Length`.

use std::fmt;

use tracing::trace;

use super::scan::{
    find, find_line_start, find_name_key, is_keyword_at, is_whitespace, parse_uint_at, read_name_end,
    rfind, skip_inline_whitespace, skip_whitespace, trim,
};
use super::{Result, Span};
use crate::error::PdfError;

const KEY_TYPE: &[u8] = b"/Type";
const NAME_EMBEDDED_FILE: &[u8] = b"/EmbeddedFile";
const KEY_LENGTH: &[u8] = b"/Length";
const KEYWORD_STREAM: &[u8] = b"stream";
const TOKEN_OBJ: &[u8] = b" obj";

/// Reference to an indirect object (`num gen R`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRef {
    pub num: u32,
    pub generation: u32,
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} obj", self.num, self.generation)
    }
}

/// Value of a stream's `/Length` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthSpec {
    Direct(usize),
    Indirect(ObjectRef),
}

/// Locates embedded-file payloads inside one PDF buffer.
pub struct EmbeddedFileLocator<'a> {
    data: &'a [u8],
}

impl<'a> EmbeddedFileLocator<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Offsets of every `/Type /EmbeddedFile` declaration, in document order.
    pub fn candidates(&self) -> Vec<usize> {
        let data = self.data;
        let mut positions = Vec::new();
        let mut from = 0;
        while let Some(pos) = find(data, KEY_TYPE, from) {
            let name_start = skip_whitespace(data, pos + KEY_TYPE.len());
            if data.get(name_start) == Some(&b'/') {
                let name_end = read_name_end(data, name_start + 1);
                if &data[name_start..name_end] == NAME_EMBEDDED_FILE {
                    positions.push(pos);
                }
            }
            from = pos + KEY_TYPE.len();
        }
        positions
    }

    /// Byte range of the stream payload belonging to the declaration at `type_pos`.
    pub fn payload(&self, type_pos: usize) -> Result<Span> {
        let content_start = self.object_content_start_before(type_pos)?;
        let (stream_kw, data_start) = self.stream_data_start(type_pos)?;
        if stream_kw <= content_start {
            return Err(PdfError::StreamBeforeHeader);
        }

        let spec = parse_length_spec(&self.data[content_start..stream_kw])?;
        let len = self.resolve_length(spec)?;
        trace!("EmbeddedFile at {type_pos}: {spec:?} -> {len} bytes from {data_start}");

        let end = data_start
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(PdfError::OutOfBounds {
                start: data_start,
                len,
                size: self.data.len(),
            })?;
        Ok(Span::new(data_start, end))
    }

    /// Resolve a length spec, following an indirect reference if needed.
    pub fn resolve_length(&self, spec: LengthSpec) -> Result<usize> {
        match spec {
            LengthSpec::Direct(len) => Ok(len),
            LengthSpec::Indirect(obj) => self.resolve_indirect_uint(obj),
        }
    }

    /// Content start of the nearest `N G obj` header preceding `anchor`.
    fn object_content_start_before(&self, anchor: usize) -> Result<usize> {
        let data = self.data;
        let mut search_end = anchor;
        while search_end > 0 {
            let obj_pos = rfind(data, TOKEN_OBJ, search_end).ok_or(PdfError::MissingObjectHeader)?;
            let line_start = find_line_start(data, obj_pos);
            let header_end = obj_pos + TOKEN_OBJ.len();
            if is_object_header_line(&data[line_start..header_end]) {
                return Ok(skip_whitespace(data, header_end));
            }
            search_end = line_start;
        }
        Err(PdfError::MissingObjectHeader)
    }

    /// Offset of the next `stream` keyword and of the first payload byte.
    fn stream_data_start(&self, from: usize) -> Result<(usize, usize)> {
        let data = self.data;
        let mut pos = from;
        loop {
            let kw = find(data, KEYWORD_STREAM, pos).ok_or(PdfError::MissingStream)?;
            if is_keyword_at(data, kw, KEYWORD_STREAM) {
                let start = payload_start_after(data, kw + KEYWORD_STREAM.len())?;
                return Ok((kw, start));
            }
            pos = kw + 1;
        }
    }

    /// Read the integer body of the object `obj`.
    fn resolve_indirect_uint(&self, obj: ObjectRef) -> Result<usize> {
        let data = self.data;
        let header = obj.to_string();
        let header = header.as_bytes();

        let mut from = 0;
        let header_pos = loop {
            let pos = find(data, header, from).ok_or(PdfError::UnresolvedLength {
                num: obj.num,
                generation: obj.generation,
            })?;
            if is_header_bounded(data, pos, header.len()) {
                break pos;
            }
            from = pos + 1;
        };

        let body = skip_whitespace(data, header_pos + header.len());
        parse_uint_at(data, body)
            .map(|(value, _)| value)
            .ok_or(PdfError::IndirectLengthNotInteger {
                num: obj.num,
                generation: obj.generation,
            })
    }
}

/// After `stream`: optional spaces/tabs, then CRLF, CR or LF.
fn payload_start_after(data: &[u8], after_keyword: usize) -> Result<usize> {
    let pos = skip_inline_whitespace(data, after_keyword);
    match data.get(pos) {
        Some(b'\r') if data.get(pos + 1) == Some(&b'\n') => Ok(pos + 2),
        Some(b'\r') | Some(b'\n') => Ok(pos + 1),
        _ => Err(PdfError::MalformedStreamEol),
    }
}

/// A trimmed line of the form `<int> <int> obj`.
fn is_object_header_line(line: &[u8]) -> bool {
    let line = trim(line);
    let Some(rest) = line.strip_suffix(b"obj") else {
        return false;
    };
    let rest = trim(rest);

    let Some((_, next)) = parse_uint_at(rest, 0) else {
        return false;
    };
    let next = skip_whitespace(rest, next);
    let Some((_, next)) = parse_uint_at(rest, next) else {
        return false;
    };
    skip_whitespace(rest, next) == rest.len()
}

fn is_header_bounded(data: &[u8], pos: usize, len: usize) -> bool {
    let before_ok = pos == 0 || is_whitespace(data[pos - 1]);
    let end = pos + len;
    let after_ok = end == data.len() || is_whitespace(data[end]);
    before_ok && after_ok
}

/// Parse `/Length` from the dictionary bytes between object start and `stream`.
pub fn parse_length_spec(dict: &[u8]) -> Result<LengthSpec> {
    let key = find_name_key(dict, KEY_LENGTH).ok_or(PdfError::MissingLength)?;
    let pos = skip_whitespace(dict, key + KEY_LENGTH.len());
    let (first, next) = parse_uint_at(dict, pos).ok_or(PdfError::InvalidLength)?;

    let gen_pos = skip_whitespace(dict, next);
    if let Some((generation, next)) = parse_uint_at(dict, gen_pos) {
        let r_pos = skip_whitespace(dict, next);
        if dict.get(r_pos) == Some(&b'R') {
            let num = u32::try_from(first).map_err(|_| PdfError::InvalidLength)?;
            let generation = u32::try_from(generation).map_err(|_| PdfError::InvalidLength)?;
            return Ok(LengthSpec::Indirect(ObjectRef { num, generation }));
        }
    }
    Ok(LengthSpec::Direct(first))
}
