//! Primitive scanning routines over a raw PDF byte buffer.
//!
//! All functions work on offsets into a borrowed buffer and never copy.
//! Out-of-range offsets are clamped to the buffer length.

/// PDF white-space characters (ISO 32000-1, table 1).
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, 0x00 | 0x09 | 0x0A | 0x0C | 0x0D | 0x20)
}

/// White-space or one of the PDF delimiter characters.
pub fn is_delimiter(b: u8) -> bool {
    is_whitespace(b)
        || matches!(b, b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%')
}

/// Skip PDF white-space starting at `pos`.
pub fn skip_whitespace(data: &[u8], mut pos: usize) -> usize {
    while pos < data.len() && is_whitespace(data[pos]) {
        pos += 1;
    }
    pos
}

/// Skip spaces and tabs only (never line breaks).
pub fn skip_inline_whitespace(data: &[u8], mut pos: usize) -> usize {
    while pos < data.len() && matches!(data[pos], b' ' | b'\t') {
        pos += 1;
    }
    pos
}

/// Parse an unsigned decimal integer at `pos`.
///
/// Returns the value and the offset just past the last digit, or `None` when
/// `pos` does not start with a digit or the value overflows.
pub fn parse_uint_at(data: &[u8], pos: usize) -> Option<(usize, usize)> {
    let mut i = pos;
    let mut value: usize = 0;
    while i < data.len() && data[i].is_ascii_digit() {
        value = value
            .checked_mul(10)?
            .checked_add(usize::from(data[i] - b'0'))?;
        i += 1;
    }
    (i > pos).then_some((value, i))
}

/// First occurrence of `needle` at or after `from`.
pub fn find(data: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= data.len() {
        return None;
    }
    data[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| from + i)
}

/// Last occurrence of `needle` that ends at or before `end`.
pub fn rfind(data: &[u8], needle: &[u8], end: usize) -> Option<usize> {
    let end = end.min(data.len());
    if needle.is_empty() || needle.len() > end {
        return None;
    }
    data[..end].windows(needle.len()).rposition(|w| w == needle)
}

/// `kw` occurs at `pos` and is bounded by delimiters (or buffer edges) on both sides.
pub fn is_keyword_at(data: &[u8], pos: usize, kw: &[u8]) -> bool {
    let end = pos + kw.len();
    if end > data.len() || &data[pos..end] != kw {
        return false;
    }
    if pos > 0 && !is_delimiter(data[pos - 1]) {
        return false;
    }
    end == data.len() || is_delimiter(data[end])
}

/// First occurrence of the name key `key` (e.g. `/Length`) that is not a prefix
/// of a longer name.
pub fn find_name_key(data: &[u8], key: &[u8]) -> Option<usize> {
    let mut from = 0;
    while let Some(pos) = find(data, key, from) {
        let end = pos + key.len();
        if end == data.len() || is_delimiter(data[end]) {
            return Some(pos);
        }
        from = end;
    }
    None
}

/// End offset of a PDF name whose body starts at `pos` (just after the `/`).
pub fn read_name_end(data: &[u8], mut pos: usize) -> usize {
    while pos < data.len() && !is_delimiter(data[pos]) {
        pos += 1;
    }
    pos
}

/// Offset of the first byte of the line containing `before - 1`.
pub fn find_line_start(data: &[u8], before: usize) -> usize {
    let before = before.min(data.len());
    data[..before]
        .iter()
        .rposition(|&b| b == b'\n' || b == b'\r')
        .map_or(0, |i| i + 1)
}

/// Trim PDF white-space from both ends of a slice.
pub fn trim(data: &[u8]) -> &[u8] {
    let start = skip_whitespace(data, 0);
    let mut end = data.len();
    while end > start && is_whitespace(data[end - 1]) {
        end -= 1;
    }
    &data[start..end]
}
