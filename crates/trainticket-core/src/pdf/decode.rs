//! Decompression of embedded-file stream payloads.

use std::io::Read;

use flate2::read::{DeflateDecoder, ZlibDecoder};
use tracing::trace;

use super::Result;
use crate::error::PdfError;

/// Inflate a FlateDecode payload.
///
/// Tries a zlib-wrapped stream first and a raw deflate stream second. When both
/// fail, the raw deflate error is reported; zlib errors are routine for raw
/// deflate payloads and say little.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match ZlibDecoder::new(data).read_to_end(&mut out) {
        Ok(_) => return Ok(out),
        Err(zlib_err) => trace!("zlib decode failed ({zlib_err}), retrying as raw deflate"),
    }

    out.clear();
    DeflateDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| PdfError::Decompress(e.to_string()))?;
    Ok(out)
}
