//! Response body decompression keyed on the `content-encoding` header.
//!
//! HTTP-level decompression is disabled on the client so the body reaches
//! this module untouched and an encoding we cannot read fails loudly instead
//! of handing compressed bytes to the parser.

use std::io::Read;

use flate2::read::{GzDecoder, ZlibDecoder};

use crate::error::PortalError;

/// Decompresses `raw` according to `content_encoding`.
///
/// The header is matched case-insensitively by substring in the order
/// brotli (`br`), `gzip`, `deflate`, identity. An absent or empty header and
/// `identity` return the body unchanged.
///
/// # Errors
///
/// - [`PortalError::UnsupportedEncoding`] for any other declared encoding.
/// - [`PortalError::Decode`] if the body is malformed for its encoding.
pub fn decompress(raw: Vec<u8>, content_encoding: Option<&str>) -> Result<Vec<u8>, PortalError> {
    let encoding = content_encoding
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if encoding.contains("br") {
        let mut out = Vec::new();
        brotli::Decompressor::new(raw.as_slice(), 4096)
            .read_to_end(&mut out)
            .map_err(|source| PortalError::Decode {
                encoding: "br",
                source,
            })?;
        return Ok(out);
    }

    if encoding.contains("gzip") {
        let mut out = Vec::new();
        GzDecoder::new(raw.as_slice())
            .read_to_end(&mut out)
            .map_err(|source| PortalError::Decode {
                encoding: "gzip",
                source,
            })?;
        return Ok(out);
    }

    if encoding.contains("deflate") {
        let mut out = Vec::new();
        ZlibDecoder::new(raw.as_slice())
            .read_to_end(&mut out)
            .map_err(|source| PortalError::Decode {
                encoding: "deflate",
                source,
            })?;
        return Ok(out);
    }

    if encoding.is_empty() || encoding == "identity" {
        return Ok(raw);
    }

    Err(PortalError::UnsupportedEncoding(encoding))
}
