//! Zstandard decompression.
//!
//! A thin, stateless wrapper over the `zstd` crate's streaming decoder. The
//! streaming path decodes concatenated frames transparently, which format 42
//! payloads rely on.

use std::io::Read;

use crate::error::DecodeError;

/// Decompress a complete Zstandard stream (one or more frames).
pub(crate) fn decompress(src: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut decoder = zstd::stream::read::Decoder::new(src)
        .map_err(|e| DecodeError::ZstdDecodeFailed(e.to_string()))?;
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| DecodeError::ZstdDecodeFailed(e.to_string()))?;
    Ok(out)
}
