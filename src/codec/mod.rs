//! Container parsing and per-format frame decoding.
//!
//! The container preamble is a 4-byte big-endian payload length followed by
//! a one-byte format tag. Dispatch is a closed `match` over the seven known
//! tags; each arm is a pure function from the remaining payload to a
//! [`PixelBean`].

mod embedded;
mod frames;
mod jpeg_seq;
mod tiled;

use log::debug;

use crate::bean::PixelBean;
use crate::error::DecodeError;
use crate::slice_reader::SliceReader;

/// Decode a complete pixel-bean container into an animation.
pub fn decode(payload: &[u8]) -> Result<PixelBean, DecodeError> {
    let mut reader = SliceReader::new(payload);
    let declared = reader.read_u32_be()? as usize;
    let available = reader.remaining();
    if declared > available {
        return Err(DecodeError::TruncatedHeader {
            declared,
            available,
        });
    }
    let body = reader.take_slice(declared)?;
    let (&tag, rest) = body
        .split_first()
        .ok_or(DecodeError::TruncatedHeader {
            declared: 1,
            available: 0,
        })?;
    debug!(
        "pixel bean container: format tag {tag}, {} payload bytes",
        rest.len()
    );
    match tag {
        9 => frames::decode_encrypted(rest),
        17 => frames::decode_plain(rest),
        18 => frames::decode_compressed(rest),
        26 => tiled::decode(rest),
        31 => jpeg_seq::decode(rest),
        42 => jpeg_seq::decode_zstd(rest),
        43 => embedded::decode(rest),
        other => Err(DecodeError::UnsupportedFormat(other)),
    }
}

/// Map embedded-image dimensions onto the tile grid.
///
/// Canvases are square with a side of 16, 32, 64, 128 or 256 pixels;
/// anything else cannot be expressed as a pixel-bean animation.
pub(crate) fn grid_for(width: u32, height: u32) -> Result<(u8, u8), DecodeError> {
    if width == height && matches!(width, 16 | 32 | 64 | 128 | 256) {
        Ok(((height / 16) as u8, (width / 16) as u8))
    } else {
        Err(DecodeError::EmbeddedDecode(format!(
            "{width}x{height} is not a supported canvas size"
        )))
    }
}
