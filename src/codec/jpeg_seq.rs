//! Formats 31 and 42: delay-prefixed JPEG frame sequences.
//!
//! The payload is `[u16 LE delay][JPEG SOI..EOI]` repeated until it is
//! exhausted; format 42 wraps the whole sequence in one Zstandard stream
//! first. The JPEG payloads are used as-is, never recompressed.

use crate::bean::{uniform_speed, PixelBean};
use crate::error::DecodeError;
use crate::transform::zstd;

use super::grid_for;

const SOI: [u8; 2] = [0xFF, 0xD8];
const EOI: [u8; 2] = [0xFF, 0xD9];

/// Format 31.
pub(super) fn decode(body: &[u8]) -> Result<PixelBean, DecodeError> {
    decode_sequence(body)
}

/// Format 42: Zstd first, then the format-31 layout.
pub(super) fn decode_zstd(body: &[u8]) -> Result<PixelBean, DecodeError> {
    decode_sequence(&zstd::decompress(body)?)
}

fn decode_sequence(data: &[u8]) -> Result<PixelBean, DecodeError> {
    let mut frames = Vec::new();
    let mut delays = Vec::new();
    let mut dims: Option<(u32, u32)> = None;
    let mut pos = 0usize;

    while data.len() - pos >= 4 {
        let delay = u16::from_le_bytes([data[pos], data[pos + 1]]);
        pos += 2;
        if data[pos..pos + 2] != SOI {
            return Err(DecodeError::EmbeddedDecode(format!(
                "expected JPEG SOI marker at offset {pos}"
            )));
        }
        let end = find_marker(data, pos + 2, EOI).ok_or_else(|| {
            DecodeError::EmbeddedDecode("JPEG frame is missing its EOI marker".into())
        })?;
        let (rgb, w, h) = decode_jpeg(&data[pos..end + 2])?;
        match dims {
            None => dims = Some((w, h)),
            Some((want_w, want_h)) if (want_w, want_h) != (w, h) => {
                return Err(DecodeError::DimensionMismatch {
                    want_w,
                    want_h,
                    got_w: w,
                    got_h: h,
                });
            }
            Some(_) => {}
        }
        frames.push(rgb);
        delays.push(delay as u32);
        pos = end + 2;
    }

    let (w, h) = dims.ok_or_else(|| {
        DecodeError::EmbeddedDecode("payload holds no JPEG frames".into())
    })?;
    let (rows, cols) = grid_for(w, h)?;
    let speed = uniform_speed(&delays);
    PixelBean::new(rows, cols, speed, frames)
}

fn find_marker(data: &[u8], from: usize, marker: [u8; 2]) -> Option<usize> {
    data.get(from..)?
        .windows(2)
        .position(|w| w == marker)
        .map(|i| from + i)
}

fn decode_jpeg(bytes: &[u8]) -> Result<(Vec<u8>, u32, u32), DecodeError> {
    let mut decoder = jpeg_decoder::Decoder::new(std::io::Cursor::new(bytes));
    let pixels = decoder
        .decode()
        .map_err(|e| DecodeError::EmbeddedDecode(format!("jpeg: {e}")))?;
    let info = decoder
        .info()
        .ok_or_else(|| DecodeError::EmbeddedDecode("jpeg: frame info missing".into()))?;
    let width = info.width as u32;
    let height = info.height as u32;
    let rgb = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels,
        jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&p| [p, p, p]).collect(),
        other => {
            return Err(DecodeError::EmbeddedDecode(format!(
                "jpeg: unsupported pixel format {other:?}"
            )))
        }
    };
    Ok((rgb, width, height))
}
