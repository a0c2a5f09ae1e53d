//! Palette-bitstream frame streams (formats 9, 17 and 18).
//!
//! All palette formats share one plaintext layout: a sequence of frame
//! blocks, each opening with a 5-byte header (subtype flags, a little-endian
//! u16 total size counted from the header's first byte, and a little-endian
//! u16 delay in milliseconds), followed by an optional palette block and the
//! packed index bitstream. The formats differ only in which transforms
//! produce the plaintext and in the fixed canvas size the tag implies.

use log::trace;

use crate::bean::{uniform_speed, PixelBean};
use crate::bitstream::{bits_for, BitReader};
use crate::error::DecodeError;
use crate::palette::RollingPalette;
use crate::slice_reader::SliceReader;
use crate::transform::{aes, lzo};

pub(crate) const FRAME_HEADER_LEN: usize = 5;

/// Format 17: the payload already is the plaintext frame stream. 16×16.
pub(super) fn decode_plain(body: &[u8]) -> Result<PixelBean, DecodeError> {
    decode_stream(body, 1, 1)
}

/// Format 9: AES-CBC ciphertext of the frame stream. 16×16.
pub(super) fn decode_encrypted(body: &[u8]) -> Result<PixelBean, DecodeError> {
    decode_stream(&aes::decrypt(body)?, 1, 1)
}

/// Format 18: a u32 BE uncompressed length, then AES-CBC over one LZO1X-1
/// stream holding the frame stream. 32×32.
pub(super) fn decode_compressed(body: &[u8]) -> Result<PixelBean, DecodeError> {
    let mut reader = SliceReader::new(body);
    let expected = reader.read_u32_be()? as usize;
    let plain = lzo::decompress(&aes::decrypt(reader.remaining_slice())?, expected)?;
    decode_stream(&plain, 2, 2)
}

fn decode_stream(plaintext: &[u8], rows: u8, cols: u8) -> Result<PixelBean, DecodeError> {
    let width = cols as usize * 16;
    let height = rows as usize * 16;
    let mut frames = Vec::new();
    let mut delays = Vec::new();
    walk_frames(plaintext, |index, delay_ms, palette, payload| {
        trace!(
            "frame {index}: {delay_ms} ms, palette {} entries, {} payload bytes",
            palette.len(),
            payload.len()
        );
        frames.push(decode_flat_frame(payload, palette, width, height));
        delays.push(delay_ms as u32);
        Ok(())
    })?;
    let speed = uniform_speed(&delays);
    PixelBean::new(rows, cols, speed, frames)
}

/// Walk the frame blocks of a plaintext stream, maintaining the rolling
/// palette, and hand each frame's delay, palette and payload to `on_frame`.
///
/// Termination per the stream state machine: at most one trailing byte is
/// tolerated; two to four leftover bytes cannot hold a header and are a
/// [`DecodeError::BitstreamOverrun`]; a zero size field reads as block-cipher
/// padding and ends the stream.
pub(crate) fn walk_frames<'a, F>(plaintext: &'a [u8], mut on_frame: F) -> Result<(), DecodeError>
where
    F: FnMut(usize, u16, &RollingPalette, &'a [u8]) -> Result<(), DecodeError>,
{
    let mut palette = RollingPalette::new();
    let mut pos = 0usize;
    let mut index = 0usize;
    loop {
        // A frame may legally overhang the plaintext by one byte, leaving
        // the cursor just past the end.
        let remaining = plaintext.len().saturating_sub(pos);
        if remaining <= 1 {
            break;
        }
        if remaining < FRAME_HEADER_LEN {
            return Err(DecodeError::BitstreamOverrun);
        }
        let subtype = plaintext[pos];
        let size = u16::from_le_bytes([plaintext[pos + 1], plaintext[pos + 2]]) as usize;
        let delay_ms = u16::from_le_bytes([plaintext[pos + 3], plaintext[pos + 4]]);
        if size == 0 {
            break;
        }
        if size < FRAME_HEADER_LEN || size > remaining + 1 {
            return Err(DecodeError::TruncatedFrame {
                declared: size,
                remaining,
            });
        }
        let frame_end = (pos + size).min(plaintext.len());
        let mut body = &plaintext[pos + FRAME_HEADER_LEN..frame_end];

        // The first frame always carries a full palette; later frames carry
        // an appended delta only when subtype bit 0 is set.
        if index == 0 || subtype & 0x01 != 0 {
            let (&count, rest) = body.split_first().ok_or(DecodeError::TruncatedFrame {
                declared: size,
                remaining,
            })?;
            let raw_len = count as usize * 3;
            if rest.len() < raw_len {
                return Err(DecodeError::TruncatedFrame {
                    declared: size,
                    remaining,
                });
            }
            if index == 0 {
                palette.clear();
            }
            palette.extend_from_rgb(&rest[..raw_len])?;
            body = &rest[raw_len..];
        }

        on_frame(index, delay_ms, &palette, body)?;
        pos += size;
        index += 1;
    }
    if index == 0 {
        return Err(DecodeError::TruncatedFrame {
            declared: FRAME_HEADER_LEN,
            remaining: plaintext.len(),
        });
    }
    Ok(())
}

/// Decode a flat packed bitstream: one index per pixel in raster order, at
/// the bit width the palette size dictates. Short bitstreams read as zero
/// indices; stale indices resolve to palette entry 0.
fn decode_flat_frame(
    payload: &[u8],
    palette: &RollingPalette,
    width: usize,
    height: usize,
) -> Vec<u8> {
    let bits = bits_for(palette.len());
    let mut reader = BitReader::new(payload);
    let mut rgb = Vec::with_capacity(width * height * 3);
    for _ in 0..width * height {
        let idx = reader.read_bits(bits) as usize;
        rgb.extend_from_slice(&palette.get(idx));
    }
    rgb
}
