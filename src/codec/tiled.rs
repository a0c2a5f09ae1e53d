//! Format 26: hierarchical tile frames at 64×64 or 128×128.
//!
//! Each frame payload is one block covering the whole canvas. A block opens
//! with a one-byte mode: literal (packed indices over the inherited palette
//! map), subset (a bitmap narrows the map before the packed indices), or
//! recurse (the bitmap narrows the map for four half-size children). Leaves
//! are 8×8; recursing below that is malformed, as is any unknown mode byte.
//!
//! Pixels inside a literal or subset block are laid out as 8×8 subtiles in
//! row-major subtile order, each subtile itself row-major. Every block's
//! bitstream is padded to a byte boundary.

use crate::bean::{uniform_speed, PixelBean};
use crate::bitstream::{bits_for, BitReader};
use crate::error::DecodeError;
use crate::palette::RollingPalette;
use crate::slice_reader::SliceReader;
use crate::transform::{aes, lzo};

use super::frames::walk_frames;

const MODE_LITERAL: u8 = 0x00;
const MODE_RECURSE: u8 = 0x01;
const MODE_SUBSET: u8 = 0x02;
const LEAF_SIZE: usize = 8;

/// Preamble: rows, cols, u32 BE uncompressed length; body is AES-CBC over
/// one LZO1X-1 stream of the tiled frame stream.
pub(super) fn decode(body: &[u8]) -> Result<PixelBean, DecodeError> {
    let mut reader = SliceReader::new(body);
    let rows = reader.read_u8()?;
    let cols = reader.read_u8()?;
    if rows != cols || !(rows == 4 || rows == 8) {
        return Err(DecodeError::MalformedTree(format!(
            "unsupported tile grid {rows}x{cols}"
        )));
    }
    let expected = reader.read_u32_be()? as usize;
    let plain = lzo::decompress(&aes::decrypt(reader.remaining_slice())?, expected)?;

    let side = cols as usize * 16;
    let mut frames = Vec::new();
    let mut delays = Vec::new();
    walk_frames(&plain, |_, delay_ms, palette, payload| {
        frames.push(decode_tile_frame(payload, palette, side)?);
        delays.push(delay_ms as u32);
        Ok(())
    })?;
    let speed = uniform_speed(&delays);
    PixelBean::new(rows, cols, speed, frames)
}

fn decode_tile_frame(
    payload: &[u8],
    palette: &RollingPalette,
    side: usize,
) -> Result<Vec<u8>, DecodeError> {
    let mut out = vec![0u8; side * side * 3];
    let map: Vec<u8> = (0..palette.len()).map(|i| i as u8).collect();
    let mut cursor = 0usize;
    decode_block(payload, &mut cursor, palette, &map, 0, 0, side, side, &mut out)?;
    Ok(out)
}

#[allow(clippy::too_many_arguments)]
fn decode_block(
    payload: &[u8],
    cursor: &mut usize,
    palette: &RollingPalette,
    map: &[u8],
    x0: usize,
    y0: usize,
    size: usize,
    stride: usize,
    out: &mut [u8],
) -> Result<(), DecodeError> {
    let mode = *payload.get(*cursor).ok_or_else(|| {
        DecodeError::MalformedTree("block header past the end of the frame payload".into())
    })?;
    *cursor += 1;
    match mode {
        MODE_LITERAL => {
            paint_block(payload, cursor, palette, map, x0, y0, size, stride, out);
            Ok(())
        }
        MODE_SUBSET => {
            let selected = read_subset(payload, cursor, map)?;
            paint_block(payload, cursor, palette, &selected, x0, y0, size, stride, out);
            Ok(())
        }
        MODE_RECURSE => {
            if size == LEAF_SIZE {
                return Err(DecodeError::MalformedTree(format!(
                    "recursion below the {LEAF_SIZE}x{LEAF_SIZE} leaf size"
                )));
            }
            let narrowed = read_subset(payload, cursor, map)?;
            let half = size / 2;
            for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                decode_block(
                    payload,
                    cursor,
                    palette,
                    &narrowed,
                    x0 + dx * half,
                    y0 + dy * half,
                    half,
                    stride,
                    out,
                )?;
            }
            Ok(())
        }
        other => Err(DecodeError::MalformedTree(format!(
            "block mode byte 0x{other:02X}"
        ))),
    }
}

/// Read the palette bitmap for a subset or recurse block: bit `i` (LSB
/// first) keeps map entry `i`. An empty selection degrades to palette
/// entry 0.
fn read_subset(payload: &[u8], cursor: &mut usize, map: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mask_bytes = map.len().div_ceil(8);
    let mask = payload
        .get(*cursor..*cursor + mask_bytes)
        .ok_or_else(|| DecodeError::MalformedTree("palette bitmap past the payload end".into()))?;
    *cursor += mask_bytes;
    let mut selected: Vec<u8> = map
        .iter()
        .enumerate()
        .filter(|(i, _)| (mask[i >> 3] >> (i & 7)) & 1 == 1)
        .map(|(_, &entry)| entry)
        .collect();
    if selected.is_empty() {
        selected.push(0);
    }
    Ok(selected)
}

#[allow(clippy::too_many_arguments)]
fn paint_block(
    payload: &[u8],
    cursor: &mut usize,
    palette: &RollingPalette,
    map: &[u8],
    x0: usize,
    y0: usize,
    size: usize,
    stride: usize,
    out: &mut [u8],
) {
    let bits = bits_for(map.len());
    let start = (*cursor).min(payload.len());
    let mut reader = BitReader::new(&payload[start..]);
    let tiles = size / 8;
    for ty in 0..tiles {
        for tx in 0..tiles {
            for row in 0..8 {
                for col in 0..8 {
                    let idx = reader.read_bits(bits) as usize;
                    // Stale indices fall back to palette entry 0.
                    let rgb = match map.get(idx) {
                        Some(&entry) => palette.get(entry as usize),
                        None => palette.get(0),
                    };
                    let px = x0 + tx * 8 + col;
                    let py = y0 + ty * 8 + row;
                    let off = (py * stride + px) * 3;
                    out[off..off + 3].copy_from_slice(&rgb);
                }
            }
        }
    }
    *cursor += reader.bytes_consumed();
}
