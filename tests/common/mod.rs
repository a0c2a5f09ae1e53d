//! Shared fixture builders for the integration tests.
//!
//! Containers are assembled programmatically: frame streams byte by byte,
//! AES with the container constants, LZO as plain literal runs, Zstd and
//! GIF through the same crates the library links.

#![allow(dead_code)]

use aes::Aes128;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockEncryptMut, KeyIvInit};

pub const AES_KEY: &[u8; 16] = b"78hrey23y28ogs89";
pub const AES_IV: &[u8; 16] = b"1234567890123456";

/// Wrap a tag and codec payload in the container preamble.
pub fn container(tag: u8, rest: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rest.len() + 5);
    out.extend_from_slice(&((rest.len() + 1) as u32).to_be_bytes());
    out.push(tag);
    out.extend_from_slice(rest);
    out
}

/// One frame block of a palette-bitstream stream: 5-byte header, optional
/// palette block, packed indices. The size field covers all of it.
pub fn frame_block(subtype: u8, delay: u16, palette_rgb: &[u8], bitstream: &[u8]) -> Vec<u8> {
    let has_palette = !palette_rgb.is_empty() || subtype & 0x01 != 0;
    let size = 5 + if has_palette { 1 + palette_rgb.len() } else { 0 } + bitstream.len();
    let mut out = vec![subtype];
    out.extend_from_slice(&(size as u16).to_le_bytes());
    out.extend_from_slice(&delay.to_le_bytes());
    if has_palette {
        out.push((palette_rgb.len() / 3) as u8);
        out.extend_from_slice(palette_rgb);
    }
    out.extend_from_slice(bitstream);
    out
}

/// AES-CBC encrypt under the container constants, zero-padding the
/// plaintext to the block size. Padding that would land in the 2-4 byte
/// dead zone of the stream state machine is widened by a full block, which
/// the zero-size-header rule absorbs.
pub fn aes_encrypt(plaintext: &[u8]) -> Vec<u8> {
    let mut padded = plaintext.to_vec();
    let mut pad = (16 - padded.len() % 16) % 16;
    if (2..=4).contains(&pad) {
        pad += 16;
    }
    padded.extend(std::iter::repeat(0u8).take(pad));
    cbc::Encryptor::<Aes128>::new(AES_KEY.into(), AES_IV.into())
        .encrypt_padded_vec_mut::<NoPadding>(&padded)
}

/// Pack bytes as a single LZO1X-1 literal run plus the EOS marker.
pub fn lzo_pack(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 8);
    if data.len() <= 238 {
        out.push(data.len() as u8 + 17);
    } else {
        out.push(0);
        let mut rem = data.len() - 3 - 15;
        while rem > 255 {
            out.push(0);
            rem -= 255;
        }
        out.push(rem as u8);
    }
    out.extend_from_slice(data);
    out.extend_from_slice(&[0x11, 0x00, 0x00]);
    out
}

/// The AES(LZO(stream)) body shared by formats 18 and 26, with the
/// uncompressed length prefix.
pub fn compressed_body(preamble: &[u8], plaintext: &[u8]) -> Vec<u8> {
    let mut body = preamble.to_vec();
    body.extend_from_slice(&(plaintext.len() as u32).to_be_bytes());
    body.extend_from_slice(&aes_encrypt(&lzo_pack(plaintext)));
    body
}

/// Pack palette indices LSB-first at a fixed bit width.
pub fn pack_indices(indices: &[u8], bits: u8) -> Vec<u8> {
    let mut out = Vec::new();
    let mut acc: u16 = 0;
    let mut filled = 0u8;
    for &idx in indices {
        acc |= (idx as u16) << filled;
        filled += bits;
        while filled >= 8 {
            out.push(acc as u8);
            acc >>= 8;
            filled -= 8;
        }
    }
    if filled > 0 {
        out.push(acc as u8);
    }
    out
}

/// A minimal baseline grayscale JPEG, every pixel mid-gray (128).
///
/// Single-component SOF0 with flat quantization, one-code Huffman tables
/// (DC category 0 and EOB each cost one `0` bit), so every 8x8 block is two
/// zero bits. Sides that are multiples of 16 keep the scan byte-aligned.
pub fn gray_jpeg(side: u16) -> Vec<u8> {
    assert!(side % 16 == 0);
    let mut out = Vec::new();
    out.extend_from_slice(&[0xFF, 0xD8]); // SOI

    // DQT, table 0, all ones.
    out.extend_from_slice(&[0xFF, 0xDB, 0x00, 0x43, 0x00]);
    out.extend(std::iter::repeat(0x01).take(64));

    // SOF0: 8-bit precision, one component, no subsampling.
    out.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x0B, 0x08]);
    out.extend_from_slice(&side.to_be_bytes());
    out.extend_from_slice(&side.to_be_bytes());
    out.extend_from_slice(&[0x01, 0x01, 0x11, 0x00]);

    // DHT: DC table 0 and AC table 0, each a single length-1 code for
    // symbol 0x00.
    for class in [0x00u8, 0x10] {
        out.extend_from_slice(&[0xFF, 0xC4, 0x00, 0x14, class, 0x01]);
        out.extend(std::iter::repeat(0x00).take(15));
        out.push(0x00);
    }

    // SOS.
    out.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);

    // Scan: (side/8)^2 blocks, 2 zero bits each.
    let blocks = (side as usize / 8) * (side as usize / 8);
    out.extend(std::iter::repeat(0x00).take(blocks * 2 / 8));

    out.extend_from_slice(&[0xFF, 0xD9]); // EOI
    out
}

/// A format-31 style body: `[u16 LE delay][JPEG]` repeated.
pub fn jpeg_sequence(side: u16, delays_ms: &[u16]) -> Vec<u8> {
    let jpeg = gray_jpeg(side);
    let mut out = Vec::new();
    for &delay in delays_ms {
        out.extend_from_slice(&delay.to_le_bytes());
        out.extend_from_slice(&jpeg);
    }
    out
}

/// An animated two-color GIF built with the `gif` crate: every frame is a
/// solid color from `colors`, with the given delay in centiseconds.
pub fn solid_gif(side: u16, colors: &[[u8; 3]], delay_cs: u16) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut out, side, side, &[]).unwrap();
        encoder.set_repeat(gif::Repeat::Infinite).unwrap();
        for color in colors {
            let mut frame = gif::Frame::default();
            frame.width = side;
            frame.height = side;
            frame.delay = delay_cs;
            let mut palette = color.to_vec();
            palette.extend_from_slice(&[0, 0, 0]);
            frame.palette = Some(palette);
            frame.buffer = std::borrow::Cow::Owned(vec![0u8; side as usize * side as usize]);
            encoder.write_frame(&frame).unwrap();
        }
    }
    out
}

/// Assert a frame is one solid color.
pub fn assert_solid(frame: &[u8], rgb: [u8; 3]) {
    for (i, px) in frame.chunks_exact(3).enumerate() {
        assert_eq!(px, &rgb[..], "pixel {i}");
    }
}
