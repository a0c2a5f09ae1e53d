//! Minimal lossless VP8L frame encoder.
//!
//! Emits a spec-conformant VP8L bitstream with no transforms, no color
//! cache and no meta prefix codes: one prefix-code group whose five codes
//! are built from the frame's actual channel histograms. Every pixel is a
//! literal; the distance code is a single-symbol placeholder. Suits the
//! small palette-heavy frames this crate produces, where entropy coding the
//! raw channels already compresses well.

use super::bitwriter::BitSink;
use super::huffman::{build_codes, build_lengths, write_tree, Code};

/// Literal alphabet plus the 24 length codes (no color cache).
const GREEN_ALPHABET: usize = 256 + 24;
const DISTANCE_ALPHABET: usize = 40;
const MAX_DEPTH: u8 = 15;

struct Channel {
    lengths: Vec<u8>,
    codes: Vec<Code>,
    /// Single-symbol codes cost zero bits per pixel.
    trivial: bool,
}

fn channel_from(freq: &[u32]) -> Channel {
    let lengths = build_lengths(freq, MAX_DEPTH);
    let trivial = lengths.iter().filter(|&&l| l > 0).count() <= 1;
    let codes = build_codes(&lengths);
    Channel {
        lengths,
        codes,
        trivial,
    }
}

/// Encode one RGB frame as a raw VP8L bitstream (no RIFF framing).
pub(crate) fn encode_frame(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    debug_assert_eq!(rgb.len(), width * height * 3);
    debug_assert!(width >= 1 && height >= 1 && width <= 16384 && height <= 16384);

    let mut green_freq = vec![0u32; GREEN_ALPHABET];
    let mut red_freq = vec![0u32; 256];
    let mut blue_freq = vec![0u32; 256];
    let mut alpha_freq = vec![0u32; 256];
    for px in rgb.chunks_exact(3) {
        red_freq[px[0] as usize] += 1;
        green_freq[px[1] as usize] += 1;
        blue_freq[px[2] as usize] += 1;
    }
    alpha_freq[0xFF] = (width * height) as u32;

    let mut w = BitSink::with_capacity(width * height / 2 + 64);

    // Signature, dimensions, alpha hint, version.
    w.put(0x2f, 8);
    w.put((width - 1) as u64, 14);
    w.put((height - 1) as u64, 14);
    w.put_bit(false);
    w.put(0, 3);

    w.put_bit(false); // no transforms
    w.put_bit(false); // no color cache
    w.put_bit(false); // no meta prefix codes

    let green = channel_from(&green_freq);
    let red = channel_from(&red_freq);
    let blue = channel_from(&blue_freq);
    let alpha = channel_from(&alpha_freq);

    // Tree order fixed by the format: green, red, blue, alpha, distance.
    write_tree(&mut w, &green.lengths);
    write_tree(&mut w, &red.lengths);
    write_tree(&mut w, &blue.lengths);
    write_tree(&mut w, &alpha.lengths);
    write_tree(&mut w, &build_lengths(&[0u32; DISTANCE_ALPHABET], MAX_DEPTH));

    for px in rgb.chunks_exact(3) {
        write_symbol(&mut w, &green, px[1] as usize);
        write_symbol(&mut w, &red, px[0] as usize);
        write_symbol(&mut w, &blue, px[2] as usize);
        write_symbol(&mut w, &alpha, 0xFF);
    }

    w.into_bytes()
}

#[inline]
fn write_symbol(w: &mut BitSink, channel: &Channel, symbol: usize) {
    if !channel.trivial {
        let code = channel.codes[symbol];
        w.put(code.bits as u64, code.len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_carries_signature_and_dimensions() {
        let rgb = vec![128u8; 16 * 16 * 3];
        let data = encode_frame(&rgb, 16, 16);
        assert_eq!(data[0], 0x2f);
        // Next 14 bits (LSB-first) are width - 1 = 15.
        assert_eq!(data[1] & 0x3f, 15 & 0x3f);
    }

    #[test]
    fn solid_frames_are_tiny() {
        let rgb = vec![200u8; 32 * 32 * 3];
        let data = encode_frame(&rgb, 32, 32);
        // All five trees are single-symbol, so no per-pixel bits at all.
        assert!(data.len() < 32, "got {} bytes", data.len());
    }

    #[test]
    fn encoding_is_deterministic() {
        let rgb: Vec<u8> = (0..16 * 16 * 3u32).map(|i| (i * 31) as u8).collect();
        assert_eq!(encode_frame(&rgb, 16, 16), encode_frame(&rgb, 16, 16));
    }
}
