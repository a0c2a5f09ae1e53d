//! WebP container assembler.
//!
//! Builds a complete animated WebP file from pre-encoded lossless VP8L
//! bitstreams: `RIFF`/`WEBP` with a `VP8X` header (animation + alpha
//! flags), one `ANIM` chunk (background color, infinite loop) and one
//! `ANMF` chunk per frame. Frames always cover the full canvas at offset
//! (0, 0), dispose to background, and do not blend.

use crate::error::EncodeError;

/// ANMF header fields: three u24 offsets/dimensions pairs plus flags.
const ANMF_HEADER_LEN: usize = 16;
/// Largest canvas side WebP can express.
const MAX_CANVAS: u32 = 16384;

/// A single frame to be muxed into the container.
pub(crate) struct MuxFrame {
    /// Frame duration in milliseconds (max 16777215).
    pub duration_ms: u32,
    /// Raw VP8L bitstream data.
    pub bitstream: Vec<u8>,
}

/// Animated WebP assembler.
pub(crate) struct Muxer {
    canvas_width: u32,
    canvas_height: u32,
    frames: Vec<MuxFrame>,
}

impl Muxer {
    /// Create an assembler for the given canvas.
    pub fn new(width: u32, height: u32) -> Result<Self, EncodeError> {
        if width == 0 || height == 0 || width > MAX_CANVAS || height > MAX_CANVAS {
            return Err(EncodeError::InvalidDimensions { width, height });
        }
        Ok(Self {
            canvas_width: width,
            canvas_height: height,
            frames: Vec::new(),
        })
    }

    /// Queue a full-canvas frame.
    pub fn push_frame(&mut self, frame: MuxFrame) {
        self.frames.push(frame);
    }

    /// Assemble the final WebP file.
    pub fn assemble(&self) -> Vec<u8> {
        let mut total = 4u32 + chunk_size(10); // "WEBP" + VP8X
        total += chunk_size(6); // ANIM
        for frame in &self.frames {
            total += chunk_size(ANMF_HEADER_LEN + 8 + padded(frame.bitstream.len()));
        }

        let mut out = Vec::with_capacity(total as usize + 8);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&total.to_le_bytes());
        out.extend_from_slice(b"WEBP");

        // VP8X: alpha (lossless bitstreams may carry it) + animation,
        // reserved bytes, then both canvas dimensions minus one.
        let flags: u8 = (1 << 4) | (1 << 1);
        let mut vp8x = vec![flags, 0, 0, 0];
        push_u24_le(&mut vp8x, self.canvas_width - 1);
        push_u24_le(&mut vp8x, self.canvas_height - 1);
        write_chunk(&mut out, b"VP8X", &vp8x);

        // ANIM: background BGRA + loop count 0 (infinite).
        let mut anim = vec![0u8; 4];
        anim.extend_from_slice(&0u16.to_le_bytes());
        write_chunk(&mut out, b"ANIM", &anim);

        for frame in &self.frames {
            self.write_anmf(&mut out, frame);
        }

        out
    }

    fn write_anmf(&self, out: &mut Vec<u8>, frame: &MuxFrame) {
        let payload = ANMF_HEADER_LEN + 8 + padded(frame.bitstream.len());
        out.extend_from_slice(b"ANMF");
        out.extend_from_slice(&(payload as u32).to_le_bytes());

        // Offsets are stored in 2-pixel units; full-canvas frames sit at 0.
        push_u24_le(out, 0);
        push_u24_le(out, 0);
        push_u24_le(out, self.canvas_width - 1);
        push_u24_le(out, self.canvas_height - 1);
        push_u24_le(out, frame.duration_ms);

        // Bit 0: dispose to background. Bit 1: do not blend.
        out.push(0b11);

        write_chunk(out, b"VP8L", &frame.bitstream);
    }
}

/// Size of a chunk on disk: fourcc + length field + padded payload.
const fn chunk_size(inner: usize) -> u32 {
    (8 + padded(inner)) as u32
}

/// RIFF payloads are padded to even length.
const fn padded(len: usize) -> usize {
    len + (len & 1)
}

fn push_u24_le(out: &mut Vec<u8>, v: u32) {
    debug_assert!(v < 1 << 24);
    out.extend_from_slice(&v.to_le_bytes()[..3]);
}

fn write_chunk(out: &mut Vec<u8>, fourcc: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(fourcc);
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    if data.len() & 1 == 1 {
        out.push(0);
    }
}
