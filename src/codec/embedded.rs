//! Format 43: a complete animated GIF or WebP embedded in the container.
//!
//! The image file is located by magic (`GIF8…` or `RIFF…WEBP`) so stray
//! bytes before it are harmless. Every contained frame becomes one
//! animation frame; heterogeneous per-frame delays collapse to their
//! arithmetic mean.

use std::io::Cursor;

use crate::bean::{uniform_speed, PixelBean};
use crate::error::DecodeError;

use super::grid_for;

/// Delay assumed when the embedded file is a single static image.
const STATIC_IMAGE_DELAY_MS: u32 = 100;

pub(super) fn decode(body: &[u8]) -> Result<PixelBean, DecodeError> {
    if let Some(at) = find(body, b"GIF8") {
        decode_gif(&body[at..])
    } else if let Some(at) = find_webp(body) {
        decode_webp(&body[at..])
    } else {
        Err(DecodeError::EmbeddedDecode(
            "payload holds neither a GIF nor a WebP signature".into(),
        ))
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn find_webp(body: &[u8]) -> Option<usize> {
    let mut start = 0;
    while let Some(i) = find(&body[start..], b"RIFF") {
        let at = start + i;
        if body.len() >= at + 12 && &body[at + 8..at + 12] == b"WEBP" {
            return Some(at);
        }
        start = at + 4;
    }
    None
}

/// Decode a GIF by compositing each frame over a white canvas in document
/// order. Transparent pixels keep whatever the canvas already holds;
/// disposal is ignored, matching the container's observed renderer.
fn decode_gif(data: &[u8]) -> Result<PixelBean, DecodeError> {
    let gif_err = |e: gif::DecodingError| DecodeError::EmbeddedDecode(format!("gif: {e}"));

    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options.read_info(Cursor::new(data)).map_err(gif_err)?;
    let width = decoder.width() as usize;
    let height = decoder.height() as usize;

    let mut canvas = vec![255u8; width * height * 4];
    let mut frames = Vec::new();
    let mut delays = Vec::new();

    while let Some(frame) = decoder.read_next_frame().map_err(gif_err)? {
        let left = frame.left as usize;
        let top = frame.top as usize;
        let fw = frame.width as usize;
        let fh = frame.height as usize;
        for row in 0..fh {
            let y = top + row;
            if y >= height {
                break;
            }
            for col in 0..fw {
                let x = left + col;
                if x >= width {
                    break;
                }
                let src = (row * fw + col) * 4;
                if frame.buffer[src + 3] != 0 {
                    let dst = (y * width + x) * 4;
                    canvas[dst..dst + 4].copy_from_slice(&frame.buffer[src..src + 4]);
                }
            }
        }
        frames.push(
            canvas
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect(),
        );
        delays.push(frame.delay as u32 * 10); // centiseconds to ms
    }

    if frames.is_empty() {
        return Err(DecodeError::EmbeddedDecode("gif: no frames".into()));
    }
    // A lone frame is a static image; its graphic-control delay (usually
    // absent, decoded as 0) is not an animation speed.
    let speed = if frames.len() == 1 {
        STATIC_IMAGE_DELAY_MS as u16
    } else {
        uniform_speed(&delays)
    };
    let (rows, cols) = grid_for(width as u32, height as u32)?;
    PixelBean::new(rows, cols, speed, frames)
}

/// Decode a WebP animation. `image-webp` composites frames onto the canvas
/// internally and reports each frame's duration.
fn decode_webp(data: &[u8]) -> Result<PixelBean, DecodeError> {
    let webp_err = |e: image_webp::DecodingError| DecodeError::EmbeddedDecode(format!("webp: {e}"));

    let mut decoder = image_webp::WebPDecoder::new(Cursor::new(data)).map_err(webp_err)?;
    let (width, height) = decoder.dimensions();
    let buf_len = decoder
        .output_buffer_size()
        .ok_or_else(|| DecodeError::EmbeddedDecode("webp: canvas too large".into()))?;
    let channels = if decoder.has_alpha() { 4 } else { 3 };

    let mut frames: Vec<Vec<u8>> = Vec::new();
    let mut delays = Vec::new();
    if decoder.is_animated() {
        for _ in 0..decoder.num_frames() {
            let mut buf = vec![0u8; buf_len];
            let duration = decoder.read_frame(&mut buf).map_err(webp_err)?;
            frames.push(strip_alpha(&buf, channels));
            delays.push(duration);
        }
    } else {
        let mut buf = vec![0u8; buf_len];
        decoder.read_image(&mut buf).map_err(webp_err)?;
        frames.push(strip_alpha(&buf, channels));
        delays.push(STATIC_IMAGE_DELAY_MS);
    }

    if frames.is_empty() {
        return Err(DecodeError::EmbeddedDecode("webp: no frames".into()));
    }
    let (rows, cols) = grid_for(width, height)?;
    PixelBean::new(rows, cols, uniform_speed(&delays), frames)
}

fn strip_alpha(buf: &[u8], channels: usize) -> Vec<u8> {
    if channels == 3 {
        return buf.to_vec();
    }
    buf.chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect()
}
