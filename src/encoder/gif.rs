//! Animated GIF output.
//!
//! GIF89a via the `gif` crate: NETSCAPE2.0 loop extension set to infinite,
//! disposal method 2 (restore to background), per-frame local palettes.
//! Frames with at most 256 distinct colors keep their exact palette;
//! anything richer goes through the median-cut quantizer.

use std::borrow::Cow;
use std::collections::HashMap;

use gif::{DisposalMethod, Encoder, Frame, Repeat};

use crate::bean::PixelBean;
use crate::error::EncodeError;

use super::quantize::{median_cut, nearest};

/// Encode a decoded animation as an animated GIF.
pub(crate) fn encode_gif(bean: &PixelBean) -> Result<Vec<u8>, EncodeError> {
    let gif_err = |e: gif::EncodingError| EncodeError::Gif(e.to_string());

    let width = bean.width() as u16;
    let height = bean.height() as u16;
    // GIF counts delay in centiseconds with a practical floor of 2.
    let delay = ((bean.speed_ms() as u32 + 5) / 10).max(2) as u16;

    let mut out = Vec::new();
    {
        let mut encoder = Encoder::new(&mut out, width, height, &[]).map_err(gif_err)?;
        encoder.set_repeat(Repeat::Infinite).map_err(gif_err)?;
        for rgb in bean.frames() {
            let (palette, indices) = palettize(rgb);
            let mut frame = Frame::default();
            frame.width = width;
            frame.height = height;
            frame.delay = delay;
            frame.dispose = DisposalMethod::Background;
            frame.palette = Some(palette);
            frame.buffer = Cow::Owned(indices);
            encoder.write_frame(&frame).map_err(gif_err)?;
        }
    }
    Ok(out)
}

/// Map a frame to (flat palette, per-pixel indices), exactly when possible.
fn palettize(rgb: &[u8]) -> (Vec<u8>, Vec<u8>) {
    // Unique colors in first-seen order keeps the output deterministic.
    let mut lookup: HashMap<[u8; 3], usize> = HashMap::new();
    let mut unique: Vec<([u8; 3], u32)> = Vec::new();
    for px in rgb.chunks_exact(3) {
        let color = [px[0], px[1], px[2]];
        match lookup.get(&color) {
            Some(&i) => unique[i].1 += 1,
            None => {
                lookup.insert(color, unique.len());
                unique.push((color, 1));
            }
        }
    }

    if unique.len() <= 256 {
        let mut palette: Vec<u8> = unique.iter().flat_map(|(c, _)| *c).collect();
        // Color tables need at least two entries.
        if unique.len() < 2 {
            palette.extend_from_slice(&[0, 0, 0]);
        }
        let indices = rgb
            .chunks_exact(3)
            .map(|px| lookup[&[px[0], px[1], px[2]]] as u8)
            .collect();
        return (palette, indices);
    }

    let reduced = median_cut(&unique, 256);
    let flat: Vec<u8> = reduced.iter().flatten().copied().collect();
    // Nearest-entry cache so each distinct color is resolved once.
    let mapping: Vec<u8> = unique
        .iter()
        .map(|(c, _)| nearest(&reduced, *c) as u8)
        .collect();
    let indices = rgb
        .chunks_exact(3)
        .map(|px| mapping[lookup[&[px[0], px[1], px[2]]]])
        .collect();
    (flat, indices)
}
