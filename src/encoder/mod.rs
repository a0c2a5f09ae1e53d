//! Encoders that turn a decoded animation back into standard formats.

mod bitwriter;
mod gif;
mod huffman;
mod quantize;
mod vp8l;

use crate::bean::PixelBean;
use crate::error::EncodeError;
use crate::mux::{MuxFrame, Muxer};

/// Encode an animation as a lossless animated WebP.
///
/// Every frame becomes a full-canvas lossless VP8L bitstream in an `ANMF`
/// chunk carrying the bean's uniform delay, disposing to background and not
/// blending; the loop count is infinite. The output is byte-identical for
/// byte-identical input.
pub fn encode_webp(bean: &PixelBean) -> Result<Vec<u8>, EncodeError> {
    let width = bean.width();
    let height = bean.height();
    let mut mux = Muxer::new(width, height)?;
    for frame in bean.frames() {
        mux.push_frame(MuxFrame {
            duration_ms: bean.speed_ms() as u32,
            bitstream: vp8l::encode_frame(frame, width as usize, height as usize),
        });
    }
    Ok(mux.assemble())
}

/// Encode an animation as an animated GIF.
///
/// GIF89a with an infinite NETSCAPE2.0 loop, disposal method 2, and the
/// bean's delay rounded to centiseconds (floor 2). Frames with at most 256
/// distinct colors are written without quantization loss; richer frames go
/// through a median-cut quantizer.
pub fn encode_gif(bean: &PixelBean) -> Result<Vec<u8>, EncodeError> {
    gif::encode_gif(bean)
}
