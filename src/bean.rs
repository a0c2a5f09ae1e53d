//! The canonical decoded-animation value.

use crate::error::DecodeError;

/// Frames smaller than this delay are clamped up to it.
pub(crate) const MIN_SPEED_MS: u16 = 10;

/// Tile-grid sides a canvas may have, in 16-pixel units.
const VALID_GRID: [u8; 5] = [1, 2, 4, 8, 16];

/// A decoded pixel-bean animation.
///
/// Constructed exactly once per successful [`decode`](crate::decode) call and
/// immutable afterwards: an ordered list of RGB frames on a square canvas,
/// plus one uniform per-frame delay.
///
/// Every frame buffer is `width() * height() * 3` bytes, row-major from the
/// top-left, channels in R, G, B order.
#[derive(Debug, Clone)]
pub struct PixelBean {
    row_count: u8,
    column_count: u8,
    speed_ms: u16,
    frames: Vec<Vec<u8>>,
}

impl PixelBean {
    /// Build a bean, validating the frame-buffer invariants.
    ///
    /// The delay is clamped to at least 10 ms. A zero frame count or a frame
    /// buffer of the wrong length is a [`DecodeError::InvariantViolation`].
    pub(crate) fn new(
        row_count: u8,
        column_count: u8,
        speed_ms: u16,
        frames: Vec<Vec<u8>>,
    ) -> Result<Self, DecodeError> {
        if !VALID_GRID.contains(&row_count) || !VALID_GRID.contains(&column_count) {
            return Err(DecodeError::InvariantViolation(format!(
                "grid {row_count}x{column_count} is not a supported canvas size"
            )));
        }
        if frames.is_empty() {
            return Err(DecodeError::InvariantViolation(
                "animation holds no frames".into(),
            ));
        }
        let frame_len = row_count as usize * column_count as usize * 16 * 16 * 3;
        for (i, frame) in frames.iter().enumerate() {
            if frame.len() != frame_len {
                return Err(DecodeError::InvariantViolation(format!(
                    "frame {i} holds {} bytes, expected {frame_len}",
                    frame.len()
                )));
            }
        }
        Ok(Self {
            row_count,
            column_count,
            speed_ms: speed_ms.max(MIN_SPEED_MS),
            frames,
        })
    }

    /// Number of 16-pixel tile rows. One of 1, 2, 4, 8 or 16.
    pub fn row_count(&self) -> u8 {
        self.row_count
    }

    /// Number of 16-pixel tile columns. One of 1, 2, 4, 8 or 16.
    pub fn column_count(&self) -> u8 {
        self.column_count
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.column_count as u32 * 16
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.row_count as u32 * 16
    }

    /// Number of frames in the animation. Always at least 1.
    pub fn total_frames(&self) -> usize {
        self.frames.len()
    }

    /// Uniform per-frame delay in milliseconds. Always at least 10.
    pub fn speed_ms(&self) -> u16 {
        self.speed_ms
    }

    /// The `i`-th frame as raw RGB bytes, or `None` past the end.
    pub fn frame(&self, i: usize) -> Option<&[u8]> {
        self.frames.get(i).map(Vec::as_slice)
    }

    /// Iterate over all frames in order.
    pub fn frames(&self) -> impl Iterator<Item = &[u8]> {
        self.frames.iter().map(Vec::as_slice)
    }
}

/// Collapse per-frame delays into the uniform speed: arithmetic mean,
/// rounded to the nearest millisecond, clamped to the 10 ms floor.
pub(crate) fn uniform_speed(delays_ms: &[u32]) -> u16 {
    if delays_ms.is_empty() {
        return MIN_SPEED_MS;
    }
    let sum: u64 = delays_ms.iter().map(|&d| d as u64).sum();
    let n = delays_ms.len() as u64;
    let mean = (sum + n / 2) / n;
    (mean.min(u16::MAX as u64) as u16).max(MIN_SPEED_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_frame_length() {
        let err = PixelBean::new(1, 1, 40, vec![vec![0u8; 100]]).unwrap_err();
        assert!(matches!(err, DecodeError::InvariantViolation(_)));
    }

    #[test]
    fn rejects_empty_frame_list() {
        let err = PixelBean::new(1, 1, 40, Vec::new()).unwrap_err();
        assert!(matches!(err, DecodeError::InvariantViolation(_)));
    }

    #[test]
    fn clamps_speed_floor() {
        let bean = PixelBean::new(1, 1, 0, vec![vec![0u8; 16 * 16 * 3]]).unwrap();
        assert_eq!(bean.speed_ms(), 10);
    }

    #[test]
    fn mean_delay_rounds_to_nearest() {
        assert_eq!(uniform_speed(&[100, 100, 100]), 100);
        assert_eq!(uniform_speed(&[100, 101]), 101); // 100.5 rounds up
        assert_eq!(uniform_speed(&[1, 2]), 10); // clamped
        assert_eq!(uniform_speed(&[]), 10);
    }
}
