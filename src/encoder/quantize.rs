//! Median-cut palette quantization for GIF output.
//!
//! Only runs when a frame holds more than 256 distinct colors; frames at or
//! under the limit keep their exact palette.

/// Reduce a weighted color set to at most `max_colors` representatives.
///
/// Classic median cut: repeatedly split the box with the widest channel
/// range at its pixel-count median, then average each box. Input order and
/// all tie-breaks are deterministic.
pub(crate) fn median_cut(colors: &[([u8; 3], u32)], max_colors: usize) -> Vec<[u8; 3]> {
    debug_assert!(max_colors >= 1);
    let mut boxes: Vec<Vec<([u8; 3], u32)>> = vec![colors.to_vec()];

    while boxes.len() < max_colors {
        // Widest channel range across all splittable boxes.
        let mut best: Option<(usize, usize, u8)> = None;
        for (i, b) in boxes.iter().enumerate() {
            if b.len() < 2 {
                continue;
            }
            for ch in 0..3 {
                let min = b.iter().map(|(c, _)| c[ch]).min().unwrap_or(0);
                let max = b.iter().map(|(c, _)| c[ch]).max().unwrap_or(0);
                let range = max - min;
                if best.map_or(true, |(_, _, r)| range > r) {
                    best = Some((i, ch, range));
                }
            }
        }
        let Some((box_idx, ch, _)) = best else { break };

        let mut b = boxes.remove(box_idx);
        b.sort_by_key(|(c, _)| (c[ch], *c));
        let total: u64 = b.iter().map(|(_, n)| *n as u64).sum();
        let mut acc = 0u64;
        let mut split = 0usize;
        for (i, (_, n)) in b.iter().enumerate() {
            acc += *n as u64;
            if acc * 2 >= total {
                split = i + 1;
                break;
            }
        }
        // Both halves must stay non-empty.
        let split = split.clamp(1, b.len() - 1);
        let right = b.split_off(split);
        boxes.push(b);
        boxes.push(right);
    }

    boxes
        .iter()
        .map(|b| {
            let total: u64 = b.iter().map(|(_, n)| *n as u64).sum::<u64>().max(1);
            let mut sums = [0u64; 3];
            for (c, n) in b {
                for ch in 0..3 {
                    sums[ch] += c[ch] as u64 * *n as u64;
                }
            }
            [
                ((sums[0] + total / 2) / total) as u8,
                ((sums[1] + total / 2) / total) as u8,
                ((sums[2] + total / 2) / total) as u8,
            ]
        })
        .collect()
}

/// Index of the palette entry closest to `color` (squared Euclidean
/// distance, lowest index wins ties).
pub(crate) fn nearest(palette: &[[u8; 3]], color: [u8; 3]) -> usize {
    let mut best = 0usize;
    let mut best_dist = u32::MAX;
    for (i, entry) in palette.iter().enumerate() {
        let dist: u32 = entry
            .iter()
            .zip(color.iter())
            .map(|(&a, &b)| {
                let d = a as i32 - b as i32;
                (d * d) as u32
            })
            .sum();
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_sets_pass_through() {
        let colors = [([10, 20, 30], 5), ([200, 100, 50], 3)];
        let palette = median_cut(&colors, 256);
        assert_eq!(palette.len(), 2);
        assert!(palette.contains(&[10, 20, 30]));
        assert!(palette.contains(&[200, 100, 50]));
    }

    #[test]
    fn output_respects_the_limit() {
        let colors: Vec<([u8; 3], u32)> = (0..512u32)
            .map(|i| ([(i % 256) as u8, (i / 2) as u8, (i % 64) as u8], 1))
            .collect();
        let palette = median_cut(&colors, 256);
        assert!(palette.len() <= 256);
        assert!(palette.len() > 1);
    }

    #[test]
    fn quantization_is_deterministic() {
        let colors: Vec<([u8; 3], u32)> = (0..400u32)
            .map(|i| ([(i * 7 % 256) as u8, (i * 13 % 256) as u8, (i * 3 % 256) as u8], 1))
            .collect();
        assert_eq!(median_cut(&colors, 64), median_cut(&colors, 64));
    }

    #[test]
    fn nearest_prefers_exact_match() {
        let palette = [[0, 0, 0], [255, 0, 0], [254, 1, 0]];
        assert_eq!(nearest(&palette, [255, 0, 0]), 1);
        assert_eq!(nearest(&palette, [250, 3, 0]), 2);
    }
}
