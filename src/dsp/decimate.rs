#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Value used to blank display buffers: far below any sensible dB range, so a
/// freshly reset trace draws flat at the bottom of the plot.
pub const BELOW_RANGE_DB: f32 = -1000.0;

/// How several source bins are folded into one display sample.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecimationMode {
    /// Peak of each source span. Narrow carriers survive any zoom level.
    #[default]
    Max,
    /// Nearest source bin only. Cheaper, paired with line smoothing on commit.
    Fast,
}

/// Map `bin_count` source bins starting at `start_bin` onto `out.len()` samples.
///
/// When shrinking, output sample `i` covers source bins
/// `[start + i*n/w, start + (i+1)*n/w)` and takes their maximum. When
/// expanding (or in [`DecimationMode::Fast`]) each output picks the source bin
/// at `start + i*n/w`. Reads outside the source are clamped to its first or
/// last bin.
pub fn decimate(
    src: &[f32],
    start_bin: isize,
    bin_count: usize,
    out: &mut [f32],
    mode: DecimationMode,
) {
    if out.is_empty() {
        return;
    }
    if src.is_empty() || bin_count == 0 {
        out.fill(BELOW_RANGE_DB);
        return;
    }

    let width = out.len();
    let last = src.len() as isize - 1;
    let read = |idx: isize| src[idx.clamp(0, last) as usize];
    let edge = |i: usize| start_bin + ((i as u64 * bin_count as u64) / width as u64) as isize;

    if mode == DecimationMode::Fast || width >= bin_count {
        for (i, sample) in out.iter_mut().enumerate() {
            *sample = read(edge(i));
        }
        return;
    }

    for (i, sample) in out.iter_mut().enumerate() {
        let lo = edge(i);
        let hi = edge(i + 1).max(lo + 1);
        *sample = (lo..hi).map(read).fold(f32::NEG_INFINITY, f32::max);
    }
}

/// One-pole low-pass across a raw line (`y = 0.1 x + 0.9 y`), used in fast
/// mode so nearest-bin sampling does not flicker.
pub fn smooth(line: &mut [f32]) {
    let Some(&first) = line.first() else {
        return;
    };
    let mut last = first;
    for v in line.iter_mut() {
        last = *v * 0.1 + last * 0.9;
        *v = last;
    }
}

/// Peak-hold with linear decay: `hold = max(live, hold - decay)`.
pub fn apply_hold(live: &[f32], hold: &mut [f32], decay: f32) {
    for (h, &l) in hold.iter_mut().zip(live) {
        *h = l.max(*h - decay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn naive_max(src: &[f32], start: isize, count: usize, width: usize) -> Vec<f32> {
        let last = src.len() as isize - 1;
        (0..width)
            .map(|i| {
                let lo = start + (i * count / width) as isize;
                let hi = start + ((i + 1) * count / width) as isize;
                let mut best = f32::NEG_INFINITY;
                let mut j = lo;
                loop {
                    best = best.max(src[j.clamp(0, last) as usize]);
                    j += 1;
                    if j >= hi {
                        break;
                    }
                }
                best
            })
            .collect()
    }

    #[test]
    fn shrinking_keeps_narrow_peak() {
        let mut src = vec![-90.0f32; 1024];
        src[517] = -10.0;
        let mut out = vec![0.0; 64];
        decimate(&src, 0, 1024, &mut out, DecimationMode::Max);
        assert_eq!(out[517 * 64 / 1024], -10.0);
        assert_eq!(out.iter().filter(|&&v| v == -10.0).count(), 1);
    }

    #[test]
    fn fast_mode_samples_nearest_bin() {
        let src: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let mut out = vec![0.0; 10];
        decimate(&src, 0, 100, &mut out, DecimationMode::Fast);
        assert_eq!(out, (0..10).map(|i| (i * 10) as f32).collect::<Vec<_>>());
    }

    #[test]
    fn expanding_repeats_source_bins() {
        let src = [1.0f32, 2.0, 3.0, 4.0];
        let mut out = vec![0.0; 8];
        decimate(&src, 0, 4, &mut out, DecimationMode::Max);
        assert_eq!(out, vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0]);
    }

    #[test]
    fn out_of_range_reads_are_clamped() {
        let src = [5.0f32, 6.0, 7.0];
        let mut out = vec![0.0; 6];
        decimate(&src, -2, 6, &mut out, DecimationMode::Max);
        assert_eq!(out, vec![5.0, 5.0, 5.0, 6.0, 7.0, 7.0]);
    }

    #[test]
    fn empty_source_blanks_output() {
        let mut out = vec![0.0; 4];
        decimate(&[], 0, 10, &mut out, DecimationMode::Max);
        assert!(out.iter().all(|&v| v == BELOW_RANGE_DB));
        let mut out = vec![0.0; 4];
        decimate(&[1.0, 2.0], 0, 0, &mut out, DecimationMode::Max);
        assert!(out.iter().all(|&v| v == BELOW_RANGE_DB));
    }

    #[test]
    fn hold_decays_toward_live() {
        let live = [-50.0f32, -20.0];
        let mut hold = [-10.0f32, -40.0];
        apply_hold(&live, &mut hold, 1.0);
        assert_eq!(hold, [-11.0, -20.0]);
    }

    #[test]
    fn smoothing_starts_from_first_sample() {
        let mut line = [10.0f32, 10.0, 0.0];
        smooth(&mut line);
        assert_eq!(line[0], 10.0);
        assert_eq!(line[1], 10.0);
        assert!((line[2] - 9.0).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn shrinking_matches_naive_max(
            src in proptest::collection::vec(-150.0f32..0.0, 16..512),
            start in -32isize..32,
            width in 1usize..64,
            extra in 1usize..400,
        ) {
            let count = width + extra;
            let mut out = vec![0.0; width];
            decimate(&src, start, count, &mut out, DecimationMode::Max);
            prop_assert_eq!(out, naive_max(&src, start, count, width));
        }

        #[test]
        fn equal_width_is_identity(src in proptest::collection::vec(-150.0f32..0.0, 1..512)) {
            let mut out = vec![0.0; src.len()];
            decimate(&src, 0, src.len(), &mut out, DecimationMode::Max);
            prop_assert_eq!(out, src);
        }
    }
}
