/// Passband of a VFO, in Hz relative to the tuned center frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VfoSpan {
    pub center_offset: f64,
    pub bandwidth: f64,
}

/// Peak level inside a passband and its margin over the surrounding noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalInfo {
    /// Peak sample inside the passband, dB.
    pub strength: f32,
    /// `strength` minus the mean of the two shoulder spans, dB.
    pub snr: f32,
}

/// Measure strength and SNR under `span` on a raw spectrum line covering
/// `whole_bandwidth` Hz centered on bin `len / 2`.
///
/// The passband is `center ± bw/2`; the noise floor is the mean of the two
/// shoulders between `bw/2` and `bw` on either side. Returns `None` on an
/// empty line or when the passband or both shoulders cover no bins.
pub fn measure_signal(line: &[f32], span: VfoSpan, whole_bandwidth: f64) -> Option<SignalInfo> {
    let size = line.len();
    let valid_bw = span.bandwidth >= 0.0 && span.bandwidth.is_finite();
    if size == 0 || !(whole_bandwidth > 0.0) || !valid_bw {
        return None;
    }

    let half_size = (size / 2) as f64;
    let to_bin = |offset: f64| -> usize {
        let bin = (offset / (whole_bandwidth / 2.0)) * half_size + half_size;
        if bin.is_nan() {
            0
        } else {
            bin.clamp(0.0, size as f64) as usize
        }
    };

    let center = span.center_offset;
    let bw = span.bandwidth;
    let outer_lo = to_bin(center - bw);
    let inner_lo = to_bin(center - bw / 2.0);
    let inner_hi = to_bin(center + bw / 2.0);
    let outer_hi = to_bin(center + bw);

    // Passband is inclusive of both edge bins, but never reads past the line.
    let inner = line.get(inner_lo..=inner_hi.min(size - 1))?;
    if inner.is_empty() {
        return None;
    }
    let strength = inner.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    let left = &line[outer_lo..inner_lo];
    let right = line.get(inner_hi + 1..outer_hi).unwrap_or(&[]);
    let count = left.len() + right.len();
    if count == 0 {
        return None;
    }
    let noise = left.iter().chain(right).map(|&v| v as f64).sum::<f64>() / count as f64;

    Some(SignalInfo {
        strength,
        snr: strength - noise as f32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_with_carrier() -> Vec<f32> {
        // 1000 bins over 1 MHz: 1 kHz per bin, center at bin 500
        let mut line = vec![-100.0f32; 1000];
        line[520] = -40.0;
        line
    }

    #[test]
    fn carrier_inside_passband() {
        let span = VfoSpan {
            center_offset: 20_000.0,
            bandwidth: 10_000.0,
        };
        let info = measure_signal(&line_with_carrier(), span, 1_000_000.0).unwrap();
        assert_eq!(info.strength, -40.0);
        assert!((info.snr - 60.0).abs() < 1e-3);
    }

    #[test]
    fn cold_start_is_unavailable() {
        let span = VfoSpan {
            center_offset: 0.0,
            bandwidth: 10_000.0,
        };
        assert!(measure_signal(&[], span, 1_000_000.0).is_none());
    }

    #[test]
    fn collapsed_span_is_unavailable() {
        let span = VfoSpan {
            center_offset: 0.0,
            bandwidth: 0.0,
        };
        assert!(measure_signal(&line_with_carrier(), span, 1_000_000.0).is_none());
    }

    #[test]
    fn span_off_the_band_is_unavailable() {
        let span = VfoSpan {
            center_offset: 2_000_000.0,
            bandwidth: 10_000.0,
        };
        assert!(measure_signal(&line_with_carrier(), span, 1_000_000.0).is_none());
    }

    #[test]
    fn edge_span_uses_one_shoulder() {
        let mut line = vec![-90.0f32; 1000];
        line[995] = -30.0;
        let span = VfoSpan {
            center_offset: 496_000.0,
            bandwidth: 6_000.0,
        };
        let info = measure_signal(&line, span, 1_000_000.0).unwrap();
        assert_eq!(info.strength, -30.0);
        assert!((info.snr - 60.0).abs() < 1e-3);
    }
}
