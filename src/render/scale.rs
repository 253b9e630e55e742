//! Grid step selection and axis labels.

/// "Nice" grid steps: 1, 2, 2.5 and 5 times each decade from 1 to 50M.
#[rustfmt::skip]
const STEPS: [f64; 32] = [
    1.0, 2.0, 2.5, 5.0,
    10.0, 20.0, 25.0, 50.0,
    100.0, 200.0, 250.0, 500.0,
    1_000.0, 2_000.0, 2_500.0, 5_000.0,
    10_000.0, 20_000.0, 25_000.0, 50_000.0,
    100_000.0, 200_000.0, 250_000.0, 500_000.0,
    1_000_000.0, 2_000_000.0, 2_500_000.0, 5_000_000.0,
    10_000_000.0, 20_000_000.0, 25_000_000.0, 50_000_000.0,
];

/// Smallest tabulated step that splits `range` into at most `max_steps`
/// intervals, or the largest step if none does.
pub fn best_step(range: f64, max_steps: usize) -> f64 {
    let max_steps = max_steps.max(1) as f64;
    STEPS
        .iter()
        .copied()
        .find(|&step| range / step <= max_steps)
        .unwrap_or(STEPS[STEPS.len() - 1])
}

/// Short frequency label: six significant digits with a K/M/G suffix.
pub fn format_frequency(freq: f64) -> String {
    let abs = freq.abs();
    let (value, suffix) = if abs < 1e3 {
        (freq, "")
    } else if abs < 1e6 {
        (freq / 1e3, "K")
    } else if abs < 1e9 {
        (freq / 1e6, "M")
    } else {
        (freq / 1e9, "G")
    };
    format!("{}{}", significant(value, 6), suffix)
}

/// Frequency with full Hz resolution, for tooltips: `145.500000 MHz`.
pub fn format_frequency_long(freq: f64) -> String {
    let abs = freq.abs();
    if abs < 1e3 {
        format!("{freq:.0} Hz")
    } else if abs < 1e6 {
        format!("{:.3} kHz", freq / 1e3)
    } else if abs < 1e9 {
        format!("{:.6} MHz", freq / 1e6)
    } else {
        format!("{:.9} GHz", freq / 1e9)
    }
}

fn significant(value: f64, digits: i32) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    let text = format!("{value:.decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        text
    }
}
