//! Synthetic receiver
//!
//! Generates complex baseband samples for a handful of carriers plus noise,
//! runs a windowed FFT over each block and hands the shifted power spectrum
//! in dB to the waterfall.

use rand::{rngs::StdRng, Rng, SeedableRng};
use rtrb::Consumer;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use saavy_sdr::SpectrumWriter;
use std::{f64::consts::TAU, sync::Arc, thread, time::Duration};
use tracing::{debug, info};

use super::ui::state::ControlMessage;

/// Delay between spectrum lines (~30 lines/s)
const LINE_INTERVAL: Duration = Duration::from_millis(33);

/// Floor used instead of log10(0)
const MIN_POWER: f32 = 1e-20;

/// A continuous carrier at an absolute frequency.
#[derive(Clone, Copy, Debug)]
pub struct Tone {
    /// Frequency in Hz
    pub freq: f64,
    /// Peak amplitude (1.0 = full scale)
    pub amplitude: f64,
    /// Slow amplitude fading rate in Hz, 0 for a steady carrier
    pub fade_rate: f64,
}

impl Tone {
    pub fn new(freq: f64, amplitude: f64) -> Self {
        Self {
            freq,
            amplitude,
            fade_rate: 0.0,
        }
    }

    pub fn fading(mut self, rate: f64) -> Self {
        self.fade_rate = rate;
        self
    }
}

pub struct Receiver {
    center_freq: f64,
    sample_rate: f64,
    tones: Vec<Tone>,
    /// Oscillator phase per tone, kept across blocks
    phases: Vec<f64>,
    noise_amplitude: f32,
    elapsed: f64,
    rng: StdRng,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    /// Sum of the window, for power normalisation
    window_gain: f32,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    /// Finished spectrum line, handed to the writer in one copy
    line: Vec<f32>,
}

impl Receiver {
    pub fn new(center_freq: f64, sample_rate: f64, fft_size: usize, tones: Vec<Tone>) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        // Hann window - reduces spectral leakage
        let window: Vec<f32> = (0..fft_size)
            .map(|i| {
                if fft_size > 1 {
                    let denom = (fft_size - 1) as f32;
                    0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos())
                } else {
                    1.0
                }
            })
            .collect();
        let window_gain = window.iter().sum::<f32>().max(f32::EPSILON);

        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        let phases = vec![0.0; tones.len()];

        Self {
            center_freq,
            sample_rate,
            tones,
            phases,
            noise_amplitude: 1e-3,
            elapsed: 0.0,
            rng: StdRng::seed_from_u64(0x5DA),
            fft,
            window,
            window_gain,
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            scratch,
            line: vec![0.0; fft_size],
        }
    }

    /// Produce lines until the UI asks to stop.
    pub fn run(mut self, writer: SpectrumWriter, mut control: Consumer<ControlMessage>) {
        info!(
            center = self.center_freq,
            sample_rate = self.sample_rate,
            fft_size = self.buffer.len(),
            "receiver started"
        );
        let mut paused = false;

        loop {
            while let Ok(msg) = control.pop() {
                match msg {
                    ControlMessage::Tune(freq) => {
                        debug!(freq, "receiver retuned");
                        self.center_freq = freq;
                    }
                    ControlMessage::TogglePause => paused = !paused,
                    ControlMessage::Quit => {
                        info!("receiver stopped");
                        return;
                    }
                }
            }

            // The FFT runs before the writer locks the waterfall
            if !paused {
                writer.push_line(self.next_line());
            }

            thread::sleep(LINE_INTERVAL);
        }
    }

    /// Fill the sample buffer with the carriers inside the band plus noise.
    fn generate_block(&mut self) {
        let n = self.buffer.len();
        let half_band = self.sample_rate / 2.0;

        for sample in self.buffer.iter_mut() {
            let re = self.rng.random_range(-1.0f32..1.0) * self.noise_amplitude;
            let im = self.rng.random_range(-1.0f32..1.0) * self.noise_amplitude;
            *sample = Complex::new(re, im);
        }

        for (tone, phase) in self.tones.iter().zip(self.phases.iter_mut()) {
            let offset = tone.freq - self.center_freq;
            let step = TAU * offset / self.sample_rate;
            if offset.abs() >= half_band {
                // Out of band: keep the oscillator running so it re-enters in phase
                *phase = (*phase + step * n as f64) % TAU;
                continue;
            }
            let fade = if tone.fade_rate > 0.0 {
                0.55 + 0.45 * (TAU * tone.fade_rate * self.elapsed).sin()
            } else {
                1.0
            };
            let amplitude = tone.amplitude * fade;
            for sample in self.buffer.iter_mut() {
                *sample += Complex::new(
                    (amplitude * phase.cos()) as f32,
                    (amplitude * phase.sin()) as f32,
                );
                *phase = (*phase + step) % TAU;
            }
        }

        self.elapsed += n as f64 / self.sample_rate;
    }

    /// Generate one block and compute its spectrum into the owned line.
    fn next_line(&mut self) -> &[f32] {
        self.generate_block();
        let mut line = std::mem::take(&mut self.line);
        self.spectrum_into(&mut line);
        self.line = line;
        &self.line
    }

    /// Window, transform and write the power spectrum with DC in the middle.
    fn spectrum_into(&mut self, out: &mut [f32]) {
        for (sample, &w) in self.buffer.iter_mut().zip(&self.window) {
            *sample *= w;
        }
        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let n = self.buffer.len();
        let scale = 1.0 / (self.window_gain * self.window_gain);
        for (k, slot) in out.iter_mut().enumerate().take(n) {
            let bin = self.buffer[(k + n / 2) % n];
            let power = (bin.norm_sqr() * scale).max(MIN_POWER);
            *slot = 10.0 * power.log10();
        }
    }
}
