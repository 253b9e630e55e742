//! Benchmarks for bin-range zoom.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_sdr::dsp::{decimate, DecimationMode};

use crate::{test_line, DISPLAY_WIDTH, FFT_SIZES};

pub fn bench_decimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/decimate");
    let mut out = vec![0.0f32; DISPLAY_WIDTH];

    for &size in FFT_SIZES {
        let line = test_line(size);

        group.bench_with_input(BenchmarkId::new("max", size), &size, |b, _| {
            b.iter(|| {
                decimate(
                    black_box(&line),
                    0,
                    size,
                    black_box(&mut out),
                    DecimationMode::Max,
                )
            })
        });

        group.bench_with_input(BenchmarkId::new("fast", size), &size, |b, _| {
            b.iter(|| {
                decimate(
                    black_box(&line),
                    0,
                    size,
                    black_box(&mut out),
                    DecimationMode::Fast,
                )
            })
        });

        // Zoomed in 10x around the center
        let count = size / 10;
        let start = (size / 2 - count / 2) as isize;
        group.bench_with_input(BenchmarkId::new("zoomed", size), &size, |b, _| {
            b.iter(|| {
                decimate(
                    black_box(&line),
                    start,
                    count,
                    black_box(&mut out),
                    DecimationMode::Max,
                )
            })
        });
    }

    group.finish();
}
