//! Benchmarks for dB to color mapping.

use std::hint::black_box;

use criterion::Criterion;
use saavy_sdr::palette::{Palette, DEFAULT_COLOR_MAP};

use crate::{test_line, DISPLAY_WIDTH};

pub fn bench_palette(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/palette");

    group.bench_function("build_lut", |b| {
        b.iter(|| Palette::new(black_box(&DEFAULT_COLOR_MAP)))
    });

    let Ok(palette) = Palette::new(&DEFAULT_COLOR_MAP) else {
        return;
    };
    let line = test_line(DISPLAY_WIDTH);
    let mut row = vec![0u32; DISPLAY_WIDTH];
    group.bench_function("map_line", |b| {
        b.iter(|| palette.map_line(black_box(&line), -110.0, -40.0, black_box(&mut row)))
    });

    group.finish();
}
