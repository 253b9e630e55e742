//! Benchmarks for the producer's per-line work.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_sdr::{ViewState, WaterfallConfig, WaterfallRenderer};

use crate::{test_line, DISPLAY_WIDTH, FFT_SIZES};

pub fn bench_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/commit");

    for &size in FFT_SIZES {
        let Ok(view) = ViewState::new(100e6, 2.4e6) else {
            return;
        };
        let Ok((renderer, writer)) = WaterfallRenderer::new(&WaterfallConfig::default(), view, size)
        else {
            return;
        };
        if renderer.lock_core().resize(DISPLAY_WIDTH, 600).is_err() {
            return;
        }
        let line = test_line(size);

        // Copy, zoom, hold and one waterfall row
        group.bench_with_input(BenchmarkId::new("push_line", size), &size, |b, _| {
            b.iter(|| writer.push_line(black_box(&line)))
        });
    }

    group.finish();
}
