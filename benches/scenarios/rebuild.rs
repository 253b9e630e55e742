//! Benchmarks for recomputing the whole waterfall image (zoom, palette or
//! range changes with full updates on).

use criterion::{BenchmarkId, Criterion};
use saavy_sdr::{ViewState, WaterfallConfig, WaterfallRenderer};

use crate::{test_line, DISPLAY_WIDTH};

const HEIGHTS: &[usize] = &[200, 600];

pub fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/rebuild");
    let fft_size = 8_192;

    for &height in HEIGHTS {
        let Ok(view) = ViewState::new(100e6, 2.4e6) else {
            return;
        };
        let Ok((renderer, writer)) =
            WaterfallRenderer::new(&WaterfallConfig::default(), view, fft_size)
        else {
            return;
        };
        if renderer.lock_core().resize(DISPLAY_WIDTH, height).is_err() {
            return;
        }
        let line = test_line(fft_size);
        for _ in 0..height {
            writer.push_line(&line);
        }

        group.bench_with_input(BenchmarkId::new("full", height), &height, |b, _| {
            b.iter(|| renderer.lock_core().rebuild_framebuffer())
        });
    }

    group.finish();
}
