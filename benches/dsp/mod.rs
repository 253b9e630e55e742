//! Benchmarks for single-line primitives.

mod decimate;
mod palette;

pub use decimate::bench_decimate;
pub use palette::bench_palette;
