//! End-to-end scenario benchmarks.
//!
//! These go through the public producer handle and the shared core, the
//! same way a receiver and a GUI drive the widget.

mod commit;
mod rebuild;

pub use commit::bench_commit;
pub use rebuild::bench_rebuild;
