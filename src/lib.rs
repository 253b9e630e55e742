//! Spectrum and waterfall display engine for SDR receivers.
//!
//! A producer thread pushes power-spectrum lines through a [`SpectrumWriter`];
//! the UI thread calls [`WaterfallRenderer::render`] once per frame against
//! any [`Surface`] the host GUI implements.

pub mod bandplan; // Named frequency segments
pub mod config;
pub mod dsp; // Decimation, history ring, signal metering
pub mod error;
pub mod geom;
pub mod interaction; // Pointer/keyboard state machine
pub mod palette;
pub mod render; // Surface trait, layout, axis steps, pixel buffers
pub mod vfo;
pub mod view;
pub mod waterfall;

pub use bandplan::{Band, BandColor, BandColorTable, BandPlan, BandPlanPosition};
pub use config::WaterfallConfig;
pub use dsp::{DecimationMode, SignalInfo, SpectrumHistory};
pub use error::{Result, WaterfallError};
pub use geom::{Rect, Rgba, Vec2};
pub use interaction::WaterfallEvent;
pub use palette::{Palette, DEFAULT_COLOR_MAP};
pub use render::{CursorShape, InputState, Surface, Theme};
pub use vfo::{Reference, Vfo, VfoSet};
pub use view::ViewState;
pub use waterfall::{
    FrameContext, LineWriteGuard, PlotGeometry, SpectrumWriter, WaterfallOverlay,
    WaterfallRenderer,
};
