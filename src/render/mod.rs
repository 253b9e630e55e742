//! Drawing side of the waterfall: the surface abstraction the host GUI
//! implements, frame layout, axis steps and the pixel buffers.

pub mod framebuffer;
pub mod layout;
pub mod scale;
pub mod surface;

pub use framebuffer::{TextureBuffer, WaterfallFrameBuffer};
pub use layout::{Layout, LayoutMetrics};
pub use scale::{best_step, format_frequency, format_frequency_long};
pub use surface::{CursorShape, InputState, Surface, Theme};
