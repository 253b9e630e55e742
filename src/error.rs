use thiserror::Error;

/// Rejected configuration or geometry requests.
///
/// None of these are fatal: the caller keeps its previous valid state and the
/// display carries on with the last good settings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WaterfallError {
    #[error("palette needs at least one control point")]
    EmptyPalette,
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("invalid dB range [{min}, {max}]")]
    InvalidRange { min: f32, max: f32 },
    #[error("bandwidth must be positive and finite, got {0}")]
    InvalidBandwidth(f64),
    #[error("ui scale must be positive and finite, got {0}")]
    InvalidScale(f32),
}

pub type Result<T> = std::result::Result<T, WaterfallError>;
