use thiserror::Error;

use crate::image::ImageMode;

/// Render error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Frame or dispose image is not 4-channel RGBA
    #[error("image mode must be RGBA, got {0}")]
    InvalidImageMode(ImageMode),

    /// Two images that must share a shape do not
    #[error("image is {}x{} but {}x{} was expected", actual.0, actual.1, expected.0, expected.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// No encoding strategy exists for this color depth
    #[error("no color quantizer for {0}-bit color")]
    UnimplementedQuantizer(u8),

    /// Raw pixel buffer length disagrees with the image geometry
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    /// Animation frame region reaches outside the canvas
    #[error("frame region does not fit inside the canvas")]
    RegionOutOfBounds,
}

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, Error>;
