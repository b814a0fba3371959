pub mod cell;
pub mod compose;
pub mod control;
pub mod dispose;
pub mod error;
pub mod image;
pub mod quantize;
pub mod render;

pub use error::{Error, Result};
pub use image::{Image, ImageMode, Pixel};
pub use quantize::{ColorDepth, ColorQuantizer, Palette256, TrueColor};
pub use render::RenderSession;
