use anyhow::Context;
use fast_image_resize::images::Image as ResizeImage;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use shellpic_core::{Image, ImageMode};

pub struct FrameResizer {
    target_width: u32,
    target_height: u32,
    resizer: Resizer,
    options: ResizeOptions,
    snap_alpha: bool,
}

impl FrameResizer {
    /// Lanczos3 resizer fitting `width`×`height` pixels into `cols`×`rows` cells.
    /// Alpha is snapped to 0 or 255 afterwards, so filter ringing never turns a
    /// transparent pixel opaque. Meant for still images.
    pub fn smooth(width: u32, height: u32, cols: u16, rows: u16) -> Self {
        let alg = ResizeAlg::Convolution(FilterType::Lanczos3);
        Self::with_alg(width, height, cols, rows, alg, true)
    }

    /// Nearest-neighbour resizer: every output pixel is a copy of a source
    /// pixel, alpha included. Animation frames need this so transparent pixels
    /// keep revealing earlier frames.
    pub fn nearest(width: u32, height: u32, cols: u16, rows: u16) -> Self {
        Self::with_alg(width, height, cols, rows, ResizeAlg::Nearest, false)
    }

    fn with_alg(width: u32, height: u32, cols: u16, rows: u16, alg: ResizeAlg, snap_alpha: bool) -> Self {
        let (target_width, target_height) = fit_dimensions(width, height, cols, rows);

        Self {
            target_width,
            target_height,
            resizer: Resizer::new(),
            options: ResizeOptions::new().resize_alg(alg),
            snap_alpha,
        }
    }

    /// Resize an RGBA frame to the target dimensions.
    pub fn resize(&mut self, image: &Image) -> anyhow::Result<Image> {
        if image.dimensions() == (self.target_width, self.target_height) {
            return Ok(image.clone());
        }

        let src_image = ResizeImage::from_vec_u8(
            image.width(),
            image.height(),
            image.as_raw().to_vec(),
            PixelType::U8x4,
        )
        .context("failed to create source image")?;

        let mut dst_image = ResizeImage::new(self.target_width, self.target_height, PixelType::U8x4);

        self.resizer
            .resize(&src_image, &mut dst_image, &self.options)
            .context("resize failed")?;

        let mut data = dst_image.into_vec();
        if self.snap_alpha {
            for px in data.chunks_exact_mut(4) {
                px[3] = if px[3] >= 128 { 255 } else { 0 };
            }
        }

        Ok(Image::new(self.target_width, self.target_height, ImageMode::Rgba, data)?)
    }

    pub fn target_width(&self) -> u32 {
        self.target_width
    }

    pub fn target_height(&self) -> u32 {
        self.target_height
    }
}

/// Largest size with the same aspect ratio that fits the cell grid.
/// Each cell row holds 2 pixels (half-block trick). Never upscales.
pub fn fit_dimensions(width: u32, height: u32, cols: u16, rows: u16) -> (u32, u32) {
    let max_width = (cols as u32).max(1);
    let max_height = (rows as u32 * 2).max(1);
    if width == 0 || height == 0 || (width <= max_width && height <= max_height) {
        return (width, height);
    }

    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let fit_width = ((width as f64 * scale).round() as u32).clamp(1, max_width);
    let fit_height = ((height as f64 * scale).round() as u32).clamp(1, max_height);
    (fit_width, fit_height)
}
