use crate::compose::resolve;
use crate::error::{Error, Result};
use crate::image::{Image, ImageMode, Pixel};

/// What happens to a frame's area once the next frame is due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposal {
    /// Leave the frame in place.
    Keep,
    /// Clear the frame's area to the background.
    Background,
    /// Restore what was visible before the frame was drawn.
    Previous,
}

/// Area of the canvas an animation frame actually draws to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            width,
            height,
        }
    }

    fn fits(&self, width: u32, height: u32) -> bool {
        self.left.checked_add(self.width).is_some_and(|r| r <= width)
            && self.top.checked_add(self.height).is_some_and(|b| b <= height)
    }
}

/// Turns per-frame disposal metadata into the dispose image each frame should
/// be rendered against, by tracking the composed canvas itself.
#[derive(Default)]
pub struct DisposalTracker {
    canvas: Option<Image>,
    /// Backdrop under the last frame, kept only when it disposes to `Previous`.
    backdrop: Option<Image>,
    last: Option<(Region, Disposal)>,
}

impl DisposalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next canvas-sized frame and get its dispose image back.
    ///
    /// `region` and `disposal` describe this frame; the returned image follows
    /// from the disposal of the frame before it.
    pub fn advance(
        &mut self,
        frame: &Image,
        region: Region,
        disposal: Disposal,
    ) -> Result<Option<Image>> {
        if frame.mode() != ImageMode::Rgba {
            return Err(Error::InvalidImageMode(frame.mode()));
        }
        if let Some(canvas) = &self.canvas {
            if canvas.dimensions() != frame.dimensions() {
                return Err(Error::DimensionMismatch {
                    expected: canvas.dimensions(),
                    actual: frame.dimensions(),
                });
            }
        }
        if !region.fits(frame.width(), frame.height()) {
            return Err(Error::RegionOutOfBounds);
        }

        let dispose = match (self.last, &self.canvas) {
            (Some((last, Disposal::Background)), Some(canvas)) => {
                let mut cleared = canvas.clone();
                for y in last.top..last.top + last.height {
                    for x in last.left..last.left + last.width {
                        cleared.put_pixel(x, y, Pixel::BLACK);
                    }
                }
                Some(cleared)
            }
            (Some((_, Disposal::Previous)), _) => self.backdrop.take(),
            _ => None,
        };

        let canvas = self.canvas.get_or_insert_with(|| frame.clone());
        self.backdrop = match disposal {
            Disposal::Previous => Some(dispose.clone().unwrap_or_else(|| canvas.clone())),
            _ => None,
        };

        for y in 0..frame.height() {
            for x in 0..frame.width() {
                resolve(frame, dispose.as_ref(), canvas, x, y);
            }
        }

        log::trace!("frame {region:?} disposes to {disposal:?}");
        self.last = Some((region, disposal));
        Ok(dispose)
    }
}
