use crate::cell;
use crate::compose::resolve;
use crate::error::{Error, Result};
use crate::image::{Image, ImageMode, Pixel};
use crate::quantize::ColorQuantizer;

const RESET: &str = "\x1b[0m";

/// Renders a sequence of frames (a still image or one animation) to
/// half-block text, carrying the previous-frame buffer between calls.
pub struct RenderSession<Q: ColorQuantizer> {
    quantizer: Q,
    previous: Option<Image>,
}

impl<Q: ColorQuantizer> RenderSession<Q> {
    pub fn new(quantizer: Q) -> Self {
        Self {
            quantizer,
            previous: None,
        }
    }

    /// What each pixel resolved to so far, once a frame has been rendered.
    pub fn previous_frame(&self) -> Option<&Image> {
        self.previous.as_ref()
    }

    /// Render one frame and return the text.
    pub fn render(&mut self, frame: &Image, dispose: Option<&Image>) -> Result<String> {
        let mut buf = String::new();
        self.render_into(frame, dispose, &mut buf)?;
        Ok(buf)
    }

    /// Render one frame, appending to `buf`.
    /// Nothing is appended and the session is left untouched on error.
    pub fn render_into(
        &mut self,
        frame: &Image,
        dispose: Option<&Image>,
        buf: &mut String,
    ) -> Result<()> {
        self.validate(frame, dispose)?;

        let (width, height) = frame.dimensions();
        let previous = self.previous.get_or_insert_with(|| {
            log::debug!("seeding previous-frame buffer at {width}x{height}");
            frame.clone()
        });

        // Cells are at most ~40 bytes in 24-bit mode.
        buf.reserve(width as usize * (height as usize).div_ceil(2) * 40);
        let start = buf.len();

        let even_height = height - height % 2;
        for y in (0..even_height).step_by(2) {
            for x in 0..width {
                let bg = resolve(frame, dispose, previous, x, y);
                let fg = resolve(frame, dispose, previous, x, y + 1);
                cell::encode(&self.quantizer, bg, fg, buf);
            }
            end_line(buf);
        }

        if height % 2 != 0 {
            for x in 0..width {
                let bg = resolve(frame, dispose, previous, x, height - 1);
                cell::encode(&self.quantizer, bg, Pixel::BLACK, buf);
            }
            end_line(buf);
        }

        log::trace!("rendered {width}x{height} frame into {} bytes", buf.len() - start);
        Ok(())
    }

    fn validate(&self, frame: &Image, dispose: Option<&Image>) -> Result<()> {
        if frame.mode() != ImageMode::Rgba {
            return Err(Error::InvalidImageMode(frame.mode()));
        }
        if let Some(dispose) = dispose {
            if dispose.mode() != ImageMode::Rgba {
                return Err(Error::InvalidImageMode(dispose.mode()));
            }
            if dispose.dimensions() != frame.dimensions() {
                return Err(Error::DimensionMismatch {
                    expected: frame.dimensions(),
                    actual: dispose.dimensions(),
                });
            }
        }
        if let Some(previous) = &self.previous {
            if previous.dimensions() != frame.dimensions() {
                return Err(Error::DimensionMismatch {
                    expected: previous.dimensions(),
                    actual: frame.dimensions(),
                });
            }
        }
        Ok(())
    }
}

fn end_line(buf: &mut String) {
    buf.push_str(RESET);
    buf.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantize::{Palette256, TrueColor};

    const CLEAR: Pixel = Pixel::new(0, 0, 0, 0);
    const RED: Pixel = Pixel::rgb(255, 0, 0);
    const GREEN: Pixel = Pixel::rgb(0, 255, 0);

    fn cell24(bg: (u8, u8, u8), fg: (u8, u8, u8)) -> String {
        format!(
            "\x1b[48;2;{};{};{};38;2;{};{};{}m\x08\u{2584} ",
            bg.0, bg.1, bg.2, fg.0, fg.1, fg.2
        )
    }

    #[test]
    fn red_square_truecolor() {
        let img = Image::filled(2, 2, RED);
        let out = RenderSession::new(TrueColor).render(&img, None).unwrap();
        let cell = cell24((255, 0, 0), (255, 0, 0));
        assert_eq!(out, format!("{cell}{cell}\x1b[0m\n"));
    }

    #[test]
    fn odd_height_pairs_last_row_with_black() {
        let img = Image::filled(1, 5, RED);
        let out = RenderSession::new(TrueColor).render(&img, None).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], format!("{}\x1b[0m", cell24((255, 0, 0), (0, 0, 0))));
        assert_eq!(lines[0], format!("{}\x1b[0m", cell24((255, 0, 0), (255, 0, 0))));
    }

    #[test]
    fn single_row_image() {
        let img = Image::filled(3, 1, GREEN);
        let out = RenderSession::new(Palette256).render(&img, None).unwrap();
        assert_eq!(out, format!("{}\x1b[0m\n", "\x1b[48;5;46;38;5;16m\x08\u{2584} ".repeat(3)));
    }

    #[test]
    fn empty_image_renders_nothing() {
        let img = Image::filled(0, 0, RED);
        assert_eq!(RenderSession::new(TrueColor).render(&img, None).unwrap(), "");
    }

    #[test]
    fn independent_sessions_agree() {
        let img = Image::from_fn(5, 4, |x, y| Pixel::rgb(x as u8 * 50, y as u8 * 60, 7));
        let a = RenderSession::new(Palette256).render(&img, None).unwrap();
        let b = RenderSession::new(Palette256).render(&img, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn transparent_first_frame_is_black() {
        let img = Image::filled(1, 2, Pixel::new(200, 10, 10, 0));
        let out = RenderSession::new(TrueColor).render(&img, None).unwrap();
        assert_eq!(out, format!("{}\x1b[0m\n", cell24((0, 0, 0), (0, 0, 0))));
    }

    #[test]
    fn dispose_fills_transparent_pixels() {
        let frame = Image::from_fn(1, 2, |_, y| if y == 0 { CLEAR } else { RED });
        let dispose = Image::filled(1, 2, GREEN);
        let mut session = RenderSession::new(TrueColor);
        let out = session.render(&frame, Some(&dispose)).unwrap();
        assert_eq!(out, format!("{}\x1b[0m\n", cell24((0, 255, 0), (255, 0, 0))));
    }

    #[test]
    fn transparent_pixel_keeps_previous_frame_color() {
        let mut session = RenderSession::new(TrueColor);
        let first = Image::from_fn(4, 4, |x, y| if (x, y) == (2, 3) { CLEAR } else { RED });
        let dispose = Image::filled(4, 4, GREEN);
        session.render(&first, Some(&dispose)).unwrap();
        assert_eq!(session.previous_frame().unwrap().pixel(2, 3), GREEN);

        let second = Image::from_fn(4, 4, |x, y| if (x, y) == (2, 3) { CLEAR } else { RED });
        let out = session.render(&second, None).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        let expected = format!(
            "{}{}{}{}\x1b[0m",
            cell24((255, 0, 0), (255, 0, 0)),
            cell24((255, 0, 0), (255, 0, 0)),
            cell24((255, 0, 0), (0, 255, 0)),
            cell24((255, 0, 0), (255, 0, 0)),
        );
        assert_eq!(lines[1], expected);
    }

    #[test]
    fn dispose_overrides_previous_frame() {
        let mut session = RenderSession::new(TrueColor);
        session.render(&Image::filled(1, 2, RED), None).unwrap();
        let out = session
            .render(&Image::filled(1, 2, CLEAR), Some(&Image::filled(1, 2, GREEN)))
            .unwrap();
        assert_eq!(out, format!("{}\x1b[0m\n", cell24((0, 255, 0), (0, 255, 0))));
    }

    #[test]
    fn rejects_non_rgba_frame() {
        let img = Image::new(1, 1, ImageMode::Rgb, vec![1, 2, 3]).unwrap();
        let mut session = RenderSession::new(TrueColor);
        assert_eq!(session.render(&img, None), Err(Error::InvalidImageMode(ImageMode::Rgb)));
        assert!(session.previous_frame().is_none());
    }

    #[test]
    fn rejects_mismatched_dispose_without_side_effects() {
        let mut session = RenderSession::new(TrueColor);
        session.render(&Image::filled(2, 2, RED), None).unwrap();

        let mut buf = String::new();
        let err = session
            .render_into(&Image::filled(2, 2, CLEAR), Some(&Image::filled(3, 2, GREEN)), &mut buf)
            .unwrap_err();
        assert_eq!(err, Error::DimensionMismatch { expected: (2, 2), actual: (3, 2) });
        assert!(buf.is_empty());
        assert_eq!(session.previous_frame().unwrap(), &Image::filled(2, 2, RED));
    }

    #[test]
    fn rejects_non_rgba_dispose() {
        let dispose = Image::new(1, 1, ImageMode::LumaAlpha, vec![0, 0]).unwrap();
        let err = RenderSession::new(Palette256)
            .render(&Image::filled(1, 1, RED), Some(&dispose))
            .unwrap_err();
        assert_eq!(err, Error::InvalidImageMode(ImageMode::LumaAlpha));
    }

    #[test]
    fn rejects_frame_resize_mid_session() {
        let mut session = RenderSession::new(TrueColor);
        session.render(&Image::filled(2, 2, RED), None).unwrap();
        let err = session.render(&Image::filled(2, 4, RED), None).unwrap_err();
        assert_eq!(err, Error::DimensionMismatch { expected: (2, 2), actual: (2, 4) });
    }
}
