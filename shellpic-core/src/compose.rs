use crate::image::{Image, Pixel};

/// Resolve the color shown at (x, y) and record it in `previous`.
///
/// A transparent frame pixel reveals, in order: the dispose image, whatever an
/// earlier frame left in `previous`, or opaque black. A transparent pixel in
/// `previous` means nothing has been rendered there yet. The resolved pixel is
/// always written back so the next frame sees it instead of the raw source.
/// A transparent dispose pixel is shown with its own RGB, but once written back
/// it reads as unrendered, so a later frame without a dispose image shows black.
pub fn resolve(
    frame: &Image,
    dispose: Option<&Image>,
    previous: &mut Image,
    x: u32,
    y: u32,
) -> Pixel {
    let mut rgba = frame.pixel(x, y);
    if rgba.is_transparent() {
        rgba = match dispose {
            Some(dispose) => dispose.pixel(x, y),
            None => {
                let prev = previous.pixel(x, y);
                if prev.is_transparent() {
                    Pixel::BLACK
                } else {
                    prev
                }
            }
        };
    }
    previous.put_pixel(x, y, rgba);
    rgba
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR: Pixel = Pixel::new(9, 9, 9, 0);
    const RED: Pixel = Pixel::rgb(255, 0, 0);
    const BLUE: Pixel = Pixel::rgb(0, 0, 255);

    #[test]
    fn opaque_pixel_wins() {
        let frame = Image::filled(1, 1, RED);
        let dispose = Image::filled(1, 1, BLUE);
        let mut prev = Image::filled(1, 1, BLUE);
        assert_eq!(resolve(&frame, Some(&dispose), &mut prev, 0, 0), RED);
        assert_eq!(prev.pixel(0, 0), RED);
    }

    #[test]
    fn partial_alpha_counts_as_opaque() {
        let frame = Image::filled(1, 1, Pixel::new(10, 20, 30, 1));
        let mut prev = Image::filled(1, 1, BLUE);
        assert_eq!(resolve(&frame, None, &mut prev, 0, 0), Pixel::new(10, 20, 30, 1));
    }

    #[test]
    fn dispose_beats_previous() {
        let frame = Image::filled(1, 1, CLEAR);
        let dispose = Image::filled(1, 1, BLUE);
        let mut prev = Image::filled(1, 1, RED);
        assert_eq!(resolve(&frame, Some(&dispose), &mut prev, 0, 0), BLUE);
        assert_eq!(prev.pixel(0, 0), BLUE);
    }

    #[test]
    fn previous_used_without_dispose() {
        let frame = Image::filled(1, 1, CLEAR);
        let mut prev = Image::filled(1, 1, RED);
        assert_eq!(resolve(&frame, None, &mut prev, 0, 0), RED);
    }

    #[test]
    fn nothing_rendered_falls_back_to_black() {
        let frame = Image::filled(1, 1, CLEAR);
        // self-seeded buffer: previous is the transparent frame itself
        let mut prev = frame.clone();
        assert_eq!(resolve(&frame, None, &mut prev, 0, 0), Pixel::BLACK);
        assert_eq!(prev.pixel(0, 0), Pixel::BLACK);
    }

    #[test]
    fn transparent_dispose_pixel_is_not_remembered() {
        let frame = Image::filled(1, 1, CLEAR);
        let dispose = Image::filled(1, 1, Pixel::new(40, 50, 60, 0));
        let mut prev = Image::filled(1, 1, RED);

        assert_eq!(resolve(&frame, Some(&dispose), &mut prev, 0, 0), Pixel::new(40, 50, 60, 0));
        assert_eq!(prev.pixel(0, 0), Pixel::new(40, 50, 60, 0));
        assert_eq!(resolve(&frame, None, &mut prev, 0, 0), Pixel::BLACK);
    }
}
