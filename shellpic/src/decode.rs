use std::borrow::Cow;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use image::ImageFormat;
use shellpic_core::dispose::{Disposal, DisposalTracker, Region};
use shellpic_core::{Image, ImageMode, Pixel};

/// A canvas-sized RGBA frame ready for the renderer.
pub struct Frame {
    pub image: Image,
    pub dispose: Option<Image>,
    pub delay: Duration,
}

/// Frames of one input file, decoded one at a time.
pub struct Frames {
    width: u32,
    height: u32,
    source: Source,
}

enum Source {
    Still(Option<Frame>),
    Gif {
        decoder: gif::Decoder<BufReader<File>>,
        tracker: DisposalTracker,
    },
}

impl Frames {
    /// Open the file. GIFs are streamed frame by frame; anything else is
    /// decoded up front as a single frame.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        match ImageFormat::from_path(path) {
            Ok(ImageFormat::Gif) => Self::open_gif(path),
            _ => Self::open_still(path),
        }
    }

    fn open_still(path: &Path) -> anyhow::Result<Self> {
        let rgba = image::open(path)
            .with_context(|| format!("failed to decode {}", path.display()))?
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        let image = Image::new(width, height, ImageMode::Rgba, rgba.into_raw())?;
        Ok(Self {
            width,
            height,
            source: Source::Still(Some(Frame {
                image,
                dispose: None,
                delay: Duration::ZERO,
            })),
        })
    }

    fn open_gif(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::RGBA);
        let decoder = options
            .read_info(BufReader::new(file))
            .context("failed to read GIF header")?;

        let width = decoder.width() as u32;
        let height = decoder.height() as u32;
        log::debug!("GIF canvas {width}x{height}");

        Ok(Self {
            width,
            height,
            source: Source::Gif {
                decoder,
                tracker: DisposalTracker::new(),
            },
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether frames may carry transparency that reveals earlier frames.
    pub fn is_animation(&self) -> bool {
        matches!(self.source, Source::Gif { .. })
    }
}

impl Iterator for Frames {
    type Item = anyhow::Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        let (width, height) = (self.width, self.height);
        match &mut self.source {
            Source::Still(frame) => frame.take().map(Ok),
            Source::Gif { decoder, tracker } => {
                let frame = match decoder.read_next_frame() {
                    Ok(Some(frame)) => frame,
                    Ok(None) => return None,
                    Err(e) => return Some(Err(anyhow::Error::new(e).context("failed to decode GIF frame"))),
                };
                Some(next_gif_frame(width, height, frame, tracker))
            }
        }
    }
}

fn next_gif_frame(
    width: u32,
    height: u32,
    frame: &gif::Frame<'_>,
    tracker: &mut DisposalTracker,
) -> anyhow::Result<Frame> {
    let drawn = Region {
        left: frame.left as u32,
        top: frame.top as u32,
        width: frame.width as u32,
        height: frame.height as u32,
    };
    let (image, region) = place(width, height, drawn, &frame.buffer);
    let disposal = match frame.dispose {
        gif::DisposalMethod::Background => Disposal::Background,
        gif::DisposalMethod::Previous => Disposal::Previous,
        gif::DisposalMethod::Any | gif::DisposalMethod::Keep => Disposal::Keep,
    };

    let dispose = tracker.advance(&image, region, disposal)?;
    Ok(Frame {
        image,
        dispose,
        // GIF delays are in hundredths of a second
        delay: Duration::from_millis(frame.delay as u64 * 10),
    })
}

/// Paint an RGBA sub-image onto a transparent canvas, clipping it to the
/// canvas. Returns the canvas and the clipped region.
fn place(width: u32, height: u32, drawn: Region, buffer: &Cow<'_, [u8]>) -> (Image, Region) {
    let mut canvas = Image::filled(width, height, Pixel::new(0, 0, 0, 0));

    let left = drawn.left.min(width);
    let top = drawn.top.min(height);
    let right = (drawn.left + drawn.width).min(width);
    let bottom = (drawn.top + drawn.height).min(height);

    for y in top..bottom {
        for x in left..right {
            let src = (((y - drawn.top) * drawn.width + (x - drawn.left)) as usize) * Pixel::SIZE;
            if let Some(bytes) = buffer.get(src..src + Pixel::SIZE) {
                canvas.put_pixel(x, y, Pixel::from_bytes(bytes));
            }
        }
    }

    let region = Region {
        left,
        top,
        width: right - left,
        height: bottom - top,
    };
    (canvas, region)
}

/// Three-frame 2x2 GIF: red background (50ms), a blue pixel at (1, 1) that
/// disposes to background, then a green pixel at (0, 0).
#[cfg(test)]
pub(crate) fn write_test_gif(path: &Path) {
    let file = File::create(path).unwrap();
    let mut encoder = gif::Encoder::new(file, 2, 2, &[]).unwrap();

    let mut red = [255, 0, 0, 255].repeat(4);
    let mut frame = gif::Frame::from_rgba(2, 2, &mut red);
    frame.delay = 5;
    encoder.write_frame(&frame).unwrap();

    let mut blue = vec![0, 0, 255, 255];
    let mut frame = gif::Frame::from_rgba(1, 1, &mut blue);
    frame.left = 1;
    frame.top = 1;
    frame.dispose = gif::DisposalMethod::Background;
    encoder.write_frame(&frame).unwrap();

    let mut green = vec![0, 255, 0, 255];
    encoder.write_frame(&gif::Frame::from_rgba(1, 1, &mut green)).unwrap();
}
