use std::fmt;

use crate::error::{Error, Result};

/// One RGBA pixel. Alpha 0 is transparent, anything else counts as opaque.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const SIZE: usize = 4;

    /// Opaque black, used wherever there is nothing else to show.
    pub const BLACK: Pixel = Pixel::rgb(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    pub fn to_bytes(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_bytes(b: &[u8]) -> Self {
        Self {
            r: b[0],
            g: b[1],
            b: b[2],
            a: b[3],
        }
    }
}

/// Channel layout of an image buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageMode {
    Luma,
    LumaAlpha,
    Rgb,
    Rgba,
}

impl ImageMode {
    pub fn channels(&self) -> usize {
        match self {
            ImageMode::Luma => 1,
            ImageMode::LumaAlpha => 2,
            ImageMode::Rgb => 3,
            ImageMode::Rgba => 4,
        }
    }
}

impl fmt::Display for ImageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageMode::Luma => "L",
            ImageMode::LumaAlpha => "LA",
            ImageMode::Rgb => "RGB",
            ImageMode::Rgba => "RGBA",
        };
        f.write_str(name)
    }
}

/// A decoded bitmap: width × height pixels, row-major, `mode.channels()` bytes each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    mode: ImageMode,
    data: Vec<u8>,
}

impl Image {
    /// Wrap a raw buffer, checking its length against the geometry.
    pub fn new(width: u32, height: u32, mode: ImageMode, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * mode.channels();
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            mode,
            data,
        })
    }

    /// RGBA image with every pixel set to `pixel`.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * Pixel::SIZE);
        for _ in 0..count {
            data.extend_from_slice(&pixel.to_bytes());
        }
        Self {
            width,
            height,
            mode: ImageMode::Rgba,
            data,
        }
    }

    /// RGBA image built from a per-coordinate function.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Pixel) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * Pixel::SIZE);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y).to_bytes());
            }
        }
        Self {
            width,
            height,
            mode: ImageMode::Rgba,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn mode(&self) -> ImageMode {
        self.mode
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Read the pixel at (x, y). RGBA images only.
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        let off = self.offset(x, y);
        Pixel::from_bytes(&self.data[off..off + Pixel::SIZE])
    }

    /// Overwrite the pixel at (x, y). RGBA images only.
    pub fn put_pixel(&mut self, x: u32, y: u32, pixel: Pixel) {
        let off = self.offset(x, y);
        self.data[off..off + Pixel::SIZE].copy_from_slice(&pixel.to_bytes());
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert_eq!(self.mode, ImageMode::Rgba);
        debug_assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        (y as usize * self.width as usize + x as usize) * Pixel::SIZE
    }
}
