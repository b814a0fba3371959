use crate::error::Error;
use crate::image::Pixel;

/// Maps a resolved pixel to a terminal color and knows how to spell it as SGR
/// parameters (the part after `48;` / `38;`).
pub trait ColorQuantizer {
    type Color: Copy;

    fn quantize(&self, pixel: Pixel) -> Self::Color;

    fn write_params(&self, color: Self::Color, buf: &mut String);
}

/// xterm 256-color palette, restricted to the 6×6×6 cube (16..=231).
#[derive(Clone, Copy, Debug, Default)]
pub struct Palette256;

impl Palette256 {
    /// Inverse of xterm's 256colres.pl cube levels, rounding down to the
    /// bucket below. Alpha is ignored.
    pub fn index(r: u8, g: u8, b: u8) -> u8 {
        16 + 36 * level(r) + 6 * level(g) + level(b)
    }
}

fn level(c: u8) -> u8 {
    if c > 55 {
        (c - 55) / 40
    } else {
        0
    }
}

impl ColorQuantizer for Palette256 {
    type Color = u8;

    fn quantize(&self, pixel: Pixel) -> u8 {
        Palette256::index(pixel.r, pixel.g, pixel.b)
    }

    fn write_params(&self, color: u8, buf: &mut String) {
        buf.push_str("5;");
        write_u8(buf, color);
    }
}

/// 24-bit direct color: channels pass through untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrueColor;

impl ColorQuantizer for TrueColor {
    type Color = (u8, u8, u8);

    fn quantize(&self, pixel: Pixel) -> (u8, u8, u8) {
        (pixel.r, pixel.g, pixel.b)
    }

    fn write_params(&self, (r, g, b): (u8, u8, u8), buf: &mut String) {
        buf.push_str("2;");
        write_u8(buf, r);
        buf.push(';');
        write_u8(buf, g);
        buf.push(';');
        write_u8(buf, b);
    }
}

/// Runtime color depth selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorDepth {
    Palette256,
    TrueColor,
}

impl ColorDepth {
    pub fn bits(&self) -> u8 {
        match self {
            ColorDepth::Palette256 => 8,
            ColorDepth::TrueColor => 24,
        }
    }
}

impl TryFrom<u8> for ColorDepth {
    type Error = Error;

    fn try_from(bits: u8) -> Result<Self, Error> {
        match bits {
            8 => Ok(ColorDepth::Palette256),
            24 => Ok(ColorDepth::TrueColor),
            other => Err(Error::UnimplementedQuantizer(other)),
        }
    }
}

/// Integer-to-ASCII for u8 values (0-255), no allocation.
fn write_u8(buf: &mut String, v: u8) {
    if v >= 100 {
        buf.push((b'0' + v / 100) as char);
        buf.push((b'0' + (v / 10) % 10) as char);
        buf.push((b'0' + v % 10) as char);
    } else if v >= 10 {
        buf.push((b'0' + v / 10) as char);
        buf.push((b'0' + v % 10) as char);
    } else {
        buf.push((b'0' + v) as char);
    }
}
