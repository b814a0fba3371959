use crate::image::Pixel;
use crate::quantize::ColorQuantizer;

/// Lower half block: foreground paints the bottom pixel, background the top one.
pub const HALF_BLOCK: char = '\u{2584}';

/// Backspace before the glyph overstrikes it onto the previous cell position.
const BACKSPACE: char = '\x08';

/// Append one cell: `ESC[48;<bg>;38;<fg>m` BS `▄` SP.
pub fn encode<Q: ColorQuantizer>(quantizer: &Q, bg: Pixel, fg: Pixel, buf: &mut String) {
    buf.push_str("\x1b[48;");
    quantizer.write_params(quantizer.quantize(bg), buf);
    buf.push_str(";38;");
    quantizer.write_params(quantizer.quantize(fg), buf);
    buf.push('m');
    buf.push(BACKSPACE);
    buf.push(HALF_BLOCK);
    buf.push(' ');
}
