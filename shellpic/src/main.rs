mod decode;
mod resize;

use std::io::{BufWriter, Write};
use std::iter::Peekable;
use std::path::PathBuf;
use std::thread;

use clap::Parser;
use crossterm::terminal;

use shellpic_core::control::{clear_screen, move_cursor, restore_cursor, save_cursor};
use shellpic_core::{ColorDepth, ColorQuantizer, Palette256, RenderSession, TrueColor};

use crate::decode::{Frame, Frames};
use crate::resize::FrameResizer;

#[derive(Parser)]
#[command(name = "shellpic", about = "Display images and animations in the terminal")]
struct Cli {
    /// Image file to display
    input: PathBuf,

    /// Color depth in bits: 8 (256-color palette) or 24 (true color)
    #[arg(short, long, default_value_t = 24)]
    depth: u8,

    /// Maximum width in terminal columns (default: terminal width)
    #[arg(long)]
    cols: Option<u16>,

    /// Maximum height in terminal rows (default: terminal height)
    #[arg(long)]
    rows: Option<u16>,

    /// Render at the image's own size
    #[arg(long)]
    no_scale: bool,

    /// Play animation frames back to back, ignoring frame delays
    #[arg(long)]
    no_delay: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let depth = ColorDepth::try_from(cli.depth)?;
    let frames = Frames::open(&cli.input)?;
    log::debug!(
        "{}: {}x{} pixels, {}-bit color",
        cli.input.display(),
        frames.width(),
        frames.height(),
        depth.bits()
    );

    let resizer = if cli.no_scale {
        None
    } else {
        let (cols, rows) = target_cells(&cli);
        let (width, height) = (frames.width(), frames.height());
        let resizer = if frames.is_animation() {
            FrameResizer::nearest(width, height, cols, rows)
        } else {
            FrameResizer::smooth(width, height, cols, rows)
        };
        log::debug!(
            "scaling {width}x{height} to {}x{} pixels",
            resizer.target_width(),
            resizer.target_height()
        );
        Some(resizer)
    };

    let stdout = std::io::stdout();
    let mut stdout = BufWriter::with_capacity(256 * 1024, stdout.lock());
    let mut player = Player {
        frames: frames.peekable(),
        resizer,
        stdout: &mut stdout,
        delays: !cli.no_delay,
    };

    match depth {
        ColorDepth::Palette256 => player.play(RenderSession::new(Palette256)),
        ColorDepth::TrueColor => player.play(RenderSession::new(TrueColor)),
    }
}

/// Cell grid to fit into: explicit flags, else the terminal size.
fn target_cells(cli: &Cli) -> (u16, u16) {
    let (term_cols, term_rows) = match terminal::size() {
        Ok(size) => size,
        Err(e) => {
            log::warn!("could not query terminal size ({e}), assuming 80x24");
            (80, 24)
        }
    };
    // The overstruck cell layout spills one column past the image, and the
    // last row is left for the prompt.
    (
        cli.cols.unwrap_or(term_cols.saturating_sub(1)),
        cli.rows.unwrap_or(term_rows.saturating_sub(1)),
    )
}

struct Player<'a, W: Write> {
    frames: Peekable<Frames>,
    resizer: Option<FrameResizer>,
    stdout: &'a mut W,
    delays: bool,
}

impl<W: Write> Player<'_, W> {
    /// Decode, scale, render and write frames one at a time.
    fn play<Q: ColorQuantizer>(&mut self, mut session: RenderSession<Q>) -> anyhow::Result<()> {
        let mut render_buf = String::with_capacity(256 * 1024);
        let mut animated = false;
        let mut idx = 0usize;

        while let Some(frame) = self.frames.next() {
            let frame = self.scale(frame?)?;

            // One frame of lookahead tells a still image from an animation.
            if idx == 0 && self.frames.peek().is_some() {
                animated = true;
                render_buf.push_str(clear_screen());
                render_buf.push_str(&move_cursor(1, 1));
                render_buf.push_str(save_cursor());
            } else if animated {
                render_buf.push_str(restore_cursor());
                render_buf.push_str(&move_cursor(1, 1));
            }
            session.render_into(&frame.image, frame.dispose.as_ref(), &mut render_buf)?;

            self.stdout.write_all(render_buf.as_bytes())?;
            self.stdout.flush()?;
            render_buf.clear();

            if animated && self.delays {
                thread::sleep(frame.delay);
            }
            idx += 1;
        }

        log::debug!("played {idx} frame(s)");
        Ok(())
    }

    fn scale(&mut self, frame: Frame) -> anyhow::Result<Frame> {
        let Some(resizer) = &mut self.resizer else {
            return Ok(frame);
        };
        let dispose = match &frame.dispose {
            Some(dispose) => Some(resizer.resize(dispose)?),
            None => None,
        };
        Ok(Frame {
            image: resizer.resize(&frame.image)?,
            dispose,
            delay: frame.delay,
        })
    }
}
