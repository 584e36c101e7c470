use std::io::{self, IsTerminal, Write};

use chipvm_core::MonochromeDisplay;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};

const LIT: char = '█';
const UNLIT: char = ' ';

/// Holds the terminal in raw mode on the alternate screen until dropped.
/// When stdout is not a terminal nothing is changed and frames are printed
/// one after another.
pub struct TerminalGuard {
    use_tty: bool,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        let mut out = io::stdout();
        let use_tty = out.is_terminal();
        if use_tty {
            crossterm::terminal::enable_raw_mode()?;
            crossterm::execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        }
        Ok(Self { use_tty })
    }

    pub fn use_tty(&self) -> bool {
        self.use_tty
    }

    pub fn present<const W: usize, const H: usize>(
        &self,
        display: &MonochromeDisplay<W, H>,
    ) -> io::Result<()> {
        let mut out = io::stdout().lock();
        if self.use_tty {
            render(&mut out, display)
        } else {
            writeln!(out, "{}", frame_text(display))?;
            out.flush()
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.use_tty {
            let mut out = io::stdout();
            let _ = crossterm::execute!(out, Show, LeaveAlternateScreen);
            let _ = crossterm::terminal::disable_raw_mode();
        }
    }
}

fn row_text(row: &[bool]) -> String {
    row.iter().map(|&lit| if lit { LIT } else { UNLIT }).collect()
}

/// Text form of `display`, one line per pixel row.
pub fn frame_text<const W: usize, const H: usize>(display: &MonochromeDisplay<W, H>) -> String {
    let mut text = String::with_capacity((W + 1) * H * LIT.len_utf8());
    for row in display.pixels().chunks(W) {
        text.push_str(&row_text(row));
        text.push('\n');
    }
    text
}

/// Redraws `display` in place from the top-left corner. Raw mode does not
/// return the carriage on newline, so every row is positioned explicitly.
pub fn render<Out: Write, const W: usize, const H: usize>(
    out: &mut Out,
    display: &MonochromeDisplay<W, H>,
) -> io::Result<()> {
    for (row, pixels) in display.pixels().chunks(W).enumerate() {
        crossterm::queue!(
            out,
            MoveTo(0, row as u16),
            Clear(ClearType::CurrentLine)
        )?;
        write!(out, "{}", row_text(pixels))?;
    }
    out.flush()
}
