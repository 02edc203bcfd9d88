//! Terminal presenter for draw batches.
//!
//! The cell grid is scaled to fit the terminal, keeping the frame's
//! proportions on tall character cells. The whole batch is assembled into a
//! single buffer of ANSI escape sequences and written at once to keep
//! flicker down.
//!
//! In mirrored (selfie) mode the column order is reversed so the picture
//! reads like a mirror, while each glyph is still written upright and
//! therefore stays legible.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};

use crate::glyph::{grid_size, Rgb};
use crate::transcoder::{DrawBatch, Presenter};

/// Typical terminal character cell height to width ratio.
pub const DEFAULT_CHAR_ASPECT: f32 = 2.0;

/// Terminal area `(cols, rows)` a grid of square cells should occupy so the
/// picture keeps its proportions on `char_aspect`-tall character cells.
///
/// Fits the frame into `max_cols x max_rows` but never upscales beyond one
/// terminal cell per grid cell. Returns `(0, 0)` for an empty frame or
/// viewport.
pub fn fit_grid(
    width: u32,
    height: u32,
    cell_size: u32,
    max_cols: u16,
    max_rows: u16,
    char_aspect: f32,
) -> (u16, u16) {
    let (grid_cols, grid_rows) = grid_size(width, height, cell_size);
    if grid_cols == 0 || grid_rows == 0 || max_cols == 0 || max_rows == 0 {
        return (0, 0);
    }

    // Columns per row that reproduce the frame's shape on screen
    let target = (width as f32 / height as f32) * char_aspect;

    let by_width = (max_cols as f32 / target).round() as u16;
    let (cols, rows) = if by_width > 0 && by_width <= max_rows {
        (max_cols, by_width)
    } else {
        let cols = ((max_rows as f32 * target).round() as u16).min(max_cols);
        (cols.max(1), max_rows)
    };

    (
        cols.min(grid_cols.min(u16::MAX as u32) as u16),
        rows.min(grid_rows.min(u16::MAX as u32) as u16),
    )
}

/// Where a batch's cell grid lands in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub grid_cols: u32,
    pub grid_rows: u32,
    /// Terminal columns and rows actually used
    pub cols: u16,
    pub rows: u16,
    pub mirror: bool,
}

impl GridLayout {
    /// 0-based terminal column and row for grid cell `(col, row)`.
    ///
    /// Several grid cells share a terminal cell when the grid is larger than
    /// the fitted area.
    pub fn position(&self, col: u32, row: u32) -> Option<(u16, u16)> {
        if self.cols == 0 || self.rows == 0 || col >= self.grid_cols || row >= self.grid_rows {
            return None;
        }
        let mut term_col = (col as u64 * self.cols as u64 / self.grid_cols as u64) as u16;
        let term_row = (row as u64 * self.rows as u64 / self.grid_rows as u64) as u16;
        if self.mirror {
            term_col = self.cols - 1 - term_col;
        }
        Some((term_col, term_row))
    }
}

/// Renders batches as 24-bit colour text on a terminal (or any writer).
///
/// The batch grid is scaled into the viewport, corrected for the height of
/// a character cell. When several grid cells fall on one terminal cell the
/// first one in the batch is drawn.
pub struct TerminalPresenter<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    mirror: bool,
    char_aspect: f32,
    /// Reused output buffer
    buf: String,
    /// Terminal cells already drawn this batch
    taken: Vec<bool>,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, cols: u16, rows: u16, mirror: bool) -> Self {
        Self {
            out,
            cols,
            rows,
            mirror,
            char_aspect: DEFAULT_CHAR_ASPECT,
            buf: String::new(),
            taken: Vec::new(),
        }
    }

    /// Use a different character cell height to width ratio.
    pub fn with_char_aspect(mut self, char_aspect: f32) -> Self {
        self.char_aspect = char_aspect;
        self
    }

    /// Update the visible area the grid is fitted into.
    pub fn set_viewport(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    pub fn viewport(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Layout of `batch` in the current viewport.
    pub fn layout(&self, batch: &DrawBatch) -> GridLayout {
        let (grid_cols, grid_rows) = grid_size(batch.width, batch.height, batch.cell_size);
        let (cols, rows) = fit_grid(
            batch.width,
            batch.height,
            batch.cell_size,
            self.cols,
            self.rows,
            self.char_aspect,
        );
        GridLayout {
            grid_cols,
            grid_rows,
            cols,
            rows,
            mirror: self.mirror,
        }
    }

    /// Terminal column and row (0-based) for the cell at pixel `(x, y)`.
    pub fn cell_position(&self, batch: &DrawBatch, x: u32, y: u32) -> Option<(u16, u16)> {
        if batch.cell_size == 0 {
            return None;
        }
        self.layout(batch)
            .position(x / batch.cell_size, y / batch.cell_size)
    }

    /// Build the escape sequence stream for a batch without writing it.
    pub fn render(&mut self, batch: &DrawBatch) -> &str {
        let mut output = std::mem::take(&mut self.buf);
        output.clear();

        // Hide cursor during rendering to reduce flicker
        output.push_str("\x1b[?25l");

        let bg = batch.background;
        let _ = write!(output, "\x1b[48;2;{};{};{}m\x1b[2J", bg.r, bg.g, bg.b);

        let layout = self.layout(batch);
        self.taken.clear();
        self.taken
            .resize(layout.cols as usize * layout.rows as usize, false);

        let mut last_fg: Option<Rgb> = None;
        if batch.cell_size > 0 {
            for instr in &batch.instructions {
                let Some((col, row)) =
                    layout.position(instr.x / batch.cell_size, instr.y / batch.cell_size)
                else {
                    continue;
                };
                let slot = row as usize * layout.cols as usize + col as usize;
                if std::mem::replace(&mut self.taken[slot], true) {
                    continue;
                }
                let fg = instr.color.to_rgb().blend_over(bg, instr.opacity);

                // 1-based ANSI coordinates
                let _ = write!(output, "\x1b[{};{}H", row + 1, col + 1);
                if last_fg != Some(fg) {
                    let _ = write!(output, "\x1b[38;2;{};{};{}m", fg.r, fg.g, fg.b);
                    last_fg = Some(fg);
                }
                output.push(instr.glyph);
            }
        }

        output.push_str("\x1b[0m");
        output.push_str("\x1b[?25h");

        self.buf = output;
        &self.buf
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn present(&mut self, batch: &DrawBatch) -> io::Result<()> {
        self.render(batch);
        self.out.write_all(self.buf.as_bytes())?;
        self.out.flush()
    }
}

/// Static flag to track if the terminal is in raw mode (for the panic hook)
static TERMINAL_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Raw mode plus alternate screen, restored on drop or panic.
pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        TERMINAL_ACTIVE.store(true, Ordering::SeqCst);
        if let Err(e) = crossterm::execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            TERMINAL_ACTIVE.store(false, Ordering::SeqCst);
            return Err(e);
        }

        Ok(Self { active: true })
    }

    /// Restore the terminal now. Dropping afterwards is a no-op.
    pub fn exit(&mut self) -> io::Result<()> {
        if self.active {
            self.active = false;
            TERMINAL_ACTIVE.store(false, Ordering::SeqCst);
            crossterm::execute!(io::stdout(), LeaveAlternateScreen)?;
            disable_raw_mode()?;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.exit();
    }
}

/// Install (once) a panic hook that restores the terminal before the
/// panic message is printed.
fn install_panic_hook() {
    static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);
    if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        if TERMINAL_ACTIVE.swap(false, Ordering::SeqCst) {
            let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
        original_hook(panic_info);
    }));
}
