use crate::board::{Board, Cell};
use crate::input::{collect_intents, InputSource, PolledInput};
use crate::render::{Canvas, Rgb};
use crate::TermInt;
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{bail, Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};
use log::debug;

const TITLE: &str = "Snake";
const CELL_GLYPH: &str = "[]";

/// Terminal columns used by one grid cell.
const CELL_COLS: TermInt = 2;

/// Crossterm-backed canvas. The board is drawn centered, inside a
/// one-character border.
pub struct TermManager {
    board: Board,
    background: Rgb,
    origin: (TermInt, TermInt),
    stdout: Stdout,
}

impl TermManager {
    pub fn new(board: Board, background: Rgb) -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        let needed = (board.width() * CELL_COLS + 2, board.height() + 2);

        if width < needed.0 || height < needed.1 {
            bail!(
                "Terminal is {}x{} but a {}x{} board needs at least {}x{}",
                width, height, board.width(), board.height(), needed.0, needed.1
            );
        }

        let origin = ((width - needed.0) / 2, (height - needed.1) / 2);
        debug!("terminal {}x{}, board origin at {:?}", width, height, origin);

        Ok(TermManager { board, background, origin, stdout: stdout() })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen, terminal::SetTitle(TITLE))
            .context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error setting raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
            .context("Error hiding cursor")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("Error setting raw mode")?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking)
            .context("Error showing cursor")?;
        execute!(self.stdout, LeaveAlternateScreen).context("Error leaving alt screen")?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_borders(&mut self) -> Result<()> {
        let (x0, y0) = self.origin;
        let end_x = x0 + self.board.width() * CELL_COLS + 1;
        let end_y = y0 + self.board.height() + 1;

        for x in x0..=end_x {
            let ch = if x == x0 || x == end_x {'+'} else {'-'};
            self.print_at((x, y0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in y0 + 1..end_y {
            self.print_at((x0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        Ok(())
    }

    fn print_at(&mut self, pos: (TermInt, TermInt), ch: char) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        Ok(())
    }

    fn cell_origin(&self, cell: Cell) -> (TermInt, TermInt) {
        (self.origin.0 + 1 + cell.x * CELL_COLS, self.origin.1 + 1 + cell.y)
    }
}

impl Canvas for TermManager {
    fn clear_board(&mut self) -> Result<()> {
        queue!(self.stdout, style::ResetColor, terminal::Clear(ClearType::All))
            .context("Error clearing")?;
        self.draw_borders()?;

        let background = self.background;
        for y in 0..self.board.height() {
            for x in 0..self.board.width() {
                self.draw_cell(Cell::new(x, y), background, background)?;
            }
        }

        Ok(())
    }

    fn draw_cell(&mut self, cell: Cell, fill: Rgb, border: Rgb) -> Result<()> {
        let (x, y) = self.cell_origin(cell);
        queue!(
            self.stdout,
            cursor::MoveTo(x, y),
            style::SetBackgroundColor(color(fill)),
            style::SetForegroundColor(color(border)),
            style::Print(CELL_GLYPH),
            style::ResetColor
        )?;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }
}

/// Key events read from the terminal. Needs raw mode, see `TermManager::setup`.
pub struct Keyboard;

impl Keyboard {
    pub fn read_key_events_queue(&self) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1)).context("Error polling events")? {
            if let Event::Key(ev) = read().context("Error reading event")? {
                events.push(ev);
            }
        }

        Ok(events)
    }
}

impl InputSource for Keyboard {
    fn poll_events(&mut self) -> Result<PolledInput> {
        Ok(collect_intents(self.read_key_events_queue()?))
    }
}

fn color(rgb: Rgb) -> style::Color {
    style::Color::Rgb { r: rgb.0, g: rgb.1, b: rgb.2 }
}
