use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::board::Cell;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Colors used to paint the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: Rgb,
    pub border: Rgb,
    pub food: Rgb,
    pub snake: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            background: Rgb(0, 0, 0),
            border: Rgb(93, 216, 228),
            food: Rgb(255, 0, 0),
            snake: Rgb(0, 255, 0),
        }
    }
}

/// A drawing surface addressed in grid cells.
///
/// Nothing is guaranteed to be visible until `present` is called.
pub trait Canvas {
    fn clear_board(&mut self) -> Result<()>;
    fn draw_cell(&mut self, cell: Cell, fill: Rgb, border: Rgb) -> Result<()>;
    fn present(&mut self) -> Result<()>;
}
