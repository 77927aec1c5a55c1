use anyhow::Result;
use log::debug;
use rand::Rng;

use crate::board::{Board, Cell};
use crate::render::{Canvas, Palette};

pub struct Food {
    position: Cell,
}

impl Food {
    pub fn new<R: Rng>(board: &Board, rng: &mut R) -> Self {
        Food { position: board.random_cell(rng) }
    }

    #[cfg(test)]
    pub fn at(position: Cell) -> Self {
        Food { position }
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    /// Moves the food to a random cell. Cells under the snake are not excluded.
    pub fn relocate<R: Rng>(&mut self, board: &Board, rng: &mut R) {
        self.position = board.random_cell(rng);
        debug_assert!(board.contains(self.position));
        debug!("food relocated to ({}, {})", self.position.x, self.position.y);
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C, palette: &Palette) -> Result<()> {
        canvas.draw_cell(self.position, palette.food, palette.border)
    }
}
