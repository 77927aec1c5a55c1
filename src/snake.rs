use std::collections::VecDeque;

use anyhow::Result;
use rand::{seq::SliceRandom, Rng};

use crate::board::{Board, Cell};
use crate::render::{Canvas, Palette};
use Direction::*;
use MoveResult::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Cell, ate: bool },
    Reset,
}

pub struct Snake {
    cells: VecDeque<Cell>,
    direction: Direction,
    pending: Option<Direction>,
    target_len: usize,
    last: Option<Cell>,
}

impl Snake {
    /// A one-cell snake at `start`, heading right.
    pub fn new(start: Cell) -> Self {
        Snake {
            cells: VecDeque::from(vec![start]),
            direction: Right,
            pending: None,
            target_len: 1,
            last: None,
        }
    }

    /// Builds a snake from explicit cells, head first. The target length is the
    /// number of cells given.
    #[cfg(test)]
    pub fn from_cells(cells: Vec<Cell>, direction: Direction) -> Self {
        let target_len = cells.len();
        Snake { cells: cells.into(), direction, pending: None, target_len, last: None }
    }

    pub fn cells(&self) -> &VecDeque<Cell> {
        &self.cells
    }

    pub fn head(&self) -> Cell {
        self.cells[0]
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn target_len(&self) -> usize {
        self.target_len
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Tail cell left behind by the last move, for the renderer to erase.
    pub fn last(&self) -> Option<Cell> {
        self.last
    }

    /// Buffers a turn. Reversals of the committed direction are dropped.
    pub fn set_pending(&mut self, direction: Direction) {
        if direction != self.direction.opposite() {
            self.pending = Some(direction);
        }
    }

    pub fn commit(&mut self) {
        if let Some(dir) = self.pending.take() {
            self.direction = dir;
        }
    }

    /// Moves one cell in the committed direction, wrapping at the board edges.
    ///
    /// Reaching `food` raises the target length, so the tail is kept this tick.
    /// Running into the body resets the snake to the board center instead.
    pub fn advance<R: Rng>(&mut self, board: &Board, food: Cell, rng: &mut R) -> MoveResult {
        let new_head = board.step(self.head(), self.direction.delta());

        if self.cells.iter().skip(1).any(|cell| *cell == new_head) {
            self.reset(board.center(), rng);
            return Reset;
        }

        self.cells.push_front(new_head);

        let ate = new_head == food;
        if ate {
            self.grow();
        }

        self.last = if self.cells.len() > self.target_len {
            self.cells.pop_back()
        } else {
            self.cells.back().copied()
        };

        Moved { new_head, ate }
    }

    /// Raises the target length by one, keeping the tail on the next move.
    pub fn grow(&mut self) {
        self.target_len += 1;
    }

    fn reset<R: Rng>(&mut self, center: Cell, rng: &mut R) {
        self.target_len = 1;
        self.cells.clear();
        self.cells.push_back(center);
        self.pending = None;
        self.last = None;
        self.direction = *Direction::ALL.choose(rng).unwrap_or(&Right);
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C, palette: &Palette) -> Result<()> {
        for cell in self.cells() {
            canvas.draw_cell(*cell, palette.snake, palette.border)?;
        }
        Ok(())
    }
}
