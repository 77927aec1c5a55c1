use rand::Rng;

use crate::GridInt;

/// A single grid square.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: GridInt,
    pub y: GridInt,
}

impl Cell {
    pub fn new(x: GridInt, y: GridInt) -> Self {
        Cell { x, y }
    }
}

/// Fixed-size toroidal grid. Leaving one edge re-enters at the opposite one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Board {
    width: GridInt,
    height: GridInt,
}

impl Board {
    pub fn new(width: GridInt, height: GridInt) -> Self {
        Board { width, height }
    }

    pub fn width(&self) -> GridInt {
        self.width
    }

    pub fn height(&self) -> GridInt {
        self.height
    }

    pub fn center(&self) -> Cell {
        Cell::new(self.width / 2, self.height / 2)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Moves `cell` by `(dx, dy)`, wrapping both coordinates around the board.
    pub fn step(&self, cell: Cell, (dx, dy): (i32, i32)) -> Cell {
        let x = (cell.x as i32 + dx).rem_euclid(self.width as i32);
        let y = (cell.y as i32 + dy).rem_euclid(self.height as i32);
        Cell::new(x as GridInt, y as GridInt)
    }

    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Cell {
        Cell::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height))
    }
}
