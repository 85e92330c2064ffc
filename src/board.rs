use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::NoFreeCellError;
use crate::{Cell, Coord};

/// Play-field geometry. Cells run from `(0, 0)` to `(width - 1, height - 1)`,
/// `y` growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    width: Coord,
    height: Coord,
}

impl Board {
    pub fn new(width: Coord, height: Coord) -> Self {
        Board { width, height }
    }

    pub fn width(&self) -> Coord {
        self.width
    }

    pub fn height(&self) -> Coord {
        self.height
    }

    pub fn center(&self) -> Cell {
        (self.width / 2, self.height / 2)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.0) && (0..self.height).contains(&cell.1)
    }

    pub fn is_free(&self, cell: Cell, snake: &[Cell], food: Option<Cell>) -> bool {
        self.contains(cell) && !snake.contains(&cell) && food != Some(cell)
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y)))
    }

    /// Picks a free cell uniformly at random.
    pub fn random_free_cell<R: Rng + ?Sized>(
        &self,
        snake: &[Cell],
        food: Option<Cell>,
        rng: &mut R,
    ) -> Result<Cell, NoFreeCellError> {
        let choices: Vec<Cell> = self.cells().filter(|&cell| self.is_free(cell, snake, food)).collect();
        choices.choose(rng).copied().ok_or(NoFreeCellError)
    }
}
