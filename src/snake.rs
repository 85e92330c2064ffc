use crate::{Cell, Coord};
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn delta(self) -> (Coord, Coord) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        matches!((self, other), (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right))
    }

    pub fn head_char(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

/// Ordered body cells, head first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Cell>,
    heading: Direction,
}

impl Snake {
    /// Lays `size` segments out behind `head`, opposite to `heading`.
    pub fn new(head: Cell, size: usize, heading: Direction) -> Self {
        let (dx, dy) = heading.delta();

        let body = (0..size as Coord)
            .map(|i| (head.0 - dx * i, head.1 - dy * i))
            .collect();
        Snake { body, heading }
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// A single-segment snake has no neck to run into, so it may reverse.
    pub fn accepts_turn(&self, direction: Direction) -> bool {
        self.body.len() <= 1 || !direction.is_opposite(self.heading)
    }

    pub fn turn(&mut self, direction: Direction) -> bool {
        let accepted = self.accepts_turn(direction);
        if accepted {
            self.heading = direction;
        }
        accepted
    }

    pub fn next_head(&self) -> Cell {
        let (dx, dy) = self.heading.delta();
        let head = self.head();
        (head.0 + dx, head.1 + dy)
    }

    /// Whether moving onto `next` hits a segment that stays in place. The
    /// tail is vacated in the same step unless the snake is growing.
    pub fn bites_itself(&self, next: Cell, growing: bool) -> bool {
        let remaining = if growing { self.body.len() } else { self.body.len() - 1 };
        self.body[..remaining].contains(&next)
    }

    /// Moves the head onto `next`. Returns the vacated tail cell, if any.
    pub fn advance(&mut self, next: Cell, grow: bool) -> Option<Cell> {
        self.body.insert(0, next);

        if grow {
            None
        } else {
            self.body.pop()
        }
    }
}
