use thiserror::Error;

use crate::Coord;

/// Rejected engine configuration. Raised once, at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("board must be at least 1x1, got {width}x{height}")]
    EmptyBoard { width: Coord, height: Coord },

    #[error("tick interval must be positive")]
    ZeroTickInterval,

    #[error("initial snake length must be positive")]
    EmptySnake,

    #[error("a snake of length {length} does not fit on a board {width} cells wide")]
    SnakeDoesNotFit { length: usize, width: Coord },

    #[error("a {width}x{height} board leaves no room for food beside a snake of length {length}")]
    NoRoomForFood { length: usize, width: Coord, height: Coord },

    #[error("speed-up factor must be in (0, 1], got {0}")]
    InvalidSpeedUp(f64),

    #[error("minimum tick interval ({min_ms} ms) is above the base interval ({base_ms} ms)")]
    MinIntervalAboveBase { min_ms: u64, base_ms: u64 },

    #[error("foods per level must be positive")]
    ZeroFoodsPerLevel,

    #[error("a score of {score_per_food} per food overflows on a board this large")]
    ScoreOverflow { score_per_food: u32 },
}

/// Every cell of the board is taken by the snake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no free cell left on the board")]
pub struct NoFreeCellError;
