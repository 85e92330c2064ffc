//! Terminal Snake.
//!
//! The engine (`board`, `snake`, `engine`) is pure in-memory simulation and
//! knows nothing about terminals. `intent`, `game` and `term` are the thin
//! input, scheduling and drawing layers the binary wires around it.

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod intent;
pub mod snake;
pub mod term;

pub type Coord = i32;
pub type Cell = (Coord, Coord);

pub use board::Board;
pub use config::GameConfig;
pub use engine::{Engine, GameSnapshot, Outcome, RunState, TickEvent};
pub use error::{ConfigError, NoFreeCellError};
pub use intent::Intent;
pub use snake::{Direction, Snake};
