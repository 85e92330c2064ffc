//! The game engine: snake, food, score and the run-state machine, advanced
//! one tick at a time.
//!
//! ```text
//! Ready --start--> Running <--toggle_pause--> Paused
//!                  Running --collision / board filled--> GameOver
//! GameOver --start--> Running
//! ```

use std::time::Duration;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;

use crate::board::Board;
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::intent::Intent;
use crate::snake::{Direction, Snake};
use crate::{Cell, Coord};

const INITIAL_HEADING: Direction = Direction::Right;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Ready,
    Running,
    Paused,
    GameOver,
}

/// Why a game ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    HitWall,
    HitSelf,
    /// The snake covers every cell. This is the win condition.
    BoardFilled,
}

impl Outcome {
    pub fn is_win(self) -> bool {
        self == Outcome::BoardFilled
    }
}

/// What a single [`Engine::tick`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickEvent {
    /// Not running; nothing changed.
    Idle,
    Moved,
    Ate,
    Over(Outcome),
}

/// Render-ready copy of the engine state.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSnapshot {
    pub state: RunState,
    /// Head first. Empty before the first game starts.
    pub snake: Vec<Cell>,
    pub heading: Option<Direction>,
    pub food: Option<Cell>,
    pub score: u64,
    pub level: u32,
    pub width: Coord,
    pub height: Coord,
    /// Ticks applied since the current game started
    pub ticks: u64,
    pub tick_interval: Duration,
    pub outcome: Option<Outcome>,
}

pub struct Engine<R = StdRng> {
    config: GameConfig,
    board: Board,
    rng: R,
    state: RunState,
    snake: Option<Snake>,
    food: Option<Cell>,
    score: u64,
    foods_eaten: u32,
    ticks: u64,
    queued: Option<Direction>,
    outcome: Option<Outcome>,
}

impl<R: Rng> Engine<R> {
    pub fn new(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Engine {
            board: Board::new(config.width, config.height),
            config,
            rng,
            state: RunState::Ready,
            snake: None,
            food: None,
            score: 0,
            foods_eaten: 0,
            ticks: 0,
            queued: None,
            outcome: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.foods_eaten / self.config.foods_per_level + 1
    }

    /// Current interval between ticks, shortened by every food eaten.
    pub fn tick_interval(&self) -> Duration {
        self.config.tick_interval_after(self.foods_eaten)
    }

    /// Begins a game from `Ready` or `GameOver`. Ignored mid-game; see
    /// [`Engine::restart`] for that. Returns whether a game was started.
    pub fn start(&mut self) -> bool {
        match self.state {
            RunState::Ready | RunState::GameOver => {
                self.new_game();
                true
            }
            RunState::Running | RunState::Paused => false,
        }
    }

    /// Discards the current game, whatever its state, and starts over.
    pub fn restart(&mut self) {
        self.new_game();
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.state = match self.state {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
            RunState::Ready | RunState::GameOver => return false,
        };

        debug!("{:?} at tick {}", self.state, self.ticks);
        true
    }

    /// Queues a heading change for the next tick, replacing any change queued
    /// earlier. A reversal into the snake's own neck is dropped.
    pub fn enqueue_direction(&mut self, direction: Direction) -> bool {
        if !matches!(self.state, RunState::Running | RunState::Paused) {
            return false;
        }

        let accepted = match &self.snake {
            Some(snake) => snake.accepts_turn(direction),
            None => false,
        };

        if accepted {
            self.queued = Some(direction);
        } else {
            debug!("ignoring reversal to {:?}", direction);
        }
        accepted
    }

    /// Applies an input intent. `Start` depends on the state: it begins a
    /// game from `Ready`, resumes from `Paused` and restarts after
    /// `GameOver`. `Quit` is left to the caller.
    ///
    /// Returns whether the snapshot changed in a way worth redrawing.
    pub fn apply(&mut self, intent: Intent) -> bool {
        if let Some(direction) = intent.direction() {
            self.enqueue_direction(direction);
            return false;
        }

        match intent {
            Intent::Pause => self.toggle_pause(),
            Intent::Start => match self.state {
                RunState::Paused => self.toggle_pause(),
                _ => self.start(),
            },
            Intent::Restart => {
                self.restart();
                true
            }
            _ => false,
        }
    }

    /// Advances the simulation by one cell. Does nothing unless running.
    pub fn tick(&mut self) -> TickEvent {
        if self.state != RunState::Running {
            return TickEvent::Idle;
        }

        let snake = match self.snake.as_mut() {
            Some(snake) => snake,
            None => return TickEvent::Idle,
        };

        if let Some(direction) = self.queued.take() {
            snake.turn(direction);
        }
        self.ticks += 1;

        let next = snake.next_head();

        if !self.board.contains(next) {
            return self.game_over(Outcome::HitWall);
        }

        let eating = self.food == Some(next);

        if snake.bites_itself(next, eating) {
            return self.game_over(Outcome::HitSelf);
        }

        snake.advance(next, eating);

        if !eating {
            return TickEvent::Moved;
        }

        self.score += self.config.score_per_food as u64;
        self.foods_eaten += 1;
        debug!("ate food at {:?}, score {}", next, self.score);

        match self.board.random_free_cell(snake.body(), None, &mut self.rng) {
            Ok(food) => {
                self.food = Some(food);
                TickEvent::Ate
            }
            Err(_) => {
                self.food = None;
                self.game_over(Outcome::BoardFilled)
            }
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            state: self.state,
            snake: self.snake.as_ref().map(|s| s.body().to_vec()).unwrap_or_default(),
            heading: self.snake.as_ref().map(Snake::heading),
            food: self.food,
            score: self.score,
            level: self.level(),
            width: self.board.width(),
            height: self.board.height(),
            ticks: self.ticks,
            tick_interval: self.tick_interval(),
            outcome: self.outcome,
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn new_game(&mut self) {
        let snake = Snake::new(self.board.center(), self.config.initial_length, INITIAL_HEADING);
        let food = self.board.random_free_cell(snake.body(), None, &mut self.rng).ok();

        self.snake = Some(snake);
        self.food = food;
        self.score = 0;
        self.foods_eaten = 0;
        self.ticks = 0;
        self.queued = None;
        self.outcome = None;
        self.state = RunState::Running;

        info!("new game on a {}x{} board", self.board.width(), self.board.height());

        // Only reachable with a board the config validation would refuse.
        if self.food.is_none() {
            self.game_over(Outcome::BoardFilled);
        }
    }

    fn game_over(&mut self, outcome: Outcome) -> TickEvent {
        self.state = RunState::GameOver;
        self.outcome = Some(outcome);
        self.queued = None;

        info!("game over ({:?}) after {} ticks, score {}", outcome, self.ticks, self.score);
        TickEvent::Over(outcome)
    }
}
