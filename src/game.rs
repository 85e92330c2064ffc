use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Instant;

use log::{debug, info};
use rand::Rng;

use crate::engine::{Engine, GameSnapshot, RunState, TickEvent};
use crate::intent::Intent;

/// Single consumer of player intents. Ticks and intents are handled on the
/// same thread, so a snapshot never observes a half-applied tick.
pub struct SnakeGame<R> {
    engine: Engine<R>,
    intents: Receiver<Intent>,
}

impl<R: Rng> SnakeGame<R> {
    pub fn new(engine: Engine<R>, intents: Receiver<Intent>) -> Self {
        SnakeGame { engine, intents }
    }

    pub fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    /// Runs until a `Quit` intent arrives or every sender is gone, calling
    /// `redraw` after each tick and each intent that changed the game.
    pub fn play<F>(&mut self, mut redraw: F) -> anyhow::Result<()>
    where
        F: FnMut(&GameSnapshot) -> anyhow::Result<()>,
    {
        redraw(&self.engine.snapshot())?;

        let mut next_tick: Option<Instant> = None;

        loop {
            // The clock only runs while the game does; unpausing or starting
            // waits a full interval before the first step.
            next_tick = match (self.engine.state(), next_tick) {
                (RunState::Running, Some(deadline)) => Some(deadline),
                (RunState::Running, None) => Some(Instant::now() + self.engine.tick_interval()),
                _ => None,
            };

            let received = match next_tick {
                Some(deadline) => {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match self.intents.recv_timeout(wait) {
                        Ok(intent) => Some(intent),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match self.intents.recv() {
                    Ok(intent) => Some(intent),
                    Err(_) => break,
                },
            };

            match received {
                Some(Intent::Quit) => {
                    info!("quit requested");
                    break;
                }
                Some(intent) => {
                    if self.engine.apply(intent) {
                        redraw(&self.engine.snapshot())?;
                    }
                }
                None => {
                    if let TickEvent::Ate = self.engine.tick() {
                        debug!("tick interval now {:?}", self.engine.tick_interval());
                    }
                    next_tick = Some(Instant::now() + self.engine.tick_interval());
                    redraw(&self.engine.snapshot())?;
                }
            }
        }

        Ok(())
    }
}
