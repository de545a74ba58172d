//! The engine owns the game state and is the only thing that mutates it.
//!
//! Timers and the keyboard deliver `Event`s one at a time through
//! [`Engine::advance`]; each event is applied in full before the call
//! returns. Renderers only ever see `&GameState`.

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::compute;
use crate::entities::{GameState, GameStatus, Playfield};

/// Everything that can drive the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    MoveLeft,
    MoveRight,
    Shoot,
    TogglePause,
    Restart,
    EnemyTick,
    BulletTick,
    LifeLostTick,
}

/// What an `advance` call changed, as seen from outside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub status: GameStatus,
    pub score: u32,
    /// Change in lives; negative on hits, positive on restart.
    pub lives_delta: i32,
}

#[derive(Debug)]
pub struct Engine<R = StdRng> {
    state: GameState,
    rng: R,
}

impl Engine<StdRng> {
    /// A fresh game on the default playfield, seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(Playfield::default(), StdRng::from_entropy())
    }
}

impl Default for Engine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Engine<R> {
    pub fn with_rng(field: Playfield, rng: R) -> Self {
        Self::from_state(compute::init_state(field), rng)
    }

    /// Resume from an arbitrary state.
    pub fn from_state(state: GameState, rng: R) -> Self {
        Self { state, rng }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn advance(&mut self, event: Event) -> Outcome {
        let next = compute::advance(&self.state, event, &mut self.rng);
        let before = std::mem::replace(&mut self.state, next);
        let after = &self.state;

        if before.status != after.status {
            log_transition(&before, after, event);
        }

        Outcome {
            status: after.status,
            score: after.score,
            lives_delta: after.lives as i32 - before.lives as i32,
        }
    }
}

fn log_transition(before: &GameState, after: &GameState, event: Event) {
    match after.status {
        GameStatus::LifeLost => info!("life lost, {} remaining", after.lives),
        GameStatus::Won => info!("formation cleared, final score {}", after.score),
        GameStatus::Lost => info!("game over, final score {}", after.score),
        GameStatus::Paused => info!("paused"),
        GameStatus::Playing if event == Event::Restart => info!("game restarted"),
        GameStatus::Playing => info!("resumed from {:?}", before.status),
    }
}
