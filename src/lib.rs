//! Retro Shooter - a fixed-tick terminal arcade shooter
//!
//! Core modules:
//! - `entities`: Pure data (positions, playfield, formation, game state)
//! - `compute`: Pure state transitions (movement, firing, collisions, status)
//! - `engine`: The single owning entry point the shell drives with events
//! - `scheduler`: Periodic tick timers that feed the engine

pub mod compute;
pub mod engine;
pub mod entities;
pub mod scheduler;

pub use engine::{Engine, Event, Outcome};
pub use entities::{Formation, GameState, GameStatus, Playfield, Position};

/// Compile-time game tuning
pub mod consts {
    use std::time::Duration;

    /// Playfield dimensions (cells)
    pub const FIELD_WIDTH: i32 = 50;
    pub const FIELD_HEIGHT: i32 = 15;

    /// Enemy formation shape
    pub const ENEMY_ROW_COUNT: i32 = 5;
    pub const ENEMY_COLUMN_COUNT: i32 = 10;
    /// Empty cells between neighbouring enemies in a row
    pub const ENEMY_SPACING: i32 = 1;

    /// The player steps over one enemy slot at a time
    pub const PLAYER_MOVE_INCREMENT: i32 = ENEMY_SPACING + 1;

    pub const STARTING_LIVES: u32 = 3;

    /// Score per enemy destroyed
    pub const ENEMY_HIT_SCORE: u32 = 10;
    /// Score per enemy bullet shot down
    pub const BULLET_HIT_SCORE: u32 = 5;

    /// Enemy fire chance per enemy tick, as a ratio
    pub const ENEMY_FIRE_NUMERATOR: u32 = 1;
    pub const ENEMY_FIRE_DENOMINATOR: u32 = 3;

    /// Number of LifeLost ticks the player glyph flashes for
    pub const LIFE_LOST_TICKS: u32 = 6;

    /// Timer periods
    pub const ENEMY_TICK: Duration = Duration::from_millis(500);
    pub const BULLET_TICK: Duration = Duration::from_millis(100);
    pub const LIFE_LOST_TICK: Duration = Duration::from_millis(200);

    /// Maximum firings of one timer per poll, so a stalled frame can not
    /// flood the engine with stale ticks
    pub const MAX_CATCHUP_TICKS: u32 = 4;
}
