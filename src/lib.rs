//! Skyflap - a flap-to-fly obstacle gauntlet with a shared high-score board
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, pipes, collisions, session state machine)
//! - `leaderboard`: Local/remote score record merging, ranking and submission
//! - `persistence`: Durable player profile (high score, device id, saved identity)

pub mod leaderboard;
pub mod persistence;
pub mod sim;

pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use sim::{GameEvent, GamePhase, GameState, TickInput};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds
    pub const TICK_MS: u64 = 24;

    /// World dimensions (the world scrolls; the bird does not move horizontally)
    pub const GAME_WIDTH: f32 = 320.0;
    pub const GAME_HEIGHT: f32 = 600.0;
    pub const GROUND_HEIGHT: f32 = 64.0;

    /// Bird defaults - fixed column, square collision box
    pub const BIRD_X: f32 = 50.0;
    pub const BIRD_START_Y: f32 = 250.0;
    pub const BIRD_SIZE: f32 = 25.0;

    /// Per-tick gravity accumulated into velocity
    pub const GRAVITY_STEP: f32 = 0.5;
    /// Constant per-tick settle term applied straight to position
    pub const GRAVITY_SETTLE: f32 = 0.6;
    /// Terminal fall speed
    pub const MAX_FALL_SPEED: f32 = 8.0;
    /// Velocity a flap overwrites (not adds) into the bird
    pub const FLAP_IMPULSE: f32 = -7.0;

    /// Pipe defaults
    pub const PIPE_WIDTH: f32 = 60.0;
    pub const PIPE_GAP: f32 = 150.0;
    pub const PIPE_SCROLL_SPEED: f32 = 2.0;
    pub const PIPE_SPAWN_MS: u64 = 2500;
    /// Lowest legal gap top; keeps the upper barrier visible
    pub const GAP_TOP_MIN: f32 = 50.0;

    /// Commentary fires on every Nth point
    pub const COMMENTARY_INTERVAL: u32 = 4;
    /// How long a commentary bubble stays up
    pub const COMMENTARY_SHOW_MS: u64 = 2000;

    /// Highest y the bird's top edge can rest at (ground level minus the bird)
    pub const FLOOR_Y: f32 = GAME_HEIGHT - GROUND_HEIGHT - BIRD_SIZE;
}
