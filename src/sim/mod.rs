//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod physics;
pub mod pipes;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use collision::{Aabb, bird_hits_pipe};
pub use physics::{BoundaryHit, rotation_degrees};
pub use scheduler::{DeferredAction, Scheduler};
pub use state::{
    Bird, COMMENTARY_LINES, Commentary, GameEvent, GamePhase, GameState, Pipe, TerminalCause,
};
pub use tick::{TickInput, flap, reset, start, tick};
