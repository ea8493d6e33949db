//! Game state and core simulation types
//!
//! The session is owned by the state machine in `tick`; physics and pipe
//! logic borrow it for the duration of one tick and never retain it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Aabb;
use super::scheduler::Scheduler;
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// No session running (initial, or after an explicit reset)
    Idle,
    /// Active gameplay
    Playing,
    /// Session ended on a terminal collision
    Over,
}

/// What ended the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalCause {
    GroundImpact,
    PipeCollision,
}

/// The player-controlled bird
///
/// Horizontal position is fixed at `BIRD_X`; the world scrolls past it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bird {
    pub pos: Vec2,
    pub velocity: f32,
}

impl Bird {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(BIRD_X, BIRD_START_Y),
            velocity: 0.0,
        }
    }

    /// Collision box at the current position
    pub fn aabb(&self) -> Aabb {
        Aabb::new(
            self.pos,
            Vec2::new(self.pos.x + BIRD_SIZE, self.pos.y + BIRD_SIZE),
        )
    }
}

impl Default for Bird {
    fn default() -> Self {
        Self::new()
    }
}

/// A pipe pair: two barriers with a fixed-height gap between them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    /// Left edge; strictly decreasing over the pipe's lifetime
    pub x: f32,
    /// Top of the gap, fixed at spawn
    pub gap_top: f32,
    /// Flips true exactly once, when the trailing edge clears the bird
    pub passed: bool,
}

impl Pipe {
    pub fn trailing_edge(&self) -> f32 {
        self.x + PIPE_WIDTH
    }

    /// Barrier above the gap
    pub fn top_region(&self) -> Aabb {
        Aabb::new(
            Vec2::new(self.x, 0.0),
            Vec2::new(self.x + PIPE_WIDTH, self.gap_top),
        )
    }

    /// Barrier below the gap
    pub fn bottom_region(&self) -> Aabb {
        Aabb::new(
            Vec2::new(self.x, self.gap_top + PIPE_GAP),
            Vec2::new(self.x + PIPE_WIDTH, GAME_HEIGHT),
        )
    }

    /// Fully scrolled off the left edge, ready to retire
    pub fn offscreen(&self) -> bool {
        self.trailing_edge() < 0.0
    }
}

/// Messages the bird barks every `COMMENTARY_INTERVAL` points
pub const COMMENTARY_LINES: &[&str] = &["LFG", "Pump it!", "To the moon!", "On a roll!"];

/// Transient commentary bubble
///
/// `generation` increases on every activation; a deferred clear carries the
/// generation it was scheduled for and is a no-op once superseded.
#[derive(Debug, Clone, Default)]
pub struct Commentary {
    pub visible: bool,
    pub text: &'static str,
    pub generation: u64,
}

/// Events produced by one call into the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PipeSpawned { gap_top: f32 },
    Scored { score: u32 },
    CommentaryShown { text: &'static str },
    CommentaryCleared,
    GameOver {
        cause: TerminalCause,
        score: u32,
        high_score: u32,
    },
}

/// Complete session state
///
/// Mutated only through the operations in `tick`; no component keeps a
/// reference across ticks.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u32,
    /// Monotonically non-decreasing across sessions; persisted by the embedder
    pub high_score: u32,
    pub bird: Bird,
    /// Ordered oldest-first; `x` strictly decreases so this is also spatial order
    pub pipes: Vec<Pipe>,
    pub commentary: Commentary,
    pub scheduler: Scheduler,
    /// Seeded RNG; keeps drawing across restarts so runs differ
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create an idle session with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            phase: GamePhase::Idle,
            score: 0,
            high_score: 0,
            bird: Bird::new(),
            pipes: Vec::new(),
            commentary: Commentary::default(),
            scheduler: Scheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}
