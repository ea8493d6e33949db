//! Fixed timestep tick and session state machine
//!
//! `tick` is the only place session state mutates during play. Order within
//! one tick is fixed: flap input, clock advance, due deferred actions,
//! physics (a floor impact ends the tick), pipe scroll with pass scoring,
//! spawn, collision sweep. A pass scored in the same tick as a collision
//! stands: a fully-passed pipe can no longer overlap the bird, so the pass
//! geometrically preceded the hit.

use rand::Rng;

use crate::consts::*;

use super::physics::{self, BoundaryHit};
use super::pipes;
use super::scheduler::DeferredAction;
use super::state::{
    Bird, Commentary, COMMENTARY_LINES, GameEvent, GamePhase, GameState, TerminalCause,
};

/// Input commands sampled for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Flap requested since the last tick (pointer click or key)
    pub flap: bool,
}

/// Begin a session: `Idle | Over -> Playing`
///
/// Ignored while a session is active. The RNG stream is not reseeded, so a
/// restarted run sees a fresh pipe sequence.
pub fn start(state: &mut GameState) {
    if state.phase == GamePhase::Playing {
        return;
    }
    clear_session(state);
    state.phase = GamePhase::Playing;
    log::debug!("session started (seed {})", state.seed);
}

/// Abandon whatever is running: any state -> `Idle`
pub fn reset(state: &mut GameState) {
    clear_session(state);
    state.phase = GamePhase::Idle;
}

/// Overwrite the bird's velocity with the flap impulse
///
/// No effect unless a session is playing.
pub fn flap(state: &mut GameState) {
    if state.phase == GamePhase::Playing {
        physics::apply_flap(&mut state.bird);
    }
}

/// Advance the session by one fixed timestep
///
/// A no-op outside `Playing`: ticks arriving after a terminal transition
/// are ignored, not queued.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Playing {
        return events;
    }

    if input.flap {
        flap(state);
    }

    state.scheduler.advance();

    // Due one-shot actions first; a superseded generation is a safe no-op
    for (action, generation) in state.scheduler.take_due() {
        match action {
            DeferredAction::ClearCommentary => {
                if generation == state.commentary.generation && state.commentary.visible {
                    state.commentary.visible = false;
                    state.commentary.text = "";
                    events.push(GameEvent::CommentaryCleared);
                }
            }
        }
    }

    // Physics before any collision test against the new position. A ground
    // impact suppresses the rest of the tick.
    if physics::step_bird(&mut state.bird) == BoundaryHit::Floor {
        end_session(state, TerminalCause::GroundImpact, &mut events);
        return events;
    }

    // World scroll and pass scoring
    let passes = pipes::advance_pipes(&mut state.pipes, &state.bird);
    for _ in 0..passes {
        state.score += 1;
        events.push(GameEvent::Scored { score: state.score });
        if state.score.is_multiple_of(COMMENTARY_INTERVAL) {
            show_commentary(state, &mut events);
        }
    }

    // New pipes enter at the right edge and first move next tick
    if state.scheduler.spawn_due() {
        let pipe = pipes::spawn_pipe(&mut state.rng);
        events.push(GameEvent::PipeSpawned {
            gap_top: pipe.gap_top,
        });
        state.pipes.push(pipe);
    }

    // First collision wins; passes already scored this tick stand
    if pipes::first_collision(&state.pipes, &state.bird).is_some() {
        end_session(state, TerminalCause::PipeCollision, &mut events);
    }

    events
}

fn clear_session(state: &mut GameState) {
    state.score = 0;
    state.bird = Bird::new();
    state.pipes.clear();
    // Generation stays monotonic across sessions
    state.commentary = Commentary {
        generation: state.commentary.generation,
        ..Commentary::default()
    };
    state.scheduler.reset();
}

fn end_session(state: &mut GameState, cause: TerminalCause, events: &mut Vec<GameEvent>) {
    state.phase = GamePhase::Over;
    if state.score > state.high_score {
        state.high_score = state.score;
        log::info!("new high score: {}", state.high_score);
    }
    log::debug!("session over ({cause:?}), score {}", state.score);
    events.push(GameEvent::GameOver {
        cause,
        score: state.score,
        high_score: state.high_score,
    });
}

fn show_commentary(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let line = COMMENTARY_LINES[state.rng.random_range(0..COMMENTARY_LINES.len())];
    state.commentary.visible = true;
    state.commentary.text = line;
    state.commentary.generation += 1;
    state.scheduler.defer(
        COMMENTARY_SHOW_MS,
        state.commentary.generation,
        DeferredAction::ClearCommentary,
    );
    events.push(GameEvent::CommentaryShown { text: line });
}
