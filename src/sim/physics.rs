//! Bird physics: gravity integration, flap impulse, boundary policy
//!
//! Semi-implicit Euler with a constant settle term: gravity accumulates
//! into velocity (clamped at terminal fall speed), the fresh velocity moves
//! the bird, and `GRAVITY_SETTLE` is added straight to the position every
//! tick. Both terms are deliberate tuning; changing either changes the feel
//! of the whole game.

use crate::consts::*;

use super::state::Bird;

/// Outcome of one integration step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryHit {
    None,
    /// Clamped to the top of the world; not lethal
    Ceiling,
    /// Ground impact; terminal
    Floor,
}

/// Advance the bird by one fixed timestep
///
/// The caller must treat `BoundaryHit::Floor` as a terminal condition in the
/// same tick.
pub fn step_bird(bird: &mut Bird) -> BoundaryHit {
    bird.velocity = (bird.velocity + GRAVITY_STEP).min(MAX_FALL_SPEED);

    let y = bird.pos.y + bird.velocity + GRAVITY_SETTLE;
    if y >= FLOOR_Y {
        bird.pos.y = FLOOR_Y;
        return BoundaryHit::Floor;
    }
    if y < 0.0 {
        bird.pos.y = 0.0;
        return BoundaryHit::Ceiling;
    }
    bird.pos.y = y;
    BoundaryHit::None
}

/// Overwrite velocity with the flap impulse
///
/// Not additive: a flap discards any accumulated fall speed. Phase gating
/// lives in the state machine, not here.
pub fn apply_flap(bird: &mut Bird) {
    bird.velocity = FLAP_IMPULSE;
}

/// Visual tilt for the renderer, in degrees. Pure function of velocity,
/// not part of simulation state.
#[inline]
pub fn rotation_degrees(velocity: f32) -> f32 {
    velocity * 2.0
}
