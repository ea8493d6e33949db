//! Tick-derived clock, spawn cadence and deferred one-shot actions
//!
//! Time is derived from the tick counter, so the whole simulation stays
//! deterministic. Deferred actions carry the generation they were scheduled
//! for; an action whose generation has been superseded must be treated as a
//! safe no-op by the consumer.

use crate::consts::{PIPE_SPAWN_MS, TICK_MS};

/// Work a one-shot deferred action asks the state machine to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    ClearCommentary,
}

#[derive(Debug, Clone, Copy)]
struct Deferred {
    due_ms: u64,
    generation: u64,
    action: DeferredAction,
}

/// Owns simulation time for one session
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    time_ticks: u64,
    last_spawn_ms: u64,
    deferred: Vec<Deferred>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one fixed timestep
    pub fn advance(&mut self) {
        self.time_ticks += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Session time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.time_ticks * TICK_MS
    }

    /// True once per spawn period; arms the next period when it fires
    pub fn spawn_due(&mut self) -> bool {
        if self.now_ms() - self.last_spawn_ms >= PIPE_SPAWN_MS {
            self.last_spawn_ms = self.now_ms();
            true
        } else {
            false
        }
    }

    /// Schedule a one-shot action `delay_ms` from now, tagged with the
    /// generation it belongs to
    pub fn defer(&mut self, delay_ms: u64, generation: u64, action: DeferredAction) {
        self.deferred.push(Deferred {
            due_ms: self.now_ms() + delay_ms,
            generation,
            action,
        });
    }

    /// Remove and return every action due by now, in scheduling order
    pub fn take_due(&mut self) -> Vec<(DeferredAction, u64)> {
        let now = self.now_ms();
        let mut due = Vec::new();
        self.deferred.retain(|d| {
            if d.due_ms <= now {
                due.push((d.action, d.generation));
                false
            } else {
                true
            }
        });
        due
    }

    /// Drop all pending work and restart the clock for a fresh session
    pub fn reset(&mut self) {
        self.time_ticks = 0;
        self.last_spawn_ms = 0;
        self.deferred.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_cadence() {
        let mut sched = Scheduler::new();
        let mut spawns = 0;
        // 210 ticks = 5040 ms: periods complete at 2520 and 5040
        for _ in 0..210 {
            sched.advance();
            if sched.spawn_due() {
                spawns += 1;
            }
        }
        assert_eq!(spawns, 2);
    }

    #[test]
    fn test_deferred_fires_once_at_deadline() {
        let mut sched = Scheduler::new();
        sched.defer(100, 1, DeferredAction::ClearCommentary);

        while sched.now_ms() < 100 {
            assert!(sched.take_due().is_empty());
            sched.advance();
        }
        assert_eq!(
            sched.take_due(),
            vec![(DeferredAction::ClearCommentary, 1)]
        );
        assert!(sched.take_due().is_empty());
    }

    #[test]
    fn test_reset_cancels_pending_work() {
        let mut sched = Scheduler::new();
        sched.defer(10, 1, DeferredAction::ClearCommentary);
        sched.reset();
        for _ in 0..10 {
            sched.advance();
        }
        assert!(sched.take_due().is_empty());
        assert_eq!(sched.ticks(), 10);
    }
}
