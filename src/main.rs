//! Skyflap entry point
//!
//! Headless demo: an autopilot plays one session against the simulation,
//! then the result flows through the persistence and leaderboard layers the
//! way an embedding frontend would drive them.

use std::cell::RefCell;
use std::time::{SystemTime, UNIX_EPOCH};

use skyflap::consts::*;
use skyflap::leaderboard::{
    Leaderboard, LeaderboardEntry, ScoreTransport, SyncTask, TransportError, run_task,
};
use skyflap::persistence::{
    FileStore, load_high_score, load_or_create_device_id, save_high_score,
};
use skyflap::sim::{GameEvent, GamePhase, GameState, TickInput, start, tick};

/// In-memory stand-in for the remote scores service
#[derive(Default)]
struct MemoryTransport {
    stored: RefCell<Vec<LeaderboardEntry>>,
}

impl ScoreTransport for MemoryTransport {
    fn fetch(&self) -> Result<Vec<LeaderboardEntry>, TransportError> {
        Ok(self.stored.borrow().clone())
    }

    fn push(&self, entries: &[LeaderboardEntry]) -> Result<(), TransportError> {
        *self.stored.borrow_mut() = entries.to_vec();
        Ok(())
    }
}

fn unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Flap when the bird's bottom edge falls past the center of the next gap
fn autopilot(state: &GameState) -> bool {
    let target = state
        .pipes
        .iter()
        .find(|p| p.trailing_edge() >= BIRD_X)
        .map(|p| p.gap_top + PIPE_GAP / 2.0)
        .unwrap_or(GAME_HEIGHT / 2.0);
    state.bird.pos.y + BIRD_SIZE > target && state.bird.velocity > 0.0
}

fn main() {
    env_logger::init();

    let mut store = FileStore::new(std::env::temp_dir().join("skyflap"));
    let device_id = match load_or_create_device_id(&mut store) {
        Ok(id) => Some(id),
        Err(e) => {
            log::warn!("no durable device id this run: {e}");
            None
        }
    };

    let mut state = GameState::new(unix_ms());
    state.high_score = load_high_score(&store);
    log::info!("previous best: {}", state.high_score);
    start(&mut state);

    // 20k ticks is a generous cap; the autopilot usually dies well before
    for _ in 0..20_000 {
        let input = TickInput {
            flap: autopilot(&state),
        };
        for event in tick(&mut state, &input) {
            match event {
                GameEvent::Scored { score } => log::debug!("score: {score}"),
                GameEvent::CommentaryShown { text } => println!("bird says: {text}"),
                GameEvent::GameOver {
                    cause,
                    score,
                    high_score,
                } => println!("game over ({cause:?}): score {score}, best {high_score}"),
                _ => {}
            }
        }
        if state.phase == GamePhase::Over {
            break;
        }
    }

    if let Err(e) = save_high_score(&mut store, state.high_score) {
        log::warn!("could not persist high score: {e}");
    }

    // Leaderboard round trip against a canned remote
    let transport = MemoryTransport::default();
    transport.stored.borrow_mut().extend([
        LeaderboardEntry {
            id: "seed-ace".into(),
            name: "Ace".into(),
            score: 12,
            created_at: 0.0,
            telegram_handle: "@ace".into(),
            device_id: None,
        },
        LeaderboardEntry {
            id: "seed-bo".into(),
            name: "Bo".into(),
            score: 4,
            created_at: 0.0,
            telegram_handle: "@bo".into(),
            device_id: None,
        },
    ]);

    let mut board = Leaderboard::new();
    board.apply(run_task(&transport, SyncTask::Fetch));
    println!(
        "provisional rank for {}: #{}",
        state.score,
        board.provisional_rank(state.score)
    );

    match board.submit("Autopilot", "@autopilot", state.score, device_id, unix_ms() as f64) {
        Ok((entry, push)) => {
            log::info!("submitted entry {}", entry.id);
            board.apply(run_task(&transport, push));
        }
        Err(e) => log::warn!("submit rejected: {e}"),
    }

    println!("-- leaderboard --");
    for (i, entry) in board.top(10).iter().enumerate() {
        println!("{:>2}. {:<12} {:>4}", i + 1, entry.name, entry.score);
    }
}
