//! Shared high-score board
//!
//! The local list is the source of truth for the current device; the remote
//! service is an opaque list-of-records store reached through
//! [`ScoreTransport`]. Submits append locally first and hand the transport
//! work back to the embedder as a [`SyncTask`], so the simulation never
//! waits on the network. Transport failures are logged and never roll back
//! local state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single score record; immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// Globally unique, generated client-side
    pub id: String,
    pub name: String,
    pub score: u32,
    /// Unix timestamp (ms) when the entry was created
    pub created_at: f64,
    pub telegram_handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

/// POST body for the remote scores endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoresEnvelope {
    pub entries: Vec<LeaderboardEntry>,
}

/// Rejected before the board mutates
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("player name is required")]
    MissingName,
    #[error("telegram handle is required")]
    MissingHandle,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Failed(String),
    #[error("unexpected status {0}")]
    Status(u16),
}

/// Opaque remote list-of-records service
///
/// Wire shape: `GET {base}/scores` returns a JSON array of entries;
/// `POST {base}/scores` takes a [`ScoresEnvelope`] and upserts the set.
pub trait ScoreTransport {
    fn fetch(&self) -> Result<Vec<LeaderboardEntry>, TransportError>;
    fn push(&self, entries: &[LeaderboardEntry]) -> Result<(), TransportError>;
}

/// Transport work the embedder runs off the simulation path
#[derive(Debug, Clone, PartialEq)]
pub enum SyncTask {
    /// Upload the full local list
    Push(Vec<LeaderboardEntry>),
    /// Download the remote list for merging
    Fetch,
}

/// Result of a finished [`SyncTask`], fed back through [`Leaderboard::apply`]
#[derive(Debug)]
pub enum SyncOutcome {
    Pushed,
    PushFailed(TransportError),
    Fetched(Vec<LeaderboardEntry>),
    FetchFailed(TransportError),
}

/// Execute one sync task against a transport
///
/// Never fails: errors become outcomes the board logs and survives.
pub fn run_task(transport: &dyn ScoreTransport, task: SyncTask) -> SyncOutcome {
    match task {
        SyncTask::Push(entries) => match transport.push(&entries) {
            Ok(()) => SyncOutcome::Pushed,
            Err(e) => SyncOutcome::PushFailed(e),
        },
        SyncTask::Fetch => match transport.fetch() {
            Ok(entries) => SyncOutcome::Fetched(entries),
            Err(e) => SyncOutcome::FetchFailed(e),
        },
    }
}

/// Merged, ranked score list
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The slice shown above the fold
    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..self.entries.len().min(n)]
    }

    /// Record a new score locally and hand back the upload task
    ///
    /// Name and handle must be non-blank; validation happens before anything
    /// mutates. The entry gets a fresh unique id and the caller's timestamp.
    pub fn submit(
        &mut self,
        name: &str,
        telegram_handle: &str,
        score: u32,
        device_id: Option<String>,
        now_ms: f64,
    ) -> Result<(LeaderboardEntry, SyncTask), SubmitError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SubmitError::MissingName);
        }
        let telegram_handle = telegram_handle.trim();
        if telegram_handle.is_empty() {
            return Err(SubmitError::MissingHandle);
        }

        let entry = LeaderboardEntry {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            score,
            created_at: now_ms,
            telegram_handle: telegram_handle.to_string(),
            device_id,
        };
        self.entries.push(entry.clone());
        self.sort();
        log::debug!("submitted score {score} as {name}");
        Ok((entry, SyncTask::Push(self.entries.clone())))
    }

    /// Union the remote list into the local one
    ///
    /// Remote entries are kept as-is; a local entry survives only if its id
    /// is absent remotely, so a stale local duplicate never shadows the
    /// remote copy. The union is re-ranked descending by score.
    pub fn merge_remote(&mut self, remote: Vec<LeaderboardEntry>) {
        let mut merged = remote;
        for local in self.entries.drain(..) {
            if !merged.iter().any(|e| e.id == local.id) {
                merged.push(local);
            }
        }
        self.entries = merged;
        self.sort();
    }

    /// Consume a finished sync; failures are logged and otherwise ignored
    pub fn apply(&mut self, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Pushed => {}
            SyncOutcome::PushFailed(e) => {
                log::warn!("leaderboard push failed, keeping local copy: {e}");
            }
            SyncOutcome::Fetched(remote) => self.merge_remote(remote),
            SyncOutcome::FetchFailed(e) => {
                log::warn!("leaderboard fetch failed: {e}");
            }
        }
    }

    /// Where a live score would land, 1-indexed
    ///
    /// Position of the first entry scoring no more than `score`; past the
    /// end if every entry beats it.
    pub fn provisional_rank(&self, score: u32) -> usize {
        match self.entries.iter().position(|e| e.score <= score) {
            Some(i) => i + 1,
            None => self.entries.len() + 1,
        }
    }

    /// Descending by score; stable, so ties keep their prior relative order
    fn sort(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn entry(id: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            id: id.to_string(),
            name: format!("player-{id}"),
            score,
            created_at: 1_700_000_000_000.0,
            telegram_handle: format!("@{id}"),
            device_id: None,
        }
    }

    fn board(entries: Vec<LeaderboardEntry>) -> Leaderboard {
        let mut board = Leaderboard::new();
        board.merge_remote(entries);
        board
    }

    /// In-memory stand-in for the remote service
    #[derive(Default)]
    struct FakeTransport {
        stored: RefCell<Vec<LeaderboardEntry>>,
        failing: bool,
    }

    impl ScoreTransport for FakeTransport {
        fn fetch(&self) -> Result<Vec<LeaderboardEntry>, TransportError> {
            if self.failing {
                return Err(TransportError::Status(503));
            }
            Ok(self.stored.borrow().clone())
        }

        fn push(&self, entries: &[LeaderboardEntry]) -> Result<(), TransportError> {
            if self.failing {
                return Err(TransportError::Failed("connection refused".into()));
            }
            *self.stored.borrow_mut() = entries.to_vec();
            Ok(())
        }
    }

    #[test]
    fn test_merge_remote_wins_and_dedups() {
        let mut board = board(vec![entry("a", 10)]);
        board.merge_remote(vec![entry("a", 10), entry("b", 20)]);

        let ids: Vec<&str> = board.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(board.entries()[0].score, 20);
        assert_eq!(board.entries()[1].score, 10);
    }

    #[test]
    fn test_merge_keeps_local_only_entries() {
        let mut board = board(vec![entry("local", 7)]);
        board.merge_remote(vec![entry("remote", 3)]);
        let ids: Vec<&str> = board.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["local", "remote"]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut board = Leaderboard::new();
        board.merge_remote(vec![entry("first", 5), entry("second", 5), entry("third", 5)]);
        // Another sort pass must not shuffle equals
        board.merge_remote(vec![]);
        let ids: Vec<&str> = board.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_provisional_rank() {
        let board = board(vec![entry("a", 30), entry("b", 20), entry("c", 10)]);
        assert_eq!(board.provisional_rank(40), 1);
        assert_eq!(board.provisional_rank(20), 2);
        assert_eq!(board.provisional_rank(15), 3);
        assert_eq!(board.provisional_rank(5), 4);
        assert_eq!(Leaderboard::new().provisional_rank(0), 1);
    }

    #[test]
    fn test_submit_validates_before_mutating() {
        let mut board = Leaderboard::new();
        assert_eq!(
            board.submit("  ", "@who", 3, None, 0.0),
            Err(SubmitError::MissingName)
        );
        assert_eq!(
            board.submit("name", "\t", 3, None, 0.0),
            Err(SubmitError::MissingHandle)
        );
        assert!(board.is_empty());
    }

    #[test]
    fn test_submit_appends_ranks_and_tasks_push() {
        let mut board = board(vec![entry("a", 10)]);
        let (submitted, task) = board
            .submit(" Ada ", "@ada", 25, Some("device-1".into()), 123.0)
            .unwrap();

        assert_eq!(submitted.name, "Ada");
        assert_eq!(submitted.telegram_handle, "@ada");
        assert_eq!(submitted.created_at, 123.0);
        assert_eq!(submitted.device_id.as_deref(), Some("device-1"));
        assert!(!submitted.id.is_empty());

        // New entry outranks the old one
        assert_eq!(board.entries()[0].id, submitted.id);
        match task {
            SyncTask::Push(entries) => {
                assert_eq!(entries.len(), 2);
                assert!(entries.iter().any(|e| e.id == submitted.id));
            }
            SyncTask::Fetch => panic!("expected a push task"),
        }
    }

    #[test]
    fn test_submitted_ids_are_unique() {
        let mut board = Leaderboard::new();
        let (a, _) = board.submit("a", "@a", 1, None, 0.0).unwrap();
        let (b, _) = board.submit("b", "@b", 1, None, 0.0).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_push_failure_keeps_local_copy() {
        let transport = FakeTransport {
            failing: true,
            ..Default::default()
        };
        let mut board = Leaderboard::new();
        let (_, task) = board.submit("Ada", "@ada", 9, None, 0.0).unwrap();

        let outcome = run_task(&transport, task);
        assert!(matches!(outcome, SyncOutcome::PushFailed(_)));
        board.apply(outcome);
        assert_eq!(board.len(), 1);
        assert_eq!(board.entries()[0].score, 9);
    }

    #[test]
    fn test_fetch_and_merge_round_trip() {
        let transport = FakeTransport::default();
        *transport.stored.borrow_mut() = vec![entry("remote", 50)];

        let mut board = board(vec![entry("local", 8)]);
        let outcome = run_task(&transport, SyncTask::Fetch);
        board.apply(outcome);

        let ids: Vec<&str> = board.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["remote", "local"]);
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let json = serde_json::to_value(entry("a", 10)).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("telegramHandle").is_some());
        // Absent device id stays off the wire
        assert!(json.get("deviceId").is_none());

        let envelope: ScoresEnvelope =
            serde_json::from_str(r#"{"entries":[{"id":"x","name":"n","score":1,"createdAt":0.0,"telegramHandle":"@n"}]}"#)
                .unwrap();
        assert_eq!(envelope.entries.len(), 1);
        assert_eq!(envelope.entries[0].device_id, None);
    }
}
