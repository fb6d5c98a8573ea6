//! Run-history leaderboard
//!
//! Append-only record of finished runs, kept sorted by score (descending) and
//! capped at [`MAX_LEADERBOARD_ENTRIES`].

use serde::{Deserialize, Serialize};

use crate::consts::MAX_LEADERBOARD_ENTRIES;

/// A single finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Rounded final score
    pub score: u64,
    /// Unix timestamp (ms) when the run ended
    #[serde(alias = "ts")]
    pub timestamp: i64,
}

/// Bounded leaderboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<ScoreRecord>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuild from persisted entries, restoring order and the size cap
    pub fn from_entries(mut entries: Vec<ScoreRecord>) -> Self {
        // Stable: equal scores keep their stored order
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_LEADERBOARD_ENTRIES);
        Self { entries }
    }

    /// Get the rank a score would achieve (1-indexed, None if it would be cut)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len())
            + 1;
        (rank <= MAX_LEADERBOARD_ENTRIES).then_some(rank)
    }

    /// Append a finished run.
    /// Returns the rank achieved (1-indexed) or None if it fell off the end.
    pub fn record(&mut self, score: u64, timestamp: i64) -> Option<usize> {
        let rank = self.potential_rank(score);
        // Ties rank after existing entries with the same score
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, ScoreRecord { score, timestamp });
        self.entries.truncate(MAX_LEADERBOARD_ENTRIES);
        rank
    }

    /// The `n` best entries
    pub fn top(&self, n: usize) -> &[ScoreRecord] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Highest recorded score, if any
    pub fn best(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn entries(&self) -> &[ScoreRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<ScoreRecord> {
        self.entries
    }
}
