//! Local leaderboard and score ledger handoff
//!
//! The simulation hands a [`ScoreRecord`] to the host at game end; the host
//! decides where (or whether) to persist it. The leaderboard here is pure
//! in-memory bookkeeping: qualify, rank, insert, truncate to the top 10.

use serde::{Deserialize, Serialize};

/// Maximum number of leaderboard entries kept
pub const MAX_HIGH_SCORES: usize = 10;

/// One finished run, as handed to the host for storage or display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Difficulty mode the run was played in
    pub mode: String,
    /// Free-form label (player name, level reached, ...)
    pub label: String,
    /// Play time against the injected clock
    pub elapsed_ms: u64,
    pub score: u64,
}

/// Leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<ScoreRecord>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Whether a score would make the board. Zero never qualifies.
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve, 1-indexed; `None` if it does not qualify
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a record if it qualifies, returning the 1-indexed rank it took
    pub fn add_record(&mut self, record: ScoreRecord) -> Option<usize> {
        if !self.qualifies(record.score) {
            return None;
        }

        let score = record.score;
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, record);
                i + 1
            }
            None => {
                self.entries.push(record);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}
