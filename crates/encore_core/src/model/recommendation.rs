//! Recommendation domain model and vote transition rules.
//!
//! # Responsibility
//! - Define the canonical recommendation record shared by all engine paths.
//! - Decide vote outcomes (keep vs. delete) as a pure function of state.
//!
//! # Invariants
//! - `id` is store-assigned, strictly increasing in creation order, never
//!   reused for another recommendation.
//! - `score` moves by exactly ±1 per vote.
//! - No live recommendation carries a score below `SCORE_FLOOR`.

use serde::{Deserialize, Serialize};

/// Stable store-assigned identifier for a recommendation.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type RecommendationId = i64;

/// Lowest score a recommendation may hold and remain live.
///
/// A downvote that would land strictly below this floor deletes the record
/// instead: starting from 0, the fifth downvote leaves the record at −5 and
/// the sixth removes it. Fixed by contract; do not re-derive.
pub const SCORE_FLOOR: i64 = -5;

/// Direction of a single vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Score delta applied by one vote in this direction.
    pub fn delta(self) -> i64 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

/// Result of applying one vote to a live recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The recommendation survives with the given post-vote score.
    Kept(i64),
    /// The vote pushed the score below `SCORE_FLOOR`; the record is gone.
    Deleted,
}

/// Decides the outcome of one vote without touching storage.
///
/// # Contract
/// - `Kept(score + delta)` whenever the post-vote score is at or above
///   `SCORE_FLOOR`.
/// - `Deleted` only when the post-vote score is strictly below the floor,
///   which an upvote can never produce on a live record.
pub fn vote_outcome(score: i64, direction: VoteDirection) -> VoteOutcome {
    let next = score + direction.delta();
    if next < SCORE_FLOOR {
        VoteOutcome::Deleted
    } else {
        VoteOutcome::Kept(next)
    }
}

/// Canonical recommendation record.
///
/// `name` and `link` are immutable after creation; only `score` changes,
/// and only through the vote operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Store-assigned id, also the creation-order tiebreaker.
    pub id: RecommendationId,
    /// Display name, unique among live recommendations.
    pub name: String,
    /// Media reference. Well-formedness is enforced upstream.
    pub link: String,
    /// Current vote tally. Starts at 0.
    pub score: i64,
    /// Creation time in epoch milliseconds. Informational; ordering uses `id`.
    pub created_at: i64,
}

impl Recommendation {
    /// Returns whether this record belongs to the high (score > 0) bucket
    /// used by weighted random selection.
    pub fn is_high_bucket(&self) -> bool {
        self.score > 0
    }
}
