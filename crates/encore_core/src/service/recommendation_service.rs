//! Recommendation engine use-case service.
//!
//! # Responsibility
//! - Expose the engine operations: create, vote, lookup, feed, weighted
//!   random pick, top-N ranking.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository atomicity contracts.
//! - Selection and ranking never mutate record state.

use crate::model::recommendation::{Recommendation, RecommendationId, VoteDirection, VoteOutcome};
use crate::repo::recommendation_repo::{RecommendationRepository, RepoError, RepoResult};
use rand::Rng;

/// Probability that a random pick draws from the high (score > 0) bucket.
///
/// The remaining mass goes to the low (score <= 0) bucket, so unpopular
/// records are favored against but never starved.
const HIGH_BUCKET_BIAS: f64 = 0.7;

/// Feed page size when the caller passes no limit.
pub const FEED_DEFAULT_LIMIT: u32 = 10;
const FEED_LIMIT_MAX: u32 = 50;

/// Use-case service wrapper for the scoring and selection engine.
pub struct RecommendationService<R: RecommendationRepository> {
    repo: R,
}

impl<R: RecommendationRepository> RecommendationService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a recommendation with score 0.
    ///
    /// # Contract
    /// - `name` and `link` arrive pre-validated from the boundary layer.
    /// - A duplicate live name surfaces as `RepoError::Conflict`.
    pub fn create(&mut self, name: &str, link: &str) -> RepoResult<Recommendation> {
        self.repo.insert(name, link)
    }

    /// Raises the record's score by 1 and returns the new score.
    ///
    /// Never deletes: an upvote can only move a score away from the floor.
    pub fn upvote(&mut self, id: RecommendationId) -> RepoResult<i64> {
        match self.repo.apply_vote(id, VoteDirection::Up)? {
            VoteOutcome::Kept(score) => Ok(score),
            VoteOutcome::Deleted => Err(RepoError::InvalidData(format!(
                "upvote reported deletion for recommendation {id}"
            ))),
        }
    }

    /// Lowers the record's score by 1.
    ///
    /// Returns `VoteOutcome::Deleted` when the vote pushed the score below
    /// the floor and the record was removed in the same transaction.
    pub fn downvote(&mut self, id: RecommendationId) -> RepoResult<VoteOutcome> {
        self.repo.apply_vote(id, VoteDirection::Down)
    }

    /// Gets one live recommendation by id.
    pub fn get_by_id(&self, id: RecommendationId) -> RepoResult<Recommendation> {
        self.repo.get(id)?.ok_or(RepoError::NotFound(id))
    }

    /// Returns the most recently created records, newest first.
    ///
    /// `None` and `Some(0)` both mean the default page size.
    pub fn recent_feed(&self, limit: Option<u32>) -> RepoResult<Vec<Recommendation>> {
        self.repo.recent(normalize_feed_limit(limit))
    }

    /// Returns up to `amount` records by score descending, ties broken by
    /// ascending id (creation order). Non-positive `amount` yields nothing.
    pub fn top(&self, amount: i64) -> RepoResult<Vec<Recommendation>> {
        if amount <= 0 {
            return Ok(Vec::new());
        }
        let capped = u32::try_from(amount).unwrap_or(u32::MAX);
        self.repo.top_by_score(capped)
    }

    /// Picks one recommendation with score-dependent bucket weighting.
    ///
    /// Fails with `RepoError::Empty` only when the store holds zero records.
    pub fn pick_random(&self) -> RepoResult<Recommendation> {
        self.pick_random_with(&mut rand::thread_rng())
    }

    /// Deterministic variant of [`pick_random`](Self::pick_random) for
    /// callers that supply their own randomness source.
    pub fn pick_random_with<G: Rng>(&self, rng: &mut G) -> RepoResult<Recommendation> {
        let snapshot = self.repo.snapshot_all()?;
        pick_weighted(snapshot, rng).ok_or(RepoError::Empty)
    }
}

/// Normalizes feed page size according to the feed contract.
pub fn normalize_feed_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) => FEED_DEFAULT_LIMIT,
        Some(value) if value > FEED_LIMIT_MAX => FEED_LIMIT_MAX,
        Some(value) => value,
        None => FEED_DEFAULT_LIMIT,
    }
}

/// Weighted bucket selection over one consistent snapshot.
///
/// Partitions records by score sign, draws the high bucket with probability
/// `HIGH_BUCKET_BIAS`, and falls back to the other bucket when the chosen
/// one is empty. Selection within a bucket is uniform by position.
fn pick_weighted<G: Rng>(records: Vec<Recommendation>, rng: &mut G) -> Option<Recommendation> {
    if records.is_empty() {
        return None;
    }

    let (high, low): (Vec<_>, Vec<_>) = records.into_iter().partition(|r| r.is_high_bucket());
    let prefer_high = rng.gen::<f64>() < HIGH_BUCKET_BIAS;

    let mut bucket = if prefer_high {
        if high.is_empty() {
            low
        } else {
            high
        }
    } else if low.is_empty() {
        high
    } else {
        low
    };

    let index = rng.gen_range(0..bucket.len());
    Some(bucket.swap_remove(index))
}
