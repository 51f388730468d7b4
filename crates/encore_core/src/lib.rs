//! Scoring and selection engine for music recommendations.
//! This crate is the single source of truth for voting, threshold-deletion,
//! weighted random pick, and top-N ranking invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::recommendation::{
    vote_outcome, Recommendation, RecommendationId, VoteDirection, VoteOutcome, SCORE_FLOOR,
};
pub use repo::recommendation_repo::{
    RecommendationRepository, RepoError, RepoResult, SqliteRecommendationRepository,
};
pub use service::recommendation_service::{
    normalize_feed_limit, RecommendationService, FEED_DEFAULT_LIMIT,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the engine crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
