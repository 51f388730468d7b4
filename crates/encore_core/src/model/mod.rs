//! Domain model for the recommendation engine.
//!
//! # Responsibility
//! - Define the canonical recommendation record and vote vocabulary.
//! - Keep the deletion-threshold rule a pure, storage-free decision.
//!
//! # Invariants
//! - Every recommendation is identified by a store-assigned integer id.
//! - Deletion is a hard delete driven solely by the score floor rule.

pub mod recommendation;
