//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the store contract the engine depends on.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Vote application is atomic: score change, threshold check, and delete
//!   commit together or not at all.
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`) in
//!   addition to DB transport errors.

pub mod recommendation_repo;
