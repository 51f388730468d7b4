//! Engine use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the engine's public operations.
//! - Keep boundary layers decoupled from storage details.

pub mod recommendation_service;
