//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `encore_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("encore_core ping={}", encore_core::ping());
    println!("encore_core version={}", encore_core::core_version());
}
