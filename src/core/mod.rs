//! Core deterministic primitives.
//!
//! Geometry, randomness and hashing shared by every game module.

pub mod vec2;
pub mod rng;
pub mod hash;

// Re-export core types
pub use vec2::Point;
pub use rng::DeterministicRng;
pub use hash::{StateHash, StateHasher, compute_state_hash};
