//! Core primitives.
//!
//! Value types, tuning constants, the seeded RNG and the state hasher.
//! Nothing in here knows about rounds or platforms.

pub mod constants;
pub mod vec3;
pub mod rng;
pub mod hash;

// Re-export core types
pub use vec3::{Vector3, Color};
pub use rng::{DeterministicRng, seed_from_clock};
pub use hash::{StateHash, StateHasher, compute_state_hash};
