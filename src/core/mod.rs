//! Core deterministic primitives.
//!
//! Pure helpers with no knowledge of players or ships. Everything the
//! simulation needs to be reproducible lives here: geometry, the seeded
//! RNG and the state hasher.

pub mod vec2;
pub mod rng;
pub mod hash;
pub mod color;

// Re-export core types
pub use vec2::Vec2;
pub use rng::DeterministicRng;
pub use hash::{compute_state_hash, StateHash, StateHasher};
pub use color::generate_hex_color;
