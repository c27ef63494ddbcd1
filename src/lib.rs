//! # Fleet Engine
//!
//! Turn resolution and world physics for a turn-based space-strategy game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       FLEET ENGINE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                 │
//! │  ├── vec2.rs     - 2D vector                                │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG          │
//! │  ├── hash.rs     - State hashing for verification           │
//! │  └── color.rs    - Player color from name                   │
//! │                                                             │
//! │  game/           - Game logic (deterministic)               │
//! │  ├── config.rs   - Prices, fuel curve, limits               │
//! │  ├── state.rs    - World, players and ships                 │
//! │  ├── turn.rs     - Turn decoding and Buy/Move rules         │
//! │  ├── ship.rs     - Destruction and operability              │
//! │  ├── debris.rs   - Wreck remnants                           │
//! │  ├── wormhole.rs - Wormhole pairs and teleportation         │
//! │  ├── tick.rs     - Per-tick driver                          │
//! │  ├── events.rs   - Event log                                │
//! │  └── snapshot.rs - Renderer export                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! Given the same config, seed and per-tick batches (in the same order),
//! the world reaches the same state, down to the state hash:
//! - Entities live in insertion-ordered `Vec`s, never hash maps
//! - Batches apply in the order the host received them
//! - All randomness comes from the world's seeded Xorshift128+
//!
//! ## Usage
//!
//! ```
//! use fleet_engine::{tick, GameConfig, PlayerTurns, ShipType, TurnContainer, World};
//!
//! let mut world = World::new(GameConfig::default(), 42)?;
//! let alice = world.create_player("alice");
//!
//! let result = tick(&mut world, &[PlayerTurns::new(alice, vec![TurnContainer::buy(ShipType::Drill)])]);
//! assert_eq!(result.applied, 1);
//! assert_eq!(world.rock_amount(alice), Some(60));
//! # Ok::<(), fleet_engine::game::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::vec2::Vec2;
pub use core::rng::DeterministicRng;
pub use game::config::GameConfig;
pub use game::state::{PlayerId, ShipId, ShipType, World};
pub use game::tick::{tick, PlayerTurns, TickResult};
pub use game::turn::TurnContainer;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
