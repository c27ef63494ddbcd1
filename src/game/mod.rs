//! Game Logic Module
//!
//! All turn resolution and world rules. Deterministic for a given seed.
//!
//! ## Module Structure
//!
//! - `config`: Injectable tuning table
//! - `error`: Decode and execution error tiers
//! - `state`: World container, players, ships
//! - `turn`: Submission decoding and Buy/Move rules
//! - `ship`: Destruction and operability
//! - `debris`: Remnants of destroyed ships
//! - `wormhole`: Wormhole pairs and teleportation
//! - `tick`: Per-tick driver and consistency pass
//! - `events`: Game events for replay/verification
//! - `snapshot`: Read-only export for renderers

pub mod config;
pub mod error;
pub mod state;
pub mod turn;
pub mod ship;
pub mod debris;
pub mod wormhole;
pub mod tick;
pub mod events;
pub mod snapshot;

// Re-export key types
pub use config::{FuelCost, GameConfig, ShipTable};
pub use error::{ConfigError, DecodeError, ExecutionError, TurnError};
pub use state::{Player, PlayerId, Ship, ShipId, ShipType, World};
pub use turn::{execute_turns, BatchReport, Turn, TurnContainer, TurnType};
pub use tick::{replay, tick, PlayerTurns, TickResult};
pub use events::{GameEvent, GameEventData};
pub use snapshot::WorldSnapshot;
