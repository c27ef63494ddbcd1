//! Game Events
//!
//! Structured record of what changed during a tick, for replay viewers and
//! for tests that want more than the final state.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::debris::{DebrisId, DebrisKind};
use crate::game::state::{PlayerId, ShipId, ShipType};
use crate::game::turn::TurnType;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A Buy turn created a ship
    ShipPurchased {
        /// Buyer
        player_id: PlayerId,
        /// New ship
        ship_id: ShipId,
        /// Type bought
        ship_type: ShipType,
        /// Rock taken from the mothership
        price: u32,
    },

    /// A Move turn added to a ship's vector
    ShipMoved {
        /// Owner
        player_id: PlayerId,
        /// Moved ship
        ship_id: ShipId,
        /// Displacement after clamping
        applied: Vec2,
        /// Fuel charged
        fuel_cost: f64,
    },

    /// A ship crossed the destruction threshold
    ShipDestroyed {
        /// Owner
        player_id: PlayerId,
        /// Destroyed ship
        ship_id: ShipId,
        /// Where the wreck lies
        position: Vec2,
    },

    /// A wreck left a debris unit
    DebrisSpawned {
        /// New debris
        debris_id: DebrisId,
        /// Resource carried
        kind: DebrisKind,
        /// Spawn location
        position: Vec2,
        /// Resource amount
        amount: f64,
    },

    /// A ship passed through a wormhole
    ShipTeleported {
        /// Owner
        player_id: PlayerId,
        /// Teleported ship
        ship_id: ShipId,
        /// Wormhole the ship entered
        entry_wormhole: usize,
        /// Paired wormhole it came out of
        exit_wormhole: usize,
        /// Position after the jump
        position: Vec2,
    },

    /// A submission was skipped
    TurnRejected {
        /// Submitting player
        player_id: PlayerId,
        /// Decoded tag, None if the tag itself was bad
        kind: Option<TurnType>,
        /// Error message
        reason: String,
    },

    /// A player's mothership was destroyed
    PlayerEliminated {
        /// Eliminated player
        player_id: PlayerId,
    },
}

/// A game event with timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Player involved (for filtering)
    pub player_id: Option<PlayerId>,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: GameEventData) -> Self {
        let player_id = match &data {
            GameEventData::ShipPurchased { player_id, .. } => Some(*player_id),
            GameEventData::ShipMoved { player_id, .. } => Some(*player_id),
            GameEventData::ShipDestroyed { player_id, .. } => Some(*player_id),
            GameEventData::ShipTeleported { player_id, .. } => Some(*player_id),
            GameEventData::TurnRejected { player_id, .. } => Some(*player_id),
            GameEventData::PlayerEliminated { player_id } => Some(*player_id),
            GameEventData::DebrisSpawned { .. } => None,
        };

        Self {
            tick,
            player_id,
            data,
        }
    }

    /// Create ship purchased event.
    pub fn ship_purchased(tick: u32, player_id: PlayerId, ship_id: ShipId, ship_type: ShipType, price: u32) -> Self {
        Self::new(
            tick,
            GameEventData::ShipPurchased {
                player_id,
                ship_id,
                ship_type,
                price,
            },
        )
    }

    /// Create ship moved event.
    pub fn ship_moved(tick: u32, player_id: PlayerId, ship_id: ShipId, applied: Vec2, fuel_cost: f64) -> Self {
        Self::new(
            tick,
            GameEventData::ShipMoved {
                player_id,
                ship_id,
                applied,
                fuel_cost,
            },
        )
    }

    /// Create ship destroyed event.
    pub fn ship_destroyed(tick: u32, player_id: PlayerId, ship_id: ShipId, position: Vec2) -> Self {
        Self::new(
            tick,
            GameEventData::ShipDestroyed {
                player_id,
                ship_id,
                position,
            },
        )
    }

    /// Create debris spawned event.
    pub fn debris_spawned(tick: u32, debris_id: DebrisId, kind: DebrisKind, position: Vec2, amount: f64) -> Self {
        Self::new(
            tick,
            GameEventData::DebrisSpawned {
                debris_id,
                kind,
                position,
                amount,
            },
        )
    }

    /// Create ship teleported event.
    pub fn ship_teleported(
        tick: u32,
        player_id: PlayerId,
        ship_id: ShipId,
        entry_wormhole: usize,
        exit_wormhole: usize,
        position: Vec2,
    ) -> Self {
        Self::new(
            tick,
            GameEventData::ShipTeleported {
                player_id,
                ship_id,
                entry_wormhole,
                exit_wormhole,
                position,
            },
        )
    }

    /// Create turn rejected event.
    pub fn turn_rejected(tick: u32, player_id: PlayerId, kind: Option<TurnType>, reason: String) -> Self {
        Self::new(tick, GameEventData::TurnRejected { player_id, kind, reason })
    }

    /// Create player eliminated event.
    pub fn player_eliminated(tick: u32, player_id: PlayerId) -> Self {
        Self::new(tick, GameEventData::PlayerEliminated { player_id })
    }
}
