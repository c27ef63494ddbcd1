//! Entity Snapshot
//!
//! Read-only export of the world for renderers and transports. The snapshot
//! owns its data, so a host can serialize it after the world has moved on.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::debris::{DebrisId, DebrisKind};
use crate::game::state::{PlayerId, Ship, ShipId, World};
use crate::game::wormhole::Wormhole;

/// Player as seen from outside.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Player id
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// `#RRGGBB`
    pub color: String,
    /// Mothership id
    pub mothership: ShipId,
    /// Still in the match
    pub alive: bool,
    /// Score
    pub score: u32,
    /// Spendable rock held by the mothership
    pub rock_amount: u32,
}

/// Debris as seen from outside.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DebrisView {
    /// Debris id
    pub id: DebrisId,
    /// Resource carried
    pub kind: DebrisKind,
    /// Location
    pub position: Vec2,
    /// Amount carried
    pub amount: f64,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Tick the snapshot was taken after
    pub tick: u32,
    /// Players in id order
    pub players: Vec<PlayerView>,
    /// Ships in id order, destroyed ones included
    pub ships: Vec<Ship>,
    /// Wormholes in id order
    pub wormholes: Vec<Wormhole>,
    /// Debris in id order
    pub debris: Vec<DebrisView>,
}

impl WorldSnapshot {
    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl World {
    /// Take a snapshot of every entity.
    pub fn snapshot(&self) -> WorldSnapshot {
        let players = self
            .players()
            .iter()
            .map(|p| PlayerView {
                id: p.id,
                name: p.name.clone(),
                color: p.color.clone(),
                mothership: p.mothership,
                alive: p.alive,
                score: p.score,
                rock_amount: self.rock_amount(p.id).unwrap_or(0),
            })
            .collect();

        let debris = self
            .debris()
            .iter()
            .map(|d| DebrisView {
                id: d.id,
                kind: d.kind,
                position: d.position,
                amount: d.amount,
            })
            .collect();

        WorldSnapshot {
            tick: self.tick,
            players,
            ships: self.ships().to_vec(),
            wormholes: self.wormholes().to_vec(),
            debris,
        }
    }
}
