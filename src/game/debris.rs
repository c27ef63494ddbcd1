//! Debris
//!
//! What a ship leaves behind when it is destroyed: one fuel-bearing and one
//! rock-bearing remnant at its last position. Collecting debris is a mining
//! concern and lives outside this engine.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::events::GameEvent;
use crate::game::state::{ShipId, World};

/// Index of a debris unit in [`World::debris`].
pub type DebrisId = usize;

/// Resource a debris unit carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum DebrisKind {
    /// Remaining fuel of the wreck
    Fuel = 0,
    /// Remaining rock of the wreck
    Rock = 1,
}

/// A salvageable remnant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Debris {
    /// Dense id, assigned in creation order
    pub id: DebrisId,
    /// Resource carried
    pub kind: DebrisKind,
    /// Where the ship was destroyed
    pub position: Vec2,
    /// How much of the resource it carries
    pub amount: f64,
    /// Ship it came from
    pub source_ship: ShipId,
}

/// Create one debris unit from a ship's remaining `kind` resource.
///
/// Returns None if the ship does not exist.
pub fn new_debris_from_ship(world: &mut World, ship_id: ShipId, kind: DebrisKind) -> Option<DebrisId> {
    let ship = world.ship(ship_id)?;
    let amount = match kind {
        DebrisKind::Fuel => ship.fuel,
        DebrisKind::Rock => ship.rock as f64,
    };
    let position = ship.position;

    let id = world.debris.len();
    world.debris.push(Debris {
        id,
        kind,
        position,
        amount,
        source_ship: ship_id,
    });

    let tick = world.tick;
    world.push_event(GameEvent::debris_spawned(tick, id, kind, position, amount));
    Some(id)
}
