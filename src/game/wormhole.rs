//! Wormholes
//!
//! Wormholes are created in linked pairs and never destroyed or relinked.
//! A ship that ends up within `wormhole_radius` of one is moved next to the
//! other, offset along its travel direction.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::vec2::Vec2;
use crate::game::events::GameEvent;
use crate::game::state::{ShipId, World};

/// Index of a wormhole in [`World::wormholes`].
pub type WormholeId = usize;

/// One end of a wormhole pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wormhole {
    /// Dense id, assigned in creation order
    pub id: WormholeId,
    /// The paired wormhole
    pub target_id: WormholeId,
    /// Location
    pub position: Vec2,
}

/// Create a linked pair at random positions.
pub fn new_wormholes(world: &mut World) -> (WormholeId, WormholeId) {
    let a = world.random_position();
    let b = world.random_position();
    new_wormholes_at(world, a, b)
}

/// Create a linked pair at the given positions.
pub fn new_wormholes_at(world: &mut World, a: Vec2, b: Vec2) -> (WormholeId, WormholeId) {
    let first = world.wormholes.len();
    let second = first + 1;

    world.wormholes.push(Wormhole {
        id: first,
        target_id: second,
        position: a,
    });
    world.wormholes.push(Wormhole {
        id: second,
        target_id: first,
        position: b,
    });

    debug!("Linked wormholes {} at {} and {} at {}", first, a, second, b);
    (first, second)
}

/// Teleport a ship through the first wormhole (in collection order) it is
/// inside of.
///
/// Returns the entry wormhole, or None if the ship did not move. Destroyed
/// and unknown ships never teleport.
pub fn check_ship_wormhole_teleportation(world: &mut World, ship_id: ShipId) -> Option<WormholeId> {
    let (ship_pos, ship_vec) = world
        .ship(ship_id)
        .filter(|s| s.is_operable())
        .map(|s| (s.position, s.vector))?;
    let radius = world.config.wormhole_radius;

    let entry = world
        .wormholes
        .iter()
        .find(|w| ship_pos.distance(w.position) < radius)?;
    let exit = world.wormholes.get(entry.target_id)?;
    let (entry_id, exit_id, exit_pos) = (entry.id, exit.id, exit.position);

    let direction = if ship_vec.is_zero() {
        Vec2::from_angle(world.rng.next_angle())
    } else {
        ship_vec.normalize()
    };
    let position = exit_pos + direction.scale(world.config.wormhole_teleport_distance);

    let ship = world.ship_mut(ship_id)?;
    ship.position = position;
    let player_id = ship.player_id;

    debug!("Ship {} teleported {} -> {}, now at {}", ship_id, entry_id, exit_id, position);
    let tick = world.tick;
    world.push_event(GameEvent::ship_teleported(tick, player_id, ship_id, entry_id, exit_id, position));
    Some(entry_id)
}

/// Run the teleport check once for every ship, in collection order.
///
/// Each ship teleports at most once per call.
pub fn teleport_ships(world: &mut World) -> Vec<ShipId> {
    (0..world.ships.len())
        .filter(|&id| check_ship_wormhole_teleportation(world, id).is_some())
        .collect()
}
