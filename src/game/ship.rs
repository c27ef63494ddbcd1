//! Ship Lifecycle
//!
//! Destruction and the operability checks turns run before touching a ship.
//! Damage itself is dealt elsewhere; this module only reacts to health.

use tracing::info;

use crate::game::debris::{new_debris_from_ship, DebrisKind};
use crate::game::error::{ExecResult, ExecutionError};
use crate::game::events::GameEvent;
use crate::game::state::{PlayerId, Ship, ShipId, World};

/// Destroy a ship, leaving fuel and rock debris at its position.
///
/// Returns false (and changes nothing) if the ship is unknown or already
/// destroyed, so each wreck produces debris exactly once.
pub fn destroy_ship(world: &mut World, ship_id: ShipId) -> bool {
    match world.ship(ship_id) {
        Some(ship) if ship.is_operable() => {}
        _ => return false,
    }

    // Debris reads the ship's remaining cargo, so it goes first
    new_debris_from_ship(world, ship_id, DebrisKind::Fuel);
    new_debris_from_ship(world, ship_id, DebrisKind::Rock);

    let tick = world.tick;
    let Some(ship) = world.ship_mut(ship_id) else {
        return false;
    };
    ship.health = 0;
    ship.is_destroyed = true;
    let (player_id, position) = (ship.player_id, ship.position);

    info!("Ship {} of player {} destroyed at {}", ship_id, player_id, position);
    world.push_event(GameEvent::ship_destroyed(tick, player_id, ship_id, position));
    true
}

/// Destroy every ship whose health has dropped to zero or below.
///
/// Returns the newly destroyed ids in collection order.
pub fn check_and_mark_destroyed(world: &mut World) -> Vec<ShipId> {
    let doomed: Vec<ShipId> = world
        .ships()
        .iter()
        .filter(|s| s.health <= 0 && !s.is_destroyed)
        .map(|s| s.id)
        .collect();

    doomed
        .into_iter()
        .filter(|&id| destroy_ship(world, id))
        .collect()
}

/// Look up a ship that may still act.
pub fn validate_ship_operable(world: &World, ship_id: ShipId) -> ExecResult<&Ship> {
    let ship = world
        .ship(ship_id)
        .ok_or(ExecutionError::InvalidShipId(ship_id as i64))?;
    if !ship.is_operable() {
        return Err(ExecutionError::ShipDestroyed(ship_id));
    }
    Ok(ship)
}

/// Mark players whose mothership is gone as eliminated.
///
/// Returns players eliminated by this call.
pub fn eliminate_players_without_mothership(world: &mut World) -> Vec<PlayerId> {
    let doomed: Vec<PlayerId> = world
        .players
        .iter()
        .filter(|p| p.alive)
        .filter(|p| world.ship(p.mothership).map_or(true, |s| s.is_destroyed))
        .map(|p| p.id)
        .collect();

    let tick = world.tick;
    for &player_id in &doomed {
        world.players[player_id].alive = false;
        info!("Player {} eliminated", player_id);
        world.push_event(GameEvent::player_eliminated(tick, player_id));
    }
    doomed
}
