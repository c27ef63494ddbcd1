//! Authoritative Simulation Tick
//!
//! One tick applies every player's batch, in the order the host received
//! them, then resolves destruction and wormholes uniformly for all ships.
//! Given the same world and the same batches, a tick is bit-for-bit
//! reproducible.

use tracing::info;

use crate::game::events::GameEvent;
use crate::game::ship::{check_and_mark_destroyed, eliminate_players_without_mothership};
use crate::game::state::{PlayerId, ShipId, World};
use crate::game::turn::{execute_turns, TurnContainer};
use crate::game::wormhole::teleport_ships;

/// One player's submissions for a tick.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerTurns {
    /// Submitting player
    pub player_id: PlayerId,
    /// Submissions in the order received
    pub turns: Vec<TurnContainer>,
}

impl PlayerTurns {
    /// Bundle a batch.
    pub fn new(player_id: PlayerId, turns: Vec<TurnContainer>) -> Self {
        Self { player_id, turns }
    }
}

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Rejection log lines generated this tick
    pub log: Vec<String>,
    /// Submissions applied
    pub applied: usize,
    /// Submissions rejected
    pub rejected: usize,
    /// Ships destroyed by the sweep
    pub destroyed: Vec<ShipId>,
    /// Ships that passed through a wormhole
    pub teleported: Vec<ShipId>,
    /// Players eliminated this tick
    pub eliminated: Vec<PlayerId>,
}

/// What the consistency pass changed.
#[derive(Debug, Default, PartialEq)]
pub struct ConsistencyReport {
    /// Ships destroyed by the sweep
    pub destroyed: Vec<ShipId>,
    /// Players whose mothership is gone
    pub eliminated: Vec<PlayerId>,
    /// Ships that passed through a wormhole
    pub teleported: Vec<ShipId>,
}

/// Run one simulation tick.
///
/// # Arguments
///
/// * `world` - The world (will be mutated)
/// * `batches` - Per-player submissions, applied strictly in slice order
///
/// # Determinism
///
/// - Batches apply in the order given, never re-sorted
/// - Ships and wormholes are scanned in collection order
/// - Randomness comes only from `world.rng`
pub fn tick(world: &mut World, batches: &[PlayerTurns]) -> TickResult {
    let mut result = TickResult::default();

    // 0. Advance tick counter
    world.tick += 1;

    // 1. Apply batches in submission order
    for batch in batches {
        let report = execute_turns(world, batch.player_id, &batch.turns);
        result.applied += report.applied;
        result.rejected += report.rejected;
    }

    // 2. Destruction, elimination, wormholes
    let pass = run_consistency_pass(world);
    result.destroyed = pass.destroyed;
    result.eliminated = pass.eliminated;
    result.teleported = pass.teleported;

    // 3. Collect events and log
    result.events = world.take_events();
    result.log = world.take_log();

    info!(
        tick = world.tick,
        applied = result.applied,
        rejected = result.rejected,
        destroyed = result.destroyed.len(),
        teleported = result.teleported.len(),
        "Tick resolved"
    );

    result
}

/// Sweep all ships after turns have been applied.
///
/// Destroyed ships are swept first so that wrecks neither teleport nor keep
/// their owner alive.
pub fn run_consistency_pass(world: &mut World) -> ConsistencyReport {
    let destroyed = check_and_mark_destroyed(world);
    let eliminated = eliminate_players_without_mothership(world);
    let teleported = teleport_ships(world);

    ConsistencyReport {
        destroyed,
        eliminated,
        teleported,
    }
}

/// Replay recorded batches against a world.
///
/// `between_ticks` runs after every tick; hosts pass the same step they ran
/// live (e.g. advancing positions) so the replay follows the same path.
///
/// Returns the final world and every event.
pub fn replay(
    initial: World,
    ticks: &[Vec<PlayerTurns>],
    mut between_ticks: impl FnMut(&mut World),
) -> (World, Vec<GameEvent>) {
    let mut world = initial;
    let mut all_events = Vec::new();

    for batches in ticks {
        let result = tick(&mut world, batches);
        all_events.extend(result.events);
        between_ticks(&mut world);
    }

    (world, all_events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Vec2;
    use crate::game::config::GameConfig;
    use crate::game::events::GameEventData;
    use crate::game::state::ShipType;
    use crate::game::wormhole::new_wormholes_at;

    fn two_players() -> World {
        let mut world = World::new(GameConfig::default(), 12345).unwrap();
        world.create_player("alice");
        world.create_player("bob");
        world
    }

    #[test]
    fn test_tick_advances_counter_and_drains() {
        let mut world = two_players();
        let batches = vec![PlayerTurns::new(0, vec![TurnContainer::new(8, serde_json::Value::Null)])];

        let result = tick(&mut world, &batches);
        assert_eq!(world.tick, 1);
        assert_eq!(result.rejected, 1);
        assert_eq!(result.log.len(), 1);
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].tick, 1);

        // Nothing carries over
        let result = tick(&mut world, &[]);
        assert_eq!(world.tick, 2);
        assert!(result.log.is_empty());
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_submission_order_decides_resolution_order() {
        // Same starting state, opposite batch order
        let run = |order: [PlayerId; 2]| {
            let mut world = two_players();
            let batches: Vec<PlayerTurns> = order
                .iter()
                .map(|&p| PlayerTurns::new(p, vec![TurnContainer::buy(ShipType::Sucker)]))
                .collect();
            let result = tick(&mut world, &batches);
            let purchasers: Vec<PlayerId> = result
                .events
                .iter()
                .filter_map(|e| match e.data {
                    GameEventData::ShipPurchased { player_id, .. } => Some(player_id),
                    _ => None,
                })
                .collect();
            (purchasers, world.ships()[2].player_id)
        };

        assert_eq!(run([0, 1]), (vec![0, 1], 0));
        assert_eq!(run([1, 0]), (vec![1, 0], 1));
    }

    #[test]
    fn test_consistency_pass_destroys_then_eliminates() {
        let mut world = two_players();
        let bob_ship = world.create_ship(1, ShipType::Battle).unwrap();
        world.ship_mut(0).unwrap().health = -5;
        world.ship_mut(bob_ship).unwrap().health = 0;

        let result = tick(&mut world, &[]);
        assert_eq!(result.destroyed, vec![0, bob_ship]);
        assert_eq!(result.eliminated, vec![0]);
        assert_eq!(world.debris().len(), 4);
        assert!(!world.player(0).unwrap().alive);
        assert!(world.player(1).unwrap().alive);

        // Swept ships stay destroyed, nothing doubles up
        let result = tick(&mut world, &[]);
        assert!(result.destroyed.is_empty());
        assert!(result.eliminated.is_empty());
        assert_eq!(world.debris().len(), 4);
    }

    #[test]
    fn test_wreck_on_wormhole_does_not_teleport() {
        let mut world = two_players();
        new_wormholes_at(&mut world, Vec2::new(100.0, 100.0), Vec2::new(900.0, 900.0));
        let id = world.create_ship(0, ShipType::Sucker).unwrap();
        {
            let ship = world.ship_mut(id).unwrap();
            ship.position = Vec2::new(100.0, 100.0);
            ship.health = 0;
        }
        // Keep the motherships away from the wormholes
        for m in [0, 1] {
            world.ship_mut(m).unwrap().position = Vec2::new(500.0, 500.0);
        }

        let result = tick(&mut world, &[]);
        assert_eq!(result.destroyed, vec![id]);
        assert!(result.teleported.is_empty());
        assert_eq!(world.ship(id).unwrap().position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_tick_determinism() {
        let script = |world: &World| -> Vec<PlayerTurns> {
            let ships = world.ships().len();
            vec![
                PlayerTurns::new(0, vec![
                    TurnContainer::buy(ShipType::Drill),
                    TurnContainer::move_ship(0, Vec2::new(10.0, -3.0)),
                ]),
                PlayerTurns::new(1, vec![
                    TurnContainer::move_ship(1, Vec2::new(-7.0, 2.0)),
                    TurnContainer::move_ship(ships - 1, Vec2::new(1.0, 1.0)),
                ]),
            ]
        };

        let mut w1 = two_players();
        let mut w2 = two_players();
        new_wormholes_at(&mut w1, Vec2::new(300.0, 300.0), Vec2::new(700.0, 700.0));
        new_wormholes_at(&mut w2, Vec2::new(300.0, 300.0), Vec2::new(700.0, 700.0));

        for _ in 0..20 {
            let b1 = script(&w1);
            let b2 = script(&w2);
            tick(&mut w1, &b1);
            tick(&mut w2, &b2);
        }

        assert_eq!(w1.tick, 20);
        assert_eq!(w1.compute_hash(), w2.compute_hash());
        assert_eq!(w1.ships(), w2.ships());
    }

    #[test]
    fn test_replay_determinism() {
        let ticks: Vec<Vec<PlayerTurns>> = (0..30)
            .map(|t| {
                vec![
                    PlayerTurns::new(0, vec![TurnContainer::move_ship(0, Vec2::new(t as f64, 1.0))]),
                    PlayerTurns::new(1, vec![TurnContainer::move_ship(1, Vec2::new(-1.0, t as f64))]),
                ]
            })
            .collect();

        let advance = |world: &mut World| {
            for id in 0..world.ships().len() {
                if let Some(ship) = world.ship_mut(id) {
                    ship.position += ship.vector;
                    ship.vector = Vec2::ZERO;
                }
            }
        };

        let (final1, events1) = replay(two_players(), &ticks, advance);
        let (final2, events2) = replay(two_players(), &ticks, advance);

        assert_eq!(final1.tick, 30);
        assert_eq!(final1.compute_hash(), final2.compute_hash());
        assert_eq!(events1, events2);
        assert_eq!(
            events1
                .iter()
                .filter(|e| matches!(e.data, GameEventData::ShipMoved { .. }))
                .count(),
            60
        );
    }
}
