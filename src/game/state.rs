//! World State Definitions
//!
//! The [`World`] is the single mutable root of a match. It owns the dense,
//! insertion-ordered collections of players, ships, wormholes and debris.
//! Ids are "collection length at insertion time" and nothing is ever
//! removed, so an id is always a valid index once handed out.

use std::fmt;
use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use crate::core::color::generate_hex_color;
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::config::GameConfig;
use crate::game::debris::Debris;
use crate::game::error::{ConfigError, ExecResult, ExecutionError};
use crate::game::events::GameEvent;
use crate::game::wormhole::Wormhole;

/// Index of a player in [`World::players`].
pub type PlayerId = usize;

/// Index of a ship in [`World::ships`].
pub type ShipId = usize;

// =============================================================================
// SHIP TYPE
// =============================================================================

/// Ship class. Ordered; `Mothership` is the minimum and cannot be bought.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum ShipType {
    /// Player's initial ship, holds the rock balance
    Mothership = 0,
    /// Sucker
    Sucker = 1,
    /// Drill
    Drill = 2,
    /// Tanker
    Tanker = 3,
    /// Truck
    Truck = 4,
    /// Battle
    Battle = 5,
}

impl ShipType {
    /// All types in order.
    pub const ALL: [ShipType; 6] = [
        ShipType::Mothership,
        ShipType::Sucker,
        ShipType::Drill,
        ShipType::Tanker,
        ShipType::Truck,
        ShipType::Battle,
    ];

    /// Highest ship type.
    pub const MAX: ShipType = ShipType::Battle;

    /// Get type from index (0-5).
    pub fn from_index(index: i64) -> Option<ShipType> {
        match index {
            0 => Some(ShipType::Mothership),
            1 => Some(ShipType::Sucker),
            2 => Some(ShipType::Drill),
            3 => Some(ShipType::Tanker),
            4 => Some(ShipType::Truck),
            5 => Some(ShipType::Battle),
            _ => None,
        }
    }

    /// Type a player may buy: strictly above `Mothership`, at most `MAX`.
    pub fn buyable(index: i64) -> Option<ShipType> {
        Self::from_index(index).filter(|t| *t > ShipType::Mothership && *t <= Self::MAX)
    }
}

impl From<ShipType> for u8 {
    fn from(ship_type: ShipType) -> u8 {
        ship_type as u8
    }
}

impl TryFrom<u8> for ShipType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ShipType::from_index(value as i64).ok_or_else(|| format!("invalid ship type: {}", value))
    }
}

// =============================================================================
// PLAYER
// =============================================================================

/// A participant in the match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Dense id, assigned in creation order
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// Cosmetic color derived from the name
    pub color: String,
    /// The player's mothership
    pub mothership: ShipId,
    /// False once the mothership has been destroyed
    pub alive: bool,
    /// Accumulated score
    pub score: u32,
}

// =============================================================================
// SHIP
// =============================================================================

/// A ship in the world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    /// Dense id, unique across the world
    pub id: ShipId,
    /// Owning player
    #[serde(rename = "player")]
    pub player_id: PlayerId,
    /// Current position
    pub position: Vec2,
    /// Accumulated travel vector for this tick
    pub vector: Vec2,
    /// Hit points; destroyed at <= 0
    pub health: i32,
    /// Fuel on hand
    pub fuel: f64,
    /// Ship class
    #[serde(rename = "type")]
    pub ship_type: ShipType,
    /// Carried rock
    pub rock: u32,
    /// Terminal flag, never reverts
    pub is_destroyed: bool,
}

impl Ship {
    /// True if the ship can still act.
    #[inline]
    pub fn is_operable(&self) -> bool {
        !self.is_destroyed
    }
}

// =============================================================================
// WORLD
// =============================================================================

/// Complete state of one match.
#[derive(Clone, Serialize, Deserialize)]
pub struct World {
    /// Tuning table
    pub config: GameConfig,

    /// Ticks resolved so far
    pub tick: u32,

    /// RNG seed (for verification)
    pub rng_seed: u64,

    /// Deterministic RNG state
    pub rng: DeterministicRng,

    pub(crate) players: Vec<Player>,
    pub(crate) ships: Vec<Ship>,
    pub(crate) wormholes: Vec<Wormhole>,
    pub(crate) debris: Vec<Debris>,

    /// Events generated this tick (cleared each tick)
    #[serde(skip)]
    pending_events: Vec<GameEvent>,

    /// Rejected-submission lines not yet drained by the host
    #[serde(skip)]
    pending_log: Vec<String>,
}

impl World {
    /// Create an empty world.
    ///
    /// Fails if the config does not pass [`GameConfig::validate`].
    pub fn new(config: GameConfig, rng_seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            "Created world (seed {}, map {}x{})",
            rng_seed, config.map_width, config.map_height
        );
        Ok(Self {
            config,
            tick: 0,
            rng_seed,
            rng: DeterministicRng::new(rng_seed),
            players: Vec::new(),
            ships: Vec::new(),
            wormholes: Vec::new(),
            debris: Vec::new(),
            pending_events: Vec::new(),
            pending_log: Vec::new(),
        })
    }

    /// Random position inside the map.
    pub fn random_position(&mut self) -> Vec2 {
        self.rng.random_position(self.config.map_width, self.config.map_height)
    }

    /// Add a player and their mothership at a random position.
    pub fn create_player(&mut self, name: &str) -> PlayerId {
        let id = self.players.len();
        let position = self.random_position();
        let mothership = self.spawn_ship(id, ShipType::Mothership, position);
        self.ships[mothership].rock = self.config.player_start_rock;

        self.players.push(Player {
            id,
            name: name.to_string(),
            color: generate_hex_color(name),
            mothership,
            alive: true,
            score: 0,
        });

        info!("Added player {} ({}) with mothership {} at {}", id, name, mothership, position);
        id
    }

    /// Add a ship for `player_id` at its mothership's position.
    pub fn create_ship(&mut self, player_id: PlayerId, ship_type: ShipType) -> ExecResult<ShipId> {
        let player = self.player(player_id).ok_or(ExecutionError::UnknownPlayer(player_id))?;
        let position = self.ships[player.mothership].position;
        Ok(self.spawn_ship(player_id, ship_type, position))
    }

    /// Push a ship with default health and type-dependent fuel.
    pub(crate) fn spawn_ship(&mut self, player_id: PlayerId, ship_type: ShipType, position: Vec2) -> ShipId {
        let id = self.ships.len();
        self.ships.push(Ship {
            id,
            player_id,
            position,
            vector: Vec2::ZERO,
            health: self.config.ship_max_health,
            fuel: self.config.start_fuel(ship_type),
            ship_type,
            rock: 0,
            is_destroyed: false,
        });
        id
    }

    /// All players in creation order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Get a player by id.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// All ships in creation order.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// Get a ship by id.
    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(id)
    }

    /// Get a ship mutably by id.
    ///
    /// For collaborators that own rules outside this engine (combat damage,
    /// mining, tick-advance).
    pub fn ship_mut(&mut self, id: ShipId) -> Option<&mut Ship> {
        self.ships.get_mut(id)
    }

    /// Ships owned by a player, in creation order.
    pub fn ships_of(&self, player_id: PlayerId) -> impl Iterator<Item = &Ship> + '_ {
        self.ships.iter().filter(move |s| s.player_id == player_id)
    }

    /// All wormholes in creation order.
    pub fn wormholes(&self) -> &[Wormhole] {
        &self.wormholes
    }

    /// Get a wormhole by id.
    pub fn wormhole(&self, id: usize) -> Option<&Wormhole> {
        self.wormholes.get(id)
    }

    /// All debris in creation order.
    pub fn debris(&self) -> &[Debris] {
        &self.debris
    }

    /// Player's spendable rock (held by the mothership).
    pub fn rock_amount(&self, player_id: PlayerId) -> Option<u32> {
        let player = self.player(player_id)?;
        self.ship(player.mothership).map(|s| s.rock)
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    /// Append a line to the rejection log.
    pub fn log(&mut self, line: String) {
        warn!(tick = self.tick, "{}", line);
        self.pending_log.push(line);
    }

    /// Take pending log lines (consumes them).
    pub fn take_log(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_log)
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.rng_seed, |hasher| {
            for state in self.rng.state() {
                hasher.update_u64(state);
            }

            for player in &self.players {
                hasher.update_u64(player.id as u64);
                hasher.update_str(&player.name);
                hasher.update_u64(player.mothership as u64);
                hasher.update_bool(player.alive);
                hasher.update_u32(player.score);
            }

            for ship in &self.ships {
                hasher.update_u64(ship.id as u64);
                hasher.update_u64(ship.player_id as u64);
                hasher.update_vec2(ship.position);
                hasher.update_vec2(ship.vector);
                hasher.update_i32(ship.health);
                hasher.update_f64(ship.fuel);
                hasher.update_u8(ship.ship_type as u8);
                hasher.update_u32(ship.rock);
                hasher.update_bool(ship.is_destroyed);
            }

            for wormhole in &self.wormholes {
                hasher.update_u64(wormhole.id as u64);
                hasher.update_u64(wormhole.target_id as u64);
                hasher.update_vec2(wormhole.position);
            }

            for debris in &self.debris {
                hasher.update_u64(debris.id as u64);
                hasher.update_u8(debris.kind as u8);
                hasher.update_vec2(debris.position);
                hasher.update_f64(debris.amount);
            }
        })
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("tick", &self.tick)
            .field("rng_seed", &self.rng_seed)
            .field("players", &self.players.len())
            .field("ships", &self.ships.len())
            .field("wormholes", &self.wormholes.len())
            .field("debris", &self.debris.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_type_order() {
        assert!(ShipType::Mothership < ShipType::Sucker);
        assert!(ShipType::Truck < ShipType::Battle);
        assert_eq!(ShipType::MAX, ShipType::Battle);
        assert_eq!(ShipType::from_index(2), Some(ShipType::Drill));
        assert_eq!(ShipType::from_index(6), None);
        assert_eq!(ShipType::from_index(-1), None);
    }

    #[test]
    fn test_buyable_types() {
        assert_eq!(ShipType::buyable(0), None);
        assert_eq!(ShipType::buyable(1), Some(ShipType::Sucker));
        assert_eq!(ShipType::buyable(5), Some(ShipType::Battle));
        assert_eq!(ShipType::buyable(6), None);
        assert_eq!(ShipType::buyable(-3), None);
    }

    #[test]
    fn test_ship_type_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&ShipType::Tanker).unwrap(), "3");
        let parsed: ShipType = serde_json::from_str("4").unwrap();
        assert_eq!(parsed, ShipType::Truck);
        assert!(serde_json::from_str::<ShipType>("9").is_err());
    }

    #[test]
    fn test_create_player_assigns_dense_ids() {
        let mut world = World::new(GameConfig::default(), 1).unwrap();
        let a = world.create_player("alice");
        let b = world.create_player("bob");

        assert_eq!((a, b), (0, 1));
        assert_eq!(world.players().len(), 2);
        assert_eq!(world.ships().len(), 2);

        for player in world.players() {
            let mothership = world.ship(player.mothership).unwrap();
            assert_eq!(mothership.player_id, player.id);
            assert_eq!(mothership.ship_type, ShipType::Mothership);
            assert_eq!(mothership.health, world.config.ship_max_health);
            assert_eq!(mothership.fuel, world.config.mothership_start_fuel);
            assert_eq!(mothership.rock, world.config.player_start_rock);
            assert!(player.alive);
            assert_eq!(player.score, 0);
        }
        assert_eq!(world.rock_amount(a), Some(100));
    }

    #[test]
    fn test_spawn_positions_inside_map() {
        let mut world = World::new(GameConfig::default(), 77).unwrap();
        for i in 0..20 {
            world.create_player(&format!("p{}", i));
        }
        for ship in world.ships() {
            assert!((0.0..world.config.map_width).contains(&ship.position.x));
            assert!((0.0..world.config.map_height).contains(&ship.position.y));
        }
    }

    #[test]
    fn test_create_ship_at_mothership() {
        let mut world = World::new(GameConfig::default(), 3).unwrap();
        let p = world.create_player("alice");
        let id = world.create_ship(p, ShipType::Drill).unwrap();

        let mothership_pos = world.ship(world.player(p).unwrap().mothership).unwrap().position;
        let ship = world.ship(id).unwrap();
        assert_eq!(ship.id, 1);
        assert_eq!(ship.position, mothership_pos);
        assert_eq!(ship.fuel, world.config.ship_start_fuel);
        assert_eq!(ship.rock, 0);
        assert!(ship.is_operable());

        assert_eq!(world.create_ship(9, ShipType::Drill), Err(ExecutionError::UnknownPlayer(9)));
        assert_eq!(world.ships().len(), 2);
    }

    #[test]
    fn test_ships_of_filters_by_owner() {
        let mut world = World::new(GameConfig::default(), 3).unwrap();
        let a = world.create_player("alice");
        let b = world.create_player("bob");
        world.create_ship(a, ShipType::Sucker).unwrap();
        world.create_ship(b, ShipType::Sucker).unwrap();
        world.create_ship(a, ShipType::Truck).unwrap();

        let ids: Vec<ShipId> = world.ships_of(a).map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 2, 4]);
    }

    #[test]
    fn test_world_determinism() {
        let build = || {
            let mut world = World::new(GameConfig::default(), 12345).unwrap();
            for name in ["a", "b", "c", "d"] {
                world.create_player(name);
            }
            world
        };

        let w1 = build();
        let w2 = build();
        for (s1, s2) in w1.ships().iter().zip(w2.ships()) {
            assert_eq!(s1.position, s2.position, "Spawn positions should be deterministic");
        }
        assert_eq!(w1.compute_hash(), w2.compute_hash());

        let mut w3 = World::new(GameConfig::default(), 54321).unwrap();
        for name in ["a", "b", "c", "d"] {
            w3.create_player(name);
        }
        assert_ne!(w1.compute_hash(), w3.compute_hash());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = GameConfig::default();
        config.fuel_cost.exponent = f64::NAN;
        assert!(matches!(
            World::new(config, 1),
            Err(ConfigError::Invalid { field: "fuel_cost.exponent", .. })
        ));

        let mut config = GameConfig::default();
        config.fuel_cost.per_unit.drill = f64::NAN;
        assert!(matches!(
            World::new(config, 1),
            Err(ConfigError::Invalid { field: "fuel_cost.per_unit", .. })
        ));

        let mut config = GameConfig::default();
        config.max_move_magnitude = f64::INFINITY;
        assert!(World::new(config, 1).is_err());
    }

    #[test]
    fn test_log_buffer_drains() {
        let mut world = World::new(GameConfig::default(), 0).unwrap();
        world.log("first".to_string());
        world.log("second".to_string());
        assert_eq!(world.take_log(), vec!["first", "second"]);
        assert!(world.take_log().is_empty());
    }
}
