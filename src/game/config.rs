//! Game Configuration
//!
//! Every tuning constant the rules read lives in [`GameConfig`]. Nothing in
//! `game/` hard-codes a price, a speed cap or a radius; tests inject their
//! own tables and hosts load one from JSON.

use std::path::Path;
use serde::{Serialize, Deserialize};
use tracing::info;

use crate::core::vec2::Vec2;
use crate::game::error::ConfigError;
use crate::game::state::ShipType;

/// One value per ship type.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShipTable<T> {
    /// Mothership entry
    pub mothership: T,
    /// Sucker entry
    pub sucker: T,
    /// Drill entry
    pub drill: T,
    /// Tanker entry
    pub tanker: T,
    /// Truck entry
    pub truck: T,
    /// Battle entry
    pub battle: T,
}

impl<T: Copy> ShipTable<T> {
    /// Look up the entry for a ship type.
    pub fn get(&self, ship_type: ShipType) -> T {
        match ship_type {
            ShipType::Mothership => self.mothership,
            ShipType::Sucker => self.sucker,
            ShipType::Drill => self.drill,
            ShipType::Tanker => self.tanker,
            ShipType::Truck => self.truck,
            ShipType::Battle => self.battle,
        }
    }

    /// Iterate entries in ship-type order.
    pub fn iter(&self) -> impl Iterator<Item = (ShipType, T)> + '_ {
        ShipType::ALL.iter().map(move |t| (*t, self.get(*t)))
    }
}

/// Fuel curve for movement.
///
/// `cost = per_unit[type] * |v| ^ exponent`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuelCost {
    /// Fuel per unit of distance, per ship type
    pub per_unit: ShipTable<f64>,
    /// Curve exponent (1.0 = linear)
    pub exponent: f64,
}

impl FuelCost {
    /// Fuel needed to add `vector` to a ship of `ship_type`.
    #[inline]
    pub fn cost(&self, vector: Vec2, ship_type: ShipType) -> f64 {
        self.per_unit.get(ship_type) * vector.length().powf(self.exponent)
    }
}

impl Default for FuelCost {
    fn default() -> Self {
        Self {
            per_unit: ShipTable {
                mothership: 2.0,
                sucker: 0.5,
                drill: 0.8,
                tanker: 0.4,
                truck: 0.6,
                battle: 1.0,
            },
            exponent: 1.0,
        }
    }
}

/// Tuning table consumed by the turn pipeline and the consistency pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Rock price per ship type (mothership entry is never charged)
    pub ship_prices: ShipTable<u32>,
    /// Movement fuel curve
    pub fuel_cost: FuelCost,
    /// Health every ship starts with
    pub ship_max_health: i32,
    /// Fuel a mothership starts with
    pub mothership_start_fuel: f64,
    /// Fuel a bought ship starts with
    pub ship_start_fuel: f64,
    /// Rock a mothership starts with
    pub player_start_rock: u32,
    /// Largest displacement a single Move may add
    pub max_move_magnitude: f64,
    /// Distance below which a ship enters a wormhole
    pub wormhole_radius: f64,
    /// How far from the exit wormhole a ship is placed
    pub wormhole_teleport_distance: f64,
    /// Width of the spawn area
    pub map_width: f64,
    /// Height of the spawn area
    pub map_height: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ship_prices: ShipTable {
                mothership: 0,
                sucker: 30,
                drill: 40,
                tanker: 50,
                truck: 60,
                battle: 100,
            },
            fuel_cost: FuelCost::default(),
            ship_max_health: 100,
            mothership_start_fuel: 1000.0,
            ship_start_fuel: 100.0,
            player_start_rock: 100,
            max_move_magnitude: 50.0,
            wormhole_radius: 20.0,
            wormhole_teleport_distance: 40.0,
            map_width: 1000.0,
            map_height: 1000.0,
        }
    }
}

impl GameConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        info!("Loaded game config from {}", path.display());
        Ok(config)
    }

    /// Price of a ship type.
    #[inline]
    pub fn ship_price(&self, ship_type: ShipType) -> u32 {
        self.ship_prices.get(ship_type)
    }

    /// Fuel needed for a (clamped) move.
    #[inline]
    pub fn movement_cost(&self, vector: Vec2, ship_type: ShipType) -> f64 {
        self.fuel_cost.cost(vector, ship_type)
    }

    /// Starting fuel for a new ship of `ship_type`.
    #[inline]
    pub fn start_fuel(&self, ship_type: ShipType) -> f64 {
        match ship_type {
            ShipType::Mothership => self.mothership_start_fuel,
            _ => self.ship_start_fuel,
        }
    }

    /// Reject values the rules cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("mothership_start_fuel", self.mothership_start_fuel)?;
        non_negative("ship_start_fuel", self.ship_start_fuel)?;
        non_negative("max_move_magnitude", self.max_move_magnitude)?;
        non_negative("wormhole_radius", self.wormhole_radius)?;
        non_negative("wormhole_teleport_distance", self.wormhole_teleport_distance)?;
        non_negative("fuel_cost.exponent", self.fuel_cost.exponent)?;
        for (_, rate) in self.fuel_cost.per_unit.iter() {
            non_negative("fuel_cost.per_unit", rate)?;
        }

        if self.ship_max_health <= 0 {
            return Err(invalid("ship_max_health", "must be positive"));
        }
        if !(self.map_width.is_finite() && self.map_width > 0.0) {
            return Err(invalid("map_width", "must be positive and finite"));
        }
        if !(self.map_height.is_finite() && self.map_height > 0.0) {
            return Err(invalid("map_height", "must be positive and finite"));
        }

        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be finite and >= 0, got {}", value)))
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
