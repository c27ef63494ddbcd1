//! Turn Pipeline
//!
//! Players submit batches of tagged payloads. Each submission is decoded
//! against its tag, dispatched to its rule and either applied in full or
//! rejected with a log line. A rejection never touches the world and never
//! stops the rest of the batch.
//!
//! ```text
//! TurnContainer ──decode──► Turn ──execute──► World
//!        │                    │
//!        └── DecodeError      └── ExecutionError
//!               (both: log line + TurnRejected event, continue)
//! ```

use std::fmt;
use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::core::vec2::Vec2;
use crate::game::error::{DecodeError, ExecResult, ExecutionError, TurnError};
use crate::game::events::GameEvent;
use crate::game::ship::validate_ship_operable;
use crate::game::state::{PlayerId, ShipId, ShipType, World};

// =============================================================================
// TAGS
// =============================================================================

/// Submission tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TurnType {
    /// Buy a ship with mothership rock
    Buy = 0,
    /// Add to a ship's travel vector
    Move = 1,
    /// Reserved: cargo transfer
    Load = 2,
    /// Reserved: fuel transfer
    Siphon = 3,
    /// Reserved: combat
    Shoot = 4,
}

impl TurnType {
    /// Map a wire tag to a turn type.
    pub fn from_code(code: i64) -> Option<TurnType> {
        match code {
            0 => Some(TurnType::Buy),
            1 => Some(TurnType::Move),
            2 => Some(TurnType::Load),
            3 => Some(TurnType::Siphon),
            4 => Some(TurnType::Shoot),
            _ => None,
        }
    }

    /// Wire tag.
    #[inline]
    pub fn code(self) -> i64 {
        self as i64
    }
}

// =============================================================================
// WIRE FORMAT
// =============================================================================

/// One submission as received: `{ "type": <int>, "data": <json> }`.
///
/// The tag is kept as raw JSON so a missing, non-integer or unknown tag
/// survives parsing and is rejected per submission instead of failing the
/// whole batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnContainer {
    /// Wire tag, unchecked
    #[serde(rename = "type", default)]
    pub kind: Value,
    /// Tag-specific payload
    #[serde(default)]
    pub data: Value,
}

impl TurnContainer {
    /// Wrap a raw tag and payload.
    pub fn new(kind: i64, data: Value) -> Self {
        Self {
            kind: Value::from(kind),
            data,
        }
    }

    /// Wrap one element of a submission array.
    ///
    /// Anything that is not an object keeps a null tag and fails decoding.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => Self {
                kind: fields.remove("type").unwrap_or(Value::Null),
                data: fields.remove("data").unwrap_or(Value::Null),
            },
            other => Self {
                kind: Value::Null,
                data: other,
            },
        }
    }

    /// Turn type named by the tag, if it is a known integer code.
    pub fn turn_type(&self) -> Option<TurnType> {
        self.kind.as_i64().and_then(TurnType::from_code)
    }

    /// Buy submission.
    pub fn buy(ship_type: ShipType) -> Self {
        Self::new(
            TurnType::Buy.code(),
            serde_json::json!({ "type": u8::from(ship_type) }),
        )
    }

    /// Move submission.
    pub fn move_ship(ship_id: ShipId, vector: Vec2) -> Self {
        Self::new(
            TurnType::Move.code(),
            serde_json::json!({ "ship_id": ship_id, "vector": { "x": vector.x, "y": vector.y } }),
        )
    }

    /// Parse a JSON array of submissions.
    ///
    /// Only a document that is not a JSON array fails; bad elements are
    /// kept and rejected one by one when the batch runs.
    pub fn parse_batch(json: &str) -> Result<Vec<TurnContainer>, serde_json::Error> {
        let raw: Vec<Value> = serde_json::from_str(json)?;
        Ok(raw.into_iter().map(TurnContainer::from_value).collect())
    }

    /// Decode the payload according to the tag.
    pub fn decode(&self) -> Result<Turn, DecodeError> {
        let code = self
            .kind
            .as_i64()
            .ok_or_else(|| DecodeError::InvalidTag(self.kind.to_string()))?;
        let kind = TurnType::from_code(code).ok_or(DecodeError::UnknownTurnType(code))?;
        let malformed = |e: serde_json::Error| DecodeError::MalformedPayload {
            kind,
            reason: e.to_string(),
        };

        let turn = match kind {
            TurnType::Buy => Turn::Buy(BuyTurn::deserialize(&self.data).map_err(malformed)?),
            TurnType::Move => Turn::Move(MoveTurn::deserialize(&self.data).map_err(malformed)?),
            TurnType::Load => Turn::Load(Map::deserialize(&self.data).map_err(malformed)?),
            TurnType::Siphon => Turn::Siphon(Map::deserialize(&self.data).map_err(malformed)?),
            TurnType::Shoot => Turn::Shoot(Map::deserialize(&self.data).map_err(malformed)?),
        };
        Ok(turn)
    }
}

impl fmt::Display for TurnContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{{\"type\":{}}}", self.kind),
        }
    }
}

// =============================================================================
// DECODED TURNS
// =============================================================================

/// Buy payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuyTurn {
    /// Requested ship type, still unchecked
    #[serde(rename = "type", alias = "Type", alias = "ship_type")]
    pub ship_type: i64,
}

/// Move payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveTurn {
    /// Target ship, still unchecked
    pub ship_id: i64,
    /// Requested displacement before clamping
    pub vector: Vec2,
}

/// A decoded submission.
#[derive(Clone, Debug, PartialEq)]
pub enum Turn {
    /// Buy a ship
    Buy(BuyTurn),
    /// Move a ship
    Move(MoveTurn),
    /// Reserved
    Load(Map<String, Value>),
    /// Reserved
    Siphon(Map<String, Value>),
    /// Reserved
    Shoot(Map<String, Value>),
}

impl Turn {
    /// Tag of this turn.
    pub fn kind(&self) -> TurnType {
        match self {
            Turn::Buy(_) => TurnType::Buy,
            Turn::Move(_) => TurnType::Move,
            Turn::Load(_) => TurnType::Load,
            Turn::Siphon(_) => TurnType::Siphon,
            Turn::Shoot(_) => TurnType::Shoot,
        }
    }

    /// Validate against the world, then apply.
    ///
    /// Eliminated players cannot act. On error the world is unchanged.
    pub fn execute(&self, world: &mut World, player_id: PlayerId) -> ExecResult<()> {
        let player = world.player(player_id).ok_or(ExecutionError::UnknownPlayer(player_id))?;
        if !player.alive {
            return Err(ExecutionError::PlayerEliminated(player_id));
        }

        match self {
            Turn::Buy(buy) => execute_buy(world, player_id, buy).map(|_| ()),
            Turn::Move(mv) => execute_move(world, player_id, mv),
            Turn::Load(_) | Turn::Siphon(_) | Turn::Shoot(_) => {
                Err(ExecutionError::Unsupported(self.kind()))
            }
        }
    }
}

// =============================================================================
// RULES
// =============================================================================

/// Debit the price from the mothership and spawn the ship next to it.
fn execute_buy(world: &mut World, player_id: PlayerId, buy: &BuyTurn) -> ExecResult<ShipId> {
    let ship_type = ShipType::buyable(buy.ship_type)
        .ok_or(ExecutionError::InvalidShipType(buy.ship_type))?;

    let mothership_id = world
        .player(player_id)
        .map(|p| p.mothership)
        .ok_or(ExecutionError::UnknownPlayer(player_id))?;
    let mothership = validate_ship_operable(world, mothership_id)
        .map_err(|_| ExecutionError::MothershipDestroyed(player_id))?;

    let price = world.config.ship_price(ship_type);
    if mothership.rock < price {
        return Err(ExecutionError::InsufficientRock {
            needed: price,
            available: mothership.rock,
        });
    }
    let position = mothership.position;

    // Validation done; nothing below can fail
    if let Some(m) = world.ship_mut(mothership_id) {
        m.rock -= price;
    }
    let ship_id = world.spawn_ship(player_id, ship_type, position);

    debug!("Player {} bought {:?} (ship {}) for {}", player_id, ship_type, ship_id, price);
    let tick = world.tick;
    world.push_event(GameEvent::ship_purchased(tick, player_id, ship_id, ship_type, price));
    Ok(ship_id)
}

/// Clamp, charge fuel and accumulate into the ship's vector.
fn execute_move(world: &mut World, player_id: PlayerId, mv: &MoveTurn) -> ExecResult<()> {
    if mv.ship_id < 0 || mv.ship_id as u64 >= world.ships().len() as u64 {
        return Err(ExecutionError::InvalidShipId(mv.ship_id));
    }
    let ship_id = mv.ship_id as ShipId;

    let ship = validate_ship_operable(world, ship_id)?;
    if ship.player_id != player_id {
        return Err(ExecutionError::NotOwner { ship_id, player_id });
    }
    if !mv.vector.is_finite() {
        return Err(ExecutionError::InvalidVector);
    }

    let applied = mv.vector.clamp_length(world.config.max_move_magnitude);
    let fuel_cost = world.config.movement_cost(applied, ship.ship_type);
    if ship.fuel < fuel_cost {
        return Err(ExecutionError::InsufficientFuel {
            needed: fuel_cost,
            available: ship.fuel,
        });
    }

    if let Some(ship) = world.ship_mut(ship_id) {
        ship.vector += applied;
        ship.fuel -= fuel_cost;
    }

    debug!("Ship {} of player {} moved by {} for {} fuel", ship_id, player_id, applied, fuel_cost);
    let tick = world.tick;
    world.push_event(GameEvent::ship_moved(tick, player_id, ship_id, applied, fuel_cost));
    Ok(())
}

// =============================================================================
// BATCH
// =============================================================================

/// Outcome counts for one batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Submissions applied
    pub applied: usize,
    /// Submissions skipped
    pub rejected: usize,
}

/// Decode and execute one submission.
pub fn execute_turn(world: &mut World, player_id: PlayerId, container: &TurnContainer) -> Result<(), TurnError> {
    let turn = container.decode()?;
    turn.execute(world, player_id)?;
    Ok(())
}

/// Apply a player's batch in order.
///
/// Every failure becomes one log line and one `TurnRejected` event; the
/// next submission runs regardless.
pub fn execute_turns(world: &mut World, player_id: PlayerId, turns: &[TurnContainer]) -> BatchReport {
    let mut report = BatchReport::default();

    for container in turns {
        match execute_turn(world, player_id, container) {
            Ok(()) => report.applied += 1,
            Err(err) => {
                report.rejected += 1;
                let line = match &err {
                    TurnError::Decode(e) => format!("could not parse turn '{}': {}", container, e),
                    TurnError::Execution(e) => format!("error while executing turn '{}': {}", container, e),
                };
                world.log(line);

                let tick = world.tick;
                let kind = container.turn_type();
                world.push_event(GameEvent::turn_rejected(tick, player_id, kind, err.to_string()));
            }
        }
    }

    report
}
