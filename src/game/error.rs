//! Error Types
//!
//! Turn errors come in exactly two tiers. Neither tier is fatal: the
//! offending submission is logged and skipped, the rest of the batch runs.

use thiserror::Error;

use crate::game::state::{PlayerId, ShipId};
use crate::game::turn::TurnType;

/// A submission whose payload could not be turned into an action.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    /// Tag is missing or not an integer.
    #[error("invalid turn type tag: {0}")]
    InvalidTag(String),

    /// Tag is not one of the known turn types.
    #[error("unknown turn type: {0}")]
    UnknownTurnType(i64),

    /// Payload does not match the schema for its tag.
    #[error("malformed {kind:?} payload: {reason}")]
    MalformedPayload {
        /// Tag the payload was decoded against
        kind: TurnType,
        /// Parser message
        reason: String,
    },
}

/// A well-formed action that is not valid against the current world.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExecutionError {
    /// Submitting player does not exist.
    #[error("unknown player: {0}")]
    UnknownPlayer(PlayerId),

    /// Requested ship type cannot be bought.
    #[error("invalid ship type: {0}")]
    InvalidShipType(i64),

    /// Mothership does not hold enough rock.
    #[error("not enough rocks in mothership: needed {needed}, has {available}")]
    InsufficientRock {
        /// Price of the requested ship
        needed: u32,
        /// Current balance
        available: u32,
    },

    /// Ship id is outside the world's ship collection.
    #[error("invalid ship id: {0}")]
    InvalidShipId(i64),

    /// Submitting player has lost their mothership.
    #[error("player {0} has been eliminated")]
    PlayerEliminated(PlayerId),

    /// Ship belongs to someone else.
    #[error("ship {ship_id} does not belong to player {player_id}")]
    NotOwner {
        /// Target ship
        ship_id: ShipId,
        /// Submitting player
        player_id: PlayerId,
    },

    /// Ship has already been destroyed.
    #[error("ship {0} is destroyed")]
    ShipDestroyed(ShipId),

    /// The player's mothership has been destroyed.
    #[error("mothership of player {0} is destroyed")]
    MothershipDestroyed(PlayerId),

    /// Requested displacement is not a finite vector.
    #[error("invalid movement vector")]
    InvalidVector,

    /// Ship does not carry enough fuel for the move.
    #[error("insufficient fuel for ship: needed {needed}, has {available}")]
    InsufficientFuel {
        /// Cost of the clamped move
        needed: f64,
        /// Fuel on hand
        available: f64,
    },

    /// Tag is recognized but no rule is installed for it.
    #[error("{0:?} turns are not supported")]
    Unsupported(TurnType),
}

/// Either tier of turn failure.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TurnError {
    /// Payload could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Action was rejected by the world.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Errors raised while loading or validating a [`GameConfig`](crate::game::config::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config document is not valid JSON for the schema.
    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the engine cannot run with.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Alias for `Result<T, ExecutionError>`.
pub type ExecResult<T> = Result<T, ExecutionError>;
