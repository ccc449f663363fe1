//! Error types for precondition violations
//!
//! Illegal game actions are not errors: they come back as `false`,
//! `None` or `ActionOutcome::Rejected`. Everything here is a caller bug.

use crate::game::PlayerId;
use crate::hex::Hex;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("tile {0:?} is already occupied")]
    Occupied(Hex),

    #[error("no unit at {0:?}")]
    NoUnitAt(Hex),

    #[error("{0:?} is off the board")]
    OffBoard(Hex),

    #[error("unit belongs to {0:?}, whose turn it is not")]
    NotCurrentPlayer(PlayerId),

    #[error("{0:?} is not an enemy target")]
    FriendlyTarget(Hex),

    #[error("player {0:?} is not registered")]
    UnknownPlayer(PlayerId),

    #[error("a game needs at least one player")]
    NoPlayers,

    #[error("could only place {placed} of {requested} spawn points")]
    SpawnExhausted { requested: usize, placed: usize },

    #[error("unknown terrain symbol {0:?}")]
    InvalidTerrain(char),

    #[error("malformed map: {0}")]
    MalformedMap(String),
}

pub type GameResult<T> = Result<T, GameError>;
