//! Error types

use crate::board::{Cell, Direction};

/// A move request the orchestrator refused. The live board is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("the game is over")]
    GameOver,

    #[error("it is not this player's turn")]
    NotYourTurn,

    #[error("a long move is in progress")]
    LongMoveActive,

    #[error("no long move is in progress")]
    NoLongMove,

    #[error("no pebble on {0}")]
    EmptySource(Cell),

    #[error("pebble on {0} belongs to the other player")]
    NotOwner(Cell),

    #[error("{from} and {to} are not adjacent")]
    NotAdjacent { from: Cell, to: Cell },

    #[error("{0} is occupied")]
    Occupied(Cell),

    #[error("{0} is off the board")]
    OffBoard(Cell),

    #[error("no long move from {from} heading {direction}")]
    IllegalLongMove { from: Cell, direction: Direction },

    #[error("the long move has already captured")]
    AlreadyCaptured,

    #[error("result was computed for an earlier turn")]
    Stale,

    #[error("peer step {from} -> {to} does not match the local long move at {local}")]
    OutOfSync { from: Cell, to: Cell, local: Cell },
}

/// A wire message that could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("empty message")]
    Empty,

    #[error("unrecognized message: {0:?}")]
    UnknownTag(String),

    #[error("invalid direction: {0:?}")]
    UnknownDirection(char),

    #[error("expected {expected} fields, found {found}")]
    Arity { expected: usize, found: usize },

    #[error("invalid number: {0:?}")]
    BadNumber(String),

    #[error("coordinate out of bounds: {0}")]
    OutOfBounds(i8),
}

/// Anything that can go wrong handling an external request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
