//! Boundary errors
//!
//! Rule violations by a player are not errors; they come back as
//! [`Event::InvalidMove`](crate::game::Event::InvalidMove). These variants
//! signal a caller bug.

use crate::board::Point;
use crate::game::Player;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("point {0} is off the board (expected 0..24)")]
    PointOutOfRange(Point),

    #[error("game is over, {winner} won; reset before playing on")]
    GameFinished { winner: Player },

    #[error("point {0} is listed more than once")]
    DuplicatePoint(Point),

    #[error("{player} cannot hold {count} pieces")]
    TooManyPieces { player: Player, count: usize },

    #[error("inconsistent game state: {0}")]
    CorruptState(&'static str),
}

/// A scripted click that the engine refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("move #{index} (point {point}): {source}")]
pub struct ScriptError {
    pub index: usize,
    pub point: Point,
    #[source]
    pub source: RuleError,
}
