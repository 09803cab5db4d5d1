//! Morris Core - Nine Men's Morris rule engine
//!
//! This crate provides the authoritative rules of the mill game:
//! - Board topology (24 points, adjacency graph)
//! - Mill table and the protected-mill removal rule
//! - Game state and the click-driven transition function
//! - Move scripts and random playouts
//!
//! The engine is pure: [`GameState::apply`] takes a state and one point id
//! and returns the next state plus the events it produced.

pub mod board;
pub mod mill;
pub mod game;
pub mod error;
pub mod script;
pub mod playout;

// Re-exports for convenient access
pub use board::{Board, Point, ADJACENCY, POINT_COUNT, render_ascii};
pub use mill::MILLS;
pub use game::{
    Event, GameResult, GameState, InvalidReason, Phase, Player, PlayerState,
    FLYING_COUNT, PIECES_PER_PLAYER,
};
pub use error::{RuleError, ScriptError};
pub use script::{Position, Replay, ReplayStep, Script};
pub use playout::{random_playout, PlayoutRecord};
