//! Move scripts - recorded click sequences stored as JSON

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::board::Point;
use crate::error::{RuleError, ScriptError};
use crate::game::{Event, GameState, Player};

/// Starting position with placement already done
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: Vec<Point>,
    pub o: Vec<Point>,
    pub to_move: Player,
}

/// A sequence of clicks, optionally from a preset position
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start: Option<Position>,
    pub moves: Vec<Point>,
}

/// One applied click and what it produced
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReplayStep {
    pub point: Point,
    pub events: Vec<Event>,
}

/// Outcome of running a whole script
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Replay {
    pub steps: Vec<ReplayStep>,
    pub final_state: GameState,
}

impl Script {
    pub fn new(moves: Vec<Point>) -> Self {
        Self {
            name: None,
            start: None,
            moves,
        }
    }

    /// Load from JSON file (either a script object or a bare array of points)
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        if let Ok(moves) = serde_json::from_str::<Vec<Point>>(content) {
            return Ok(Self::new(moves));
        }

        let script: Script = serde_json::from_str(content)?;
        Ok(script)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// State the first move is applied to
    pub fn initial_state(&self) -> Result<GameState, RuleError> {
        match &self.start {
            Some(pos) => GameState::from_position(&pos.x, &pos.o, pos.to_move),
            None => Ok(GameState::new()),
        }
    }

    /// Apply every move in order, stopping at the first refused click
    pub fn replay(&self) -> Result<Replay, ScriptError> {
        let mut state = self.initial_state().map_err(|source| ScriptError {
            index: 0,
            point: 0,
            source,
        })?;
        let mut steps = Vec::with_capacity(self.moves.len());

        for (i, &point) in self.moves.iter().enumerate() {
            let (next, events) = state.apply(point).map_err(|source| ScriptError {
                index: i + 1,
                point,
                source,
            })?;
            state = next;
            steps.push(ReplayStep { point, events });
        }

        Ok(Replay {
            steps,
            final_state: state,
        })
    }
}
