//! Random playouts over legal clicks

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::Point;
use crate::game::{Event, GameResult, GameState, Player};

/// Outcome of a single random game
#[derive(Clone, Debug)]
pub struct PlayoutRecord {
    /// Final game result (`Ongoing` if the ply cap was hit)
    pub result: GameResult,
    /// Clicks applied
    pub plies: usize,
    /// Mills formed over the whole game
    pub mills: usize,
    /// Click history
    pub points: Vec<Point>,
    pub final_state: GameState,
}

impl PlayoutRecord {
    pub fn winner(&self) -> Option<Player> {
        self.result.winner()
    }

    /// Check if the game was cut off by the ply cap
    pub fn is_unfinished(&self) -> bool {
        self.result == GameResult::Ongoing
    }
}

/// Click uniformly random legal points until the game ends or `max_plies` is hit
pub fn random_playout<R: Rng>(initial: GameState, rng: &mut R, max_plies: usize) -> PlayoutRecord {
    let mut state = initial;
    let mut points = Vec::new();
    let mut mills = 0;

    while !state.is_over() && points.len() < max_plies {
        let legal = state.legal_points();
        let point = match legal.choose(rng) {
            Some(&p) => p,
            None => break,
        };

        // Legal points are on the board and the game is ongoing
        let (next, events) = match state.apply(point) {
            Ok(step) => step,
            Err(_) => break,
        };

        mills += events
            .iter()
            .filter(|e| matches!(e, Event::MillFormed { .. }))
            .count();
        points.push(point);
        state = next;
    }

    PlayoutRecord {
        result: state.result(),
        plies: points.len(),
        mills,
        points,
        final_state: state,
    }
}
