//! Mill table and mill queries
//!
//! Everything here recomputes from the board; nothing is cached between calls.

use crate::board::{Board, Point};
use crate::game::Player;

/// Number of straight three-point lines
pub const MILL_COUNT: usize = 16;

/// All straight lines of three connected points
pub static MILLS: [[Point; 3]; MILL_COUNT] = [
    // Horizontal
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [9, 10, 11],
    [12, 13, 14],
    [15, 16, 17],
    [18, 19, 20],
    [21, 22, 23],
    // Vertical
    [0, 9, 21],
    [3, 10, 18],
    [6, 11, 15],
    [1, 4, 7],
    [16, 19, 22],
    [8, 12, 17],
    [5, 13, 20],
    [2, 14, 23],
];

/// Lines passing through a point (always two for on-board points)
pub fn mills_through(point: Point) -> impl Iterator<Item = &'static [Point; 3]> {
    MILLS.iter().filter(move |mill| mill.contains(&point))
}

/// Check if a line is fully held by one player
pub fn is_complete(board: &Board, mill: &[Point; 3], player: Player) -> bool {
    mill.iter().all(|&p| board.get(p) == Some(player))
}

/// Number of complete `player` lines through `point`
///
/// A single move can close two lines at once; callers still report one mill.
pub fn mills_formed_at(board: &Board, point: Point, player: Player) -> usize {
    mills_through(point)
        .filter(|mill| is_complete(board, mill, player))
        .count()
}

/// Check if `player` holds a complete line through `point`
pub fn forms_mill(board: &Board, point: Point, player: Player) -> bool {
    mills_formed_at(board, point, player) > 0
}

/// Check if the piece on `point` sits in a complete line of its owner
pub fn in_mill(board: &Board, point: Point) -> bool {
    match board.get(point) {
        Some(owner) => forms_mill(board, point, owner),
        None => false,
    }
}

/// Check if every piece of `player` sits in a complete line
pub fn all_in_mills(board: &Board, player: Player) -> bool {
    board.pieces(player).all(|p| forms_mill(board, p, player))
}

/// Protected-mill rule: a piece may be taken unless it sits in a mill
/// while its owner still has a piece outside every mill
pub fn can_remove(board: &Board, point: Point) -> bool {
    match board.get(point) {
        Some(owner) => !in_mill(board, point) || all_in_mills(board, owner),
        None => false,
    }
}
