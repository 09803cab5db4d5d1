//! Board geometry: 24 points on three nested squares
//!
//! ```text
//! 0----------1----------2
//! |          |          |
//! |  3-------4-------5  |
//! |  |       |       |  |
//! |  |   6---7---8   |  |
//! |  |   |       |   |  |
//! 9--10--11      12--13-14
//! |  |   |       |   |  |
//! |  |   15--16--17  |  |
//! |  |       |       |  |
//! |  18------19------20 |
//! |          |          |
//! 21---------22--------23
//! ```

use serde::{Deserialize, Serialize};

use crate::game::Player;

/// Point identifier (0..24)
pub type Point = u8;

/// Number of points on the board
pub const POINT_COUNT: usize = 24;

/// Neighbors of each point along the drawn lines
pub static ADJACENCY: [&[Point]; POINT_COUNT] = [
    &[1, 9],          // 0
    &[0, 2, 4],       // 1
    &[1, 14],         // 2
    &[4, 10],         // 3
    &[1, 3, 5, 7],    // 4
    &[4, 13],         // 5
    &[7, 11],         // 6
    &[4, 6, 8],       // 7
    &[7, 12],         // 8
    &[0, 10, 21],     // 9
    &[3, 9, 11, 18],  // 10
    &[6, 10, 15],     // 11
    &[8, 13, 17],     // 12
    &[5, 12, 14, 20], // 13
    &[2, 13, 23],     // 14
    &[11, 16],        // 15
    &[15, 17, 19],    // 16
    &[12, 16],        // 17
    &[10, 19],        // 18
    &[16, 18, 20, 22], // 19
    &[13, 19],        // 20
    &[9, 22],         // 21
    &[19, 21, 23],    // 22
    &[14, 22],        // 23
];

/// Check if a point id is on the board
pub fn is_valid(point: Point) -> bool {
    (point as usize) < POINT_COUNT
}

/// Neighbors of a point (empty slice for off-board ids)
pub fn neighbors(point: Point) -> &'static [Point] {
    ADJACENCY.get(point as usize).copied().unwrap_or(&[])
}

/// Check if two points share a line segment
pub fn is_adjacent(from: Point, to: Point) -> bool {
    neighbors(from).contains(&to)
}

/// Occupancy of all 24 points
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [Option<Player>; POINT_COUNT],
}

impl Board {
    /// Empty board
    pub const fn new() -> Self {
        Self {
            cells: [None; POINT_COUNT],
        }
    }

    /// Occupant of a point
    pub fn get(&self, point: Point) -> Option<Player> {
        self.cells.get(point as usize).copied().flatten()
    }

    pub(crate) fn set(&mut self, point: Point, occupant: Option<Player>) {
        self.cells[point as usize] = occupant;
    }

    pub fn is_empty(&self, point: Point) -> bool {
        is_valid(point) && self.get(point).is_none()
    }

    /// Live piece count for a player
    pub fn count(&self, player: Player) -> u8 {
        self.cells.iter().filter(|&&c| c == Some(player)).count() as u8
    }

    /// Points held by a player, ascending
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = Point> + '_ {
        self.points().filter(move |&p| self.get(p) == Some(player))
    }

    /// Unoccupied points, ascending
    pub fn empty_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.points().filter(move |&p| self.get(p).is_none())
    }

    /// Raw occupant array, indexed by point id
    pub fn cells(&self) -> &[Option<Player>; POINT_COUNT] {
        &self.cells
    }

    fn points(&self) -> impl Iterator<Item = Point> {
        0..POINT_COUNT as Point
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Text diagram; `@` marks are filled with occupants in point order
const DIAGRAM: &str = "\
@----------@----------@
|          |          |
|  @-------@-------@  |
|  |       |       |  |
|  |   @---@---@   |  |
|  |   |       |   |  |
@--@---@       @---@--@
|  |   |       |   |  |
|  |   @---@---@   |  |
|  |       |       |  |
|  @-------@-------@  |
|          |          |
@----------@----------@";

/// Render the board as a fixed-width diagram (`X`, `O`, `.` for empty)
pub fn render_ascii(board: &Board) -> String {
    let mut points = 0..POINT_COUNT as Point;
    DIAGRAM
        .chars()
        .map(|c| match c {
            '@' => match points.next().and_then(|p| board.get(p)) {
                Some(player) => player.symbol(),
                None => '.',
            },
            other => other,
        })
        .collect()
}
