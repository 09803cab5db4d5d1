//! Game state and the rule engine

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{self, Board, Point};
use crate::error::RuleError;
use crate::mill;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Pieces each player places before movement starts
pub const PIECES_PER_PLAYER: u8 = 9;

/// Live count at which a player may fly
pub const FLYING_COUNT: u8 = 3;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player marker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X = 0,
    O = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Game phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Placement,
    Movement,
    Flying,
    Removal,
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    XWins,
    OWins,
}

impl GameResult {
    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::Ongoing => None,
            GameResult::XWins => Some(Player::X),
            GameResult::OWins => Some(Player::O),
        }
    }

    fn won_by(player: Player) -> Self {
        match player {
            Player::X => GameResult::XWins,
            Player::O => GameResult::OWins,
        }
    }
}

/// Why a click was rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// Target point already holds a piece
    Occupied,
    /// Selected the opponent's piece as move source
    NotYourPiece,
    /// Destination is not a neighbor and the mover cannot fly
    NotAdjacent,
    /// Target sits in a mill and its owner has pieces outside mills
    ProtectedByMill,
    /// Target is not a piece of the player losing a piece
    NotRemovable,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            InvalidReason::Occupied => "occupied",
            InvalidReason::NotYourPiece => "not your piece",
            InvalidReason::NotAdjacent => "not adjacent",
            InvalidReason::ProtectedByMill => "protected by mill",
            InvalidReason::NotRemovable => "not removable",
        };
        f.write_str(text)
    }
}

/// Notable outcome of a click, in the order it happened
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    MillFormed { player: Player },
    InvalidMove { reason: InvalidReason },
    PieceRemoved { player: Player, point: Point },
    GameOver { winner: Player },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::MillFormed { player } => write!(f, "{} formed a mill", player),
            Event::InvalidMove { reason } => write!(f, "invalid move: {}", reason),
            Event::PieceRemoved { player, point } => {
                write!(f, "removed {}'s piece at {}", player, point)
            }
            Event::GameOver { winner } => write!(f, "game over, {} wins", winner),
        }
    }
}

/// Derived per-player view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub placed: u8,
    pub live: u8,
    pub flying: bool,
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Game state (immutable per click; `apply` returns a new one)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,

    /// Pieces placed so far (never decremented)
    x_placed: u8,
    o_placed: u8,

    phase: Phase,
    /// Phase to resume once a pending removal is done
    previous_phase: Option<Phase>,

    current_player: Player,
    /// Player who loses a piece in the pending removal
    pending_remover: Option<Player>,
    /// Source of a two-click move
    selected_point: Option<Point>,

    x_flying: bool,
    o_flying: bool,

    result: GameResult,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Canonical initial state: empty board, placement, X to move
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            x_placed: 0,
            o_placed: 0,
            phase: Phase::Placement,
            previous_phase: None,
            current_player: Player::X,
            pending_remover: None,
            selected_point: None,
            x_flying: false,
            o_flying: false,
            result: GameResult::Ongoing,
        }
    }

    /// Fresh game; discards everything about the previous one
    pub fn reset() -> Self {
        Self::new()
    }

    /// Position with placement already finished for both sides
    ///
    /// Phase is derived from the piece counts, so a side with three pieces
    /// starts out flying and a side with fewer has already lost.
    pub fn from_position(x: &[Point], o: &[Point], to_move: Player) -> Result<Self, RuleError> {
        let mut state = Self::new();

        for (player, points) in [(Player::X, x), (Player::O, o)] {
            if points.len() > PIECES_PER_PLAYER as usize {
                return Err(RuleError::TooManyPieces {
                    player,
                    count: points.len(),
                });
            }
            for &point in points {
                if !board::is_valid(point) {
                    return Err(RuleError::PointOutOfRange(point));
                }
                if state.board.get(point).is_some() {
                    return Err(RuleError::DuplicatePoint(point));
                }
                state.board.set(point, Some(player));
            }
        }

        state.x_placed = PIECES_PER_PLAYER;
        state.o_placed = PIECES_PER_PLAYER;
        state.current_player = to_move;
        state.update_phase(&mut Vec::new());
        Ok(state)
    }

    /// Parse a state previously produced by [`GameState::to_json`]
    ///
    /// States that fail [`GameState::validate`] are rejected as data errors.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let state: Self = serde_json::from_str(json)?;
        state
            .validate()
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;
        Ok(state)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Check the bookkeeping fields against each other and the board
    pub fn validate(&self) -> Result<(), RuleError> {
        for player in [Player::X, Player::O] {
            let placed = self.placed(player);
            if placed > PIECES_PER_PLAYER {
                return Err(RuleError::TooManyPieces {
                    player,
                    count: placed as usize,
                });
            }
            if self.live_count(player) > placed {
                return Err(RuleError::CorruptState("more pieces on the board than placed"));
            }
        }

        let removing = self.phase == Phase::Removal;
        if self.pending_remover.is_some() != removing {
            return Err(RuleError::CorruptState("pending remover outside the removal phase"));
        }
        match self.previous_phase {
            Some(Phase::Removal) => {
                return Err(RuleError::CorruptState("removal cannot resume into removal"))
            }
            Some(_) if !removing => {
                return Err(RuleError::CorruptState("phase to resume outside the removal phase"))
            }
            None if removing => {
                return Err(RuleError::CorruptState("removal phase without a phase to resume"))
            }
            _ => {}
        }

        // A mill on the last placement resumes into placement with both sides done
        let placing = self.x_placed < PIECES_PER_PLAYER || self.o_placed < PIECES_PER_PLAYER;
        let resumed = self.previous_phase.unwrap_or(self.phase);
        if placing != (resumed == Phase::Placement) && (placing || !removing) {
            return Err(RuleError::CorruptState("phase does not match the placed counts"));
        }

        if let Some(from) = self.selected_point {
            if !matches!(self.phase, Phase::Movement | Phase::Flying) {
                return Err(RuleError::CorruptState("selection outside movement"));
            }
            if self.board.get(from) != Some(self.current_player) {
                return Err(RuleError::CorruptState("selected point is not the mover's piece"));
            }
        }

        Ok(())
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn previous_phase(&self) -> Option<Phase> {
        self.previous_phase
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Player whose piece is about to be removed (only during removal)
    pub fn pending_remover(&self) -> Option<Player> {
        self.pending_remover
    }

    pub fn selected_point(&self) -> Option<Point> {
        self.selected_point
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn winner(&self) -> Option<Player> {
        self.result.winner()
    }

    pub fn is_over(&self) -> bool {
        self.result != GameResult::Ongoing
    }

    /// Pieces placed so far by a player
    pub fn placed(&self, player: Player) -> u8 {
        match player {
            Player::X => self.x_placed,
            Player::O => self.o_placed,
        }
    }

    /// Pieces a player has on the board
    pub fn live_count(&self, player: Player) -> u8 {
        self.board.count(player)
    }

    /// Check if a player may move to any empty point
    pub fn can_fly(&self, player: Player) -> bool {
        match player {
            Player::X => self.x_flying,
            Player::O => self.o_flying,
        }
    }

    pub fn player_state(&self, player: Player) -> PlayerState {
        PlayerState {
            placed: self.placed(player),
            live: self.live_count(player),
            flying: self.can_fly(player),
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Empty points the piece on `from` may move to
    pub fn destinations(&self, from: Point) -> Vec<Point> {
        let owner = match self.board.get(from) {
            Some(owner) => owner,
            None => return vec![],
        };

        if self.can_fly(owner) {
            self.board.empty_points().filter(|&p| p != from).collect()
        } else {
            board::neighbors(from)
                .iter()
                .copied()
                .filter(|&p| self.board.is_empty(p))
                .collect()
        }
    }

    /// Pieces the pending removal may take
    pub fn removable_points(&self) -> Vec<Point> {
        if self.phase != Phase::Removal {
            return vec![];
        }
        match self.pending_remover {
            Some(victim) => self
                .board
                .pieces(victim)
                .filter(|&p| mill::can_remove(&self.board, p))
                .collect(),
            None => vec![],
        }
    }

    /// Points whose click makes progress in the current phase
    pub fn legal_points(&self) -> Vec<Point> {
        if self.is_over() {
            return vec![];
        }

        match self.phase {
            Phase::Placement => self.board.empty_points().collect(),
            Phase::Removal => self.removable_points(),
            Phase::Movement | Phase::Flying => match self.selected_point {
                Some(from) => self.destinations(from),
                None => self
                    .board
                    .pieces(self.current_player)
                    .filter(|&p| !self.destinations(p).is_empty())
                    .collect(),
            },
        }
    }

    fn has_any_move(&self, player: Player) -> bool {
        self.board
            .pieces(player)
            .any(|p| !self.destinations(p).is_empty())
    }

    // ========================================================================
    // APPLY
    // ========================================================================

    /// Apply one click, returning the next state and what happened
    ///
    /// Rule violations come back as [`Event::InvalidMove`]; `Err` means the
    /// caller sent an off-board point or kept playing a finished game.
    pub fn apply(&self, point: Point) -> Result<(GameState, Vec<Event>), RuleError> {
        if !board::is_valid(point) {
            return Err(RuleError::PointOutOfRange(point));
        }
        if let Some(winner) = self.winner() {
            return Err(RuleError::GameFinished { winner });
        }

        let mut next = self.clone();
        let mut events = Vec::new();

        match self.phase {
            Phase::Placement => next.apply_placement(point, &mut events),
            Phase::Movement | Phase::Flying => next.apply_movement(point, &mut events)?,
            Phase::Removal => next.apply_removal(point, &mut events)?,
        }

        Ok((next, events))
    }

    fn apply_placement(&mut self, point: Point, events: &mut Vec<Event>) {
        if self.board.get(point).is_some() {
            events.push(Event::InvalidMove {
                reason: InvalidReason::Occupied,
            });
            return;
        }

        let player = self.current_player;
        self.board.set(point, Some(player));
        match player {
            Player::X => self.x_placed += 1,
            Player::O => self.o_placed += 1,
        }

        // The mill former keeps the turn until the removal is done
        if mill::forms_mill(&self.board, point, player) {
            events.push(Event::MillFormed { player });
            if !self.enter_removal(player.opponent()) {
                self.current_player = player.opponent();
            }
        } else {
            self.current_player = player.opponent();
        }

        self.update_phase(events);
    }

    fn apply_movement(&mut self, point: Point, events: &mut Vec<Event>) -> Result<(), RuleError> {
        let player = self.current_player;

        let from = match self.selected_point {
            Some(from) => from,
            None => {
                match self.board.get(point) {
                    Some(owner) if owner == player => self.selected_point = Some(point),
                    Some(_) => events.push(Event::InvalidMove {
                        reason: InvalidReason::NotYourPiece,
                    }),
                    None => {}
                }
                return Ok(());
            }
        };

        if self.board.get(from) != Some(player) {
            return Err(RuleError::CorruptState("selected point is not the mover's piece"));
        }

        if point == from {
            self.selected_point = None;
            return Ok(());
        }

        if self.board.get(point).is_some() {
            self.selected_point = None;
            events.push(Event::InvalidMove {
                reason: InvalidReason::Occupied,
            });
            return Ok(());
        }

        if !self.can_fly(player) && !board::is_adjacent(from, point) {
            self.selected_point = None;
            events.push(Event::InvalidMove {
                reason: InvalidReason::NotAdjacent,
            });
            return Ok(());
        }

        self.board.set(from, None);
        self.board.set(point, Some(player));
        self.selected_point = None;

        // Turn passes before the removal here, unlike placement
        self.current_player = player.opponent();
        if mill::forms_mill(&self.board, point, player) {
            events.push(Event::MillFormed { player });
            self.enter_removal(player.opponent());
        }

        self.update_phase(events);
        Ok(())
    }

    fn apply_removal(&mut self, point: Point, events: &mut Vec<Event>) -> Result<(), RuleError> {
        let victim = self
            .pending_remover
            .ok_or(RuleError::CorruptState("removal phase without a pending remover"))?;
        let resume = self
            .previous_phase
            .ok_or(RuleError::CorruptState("removal phase without a phase to resume"))?;

        if self.board.get(point) != Some(victim) {
            events.push(Event::InvalidMove {
                reason: InvalidReason::NotRemovable,
            });
            return Ok(());
        }

        if !mill::can_remove(&self.board, point) {
            events.push(Event::InvalidMove {
                reason: InvalidReason::ProtectedByMill,
            });
            return Ok(());
        }

        self.board.set(point, None);
        events.push(Event::PieceRemoved {
            player: victim,
            point,
        });

        self.pending_remover = None;
        self.previous_phase = None;
        self.phase = resume;
        if resume == Phase::Placement {
            self.current_player = self.current_player.opponent();
        }

        self.update_phase(events);
        Ok(())
    }

    /// Switch to removal of one of `victim`'s pieces
    ///
    /// Returns false (and stays in the current phase) when `victim` has
    /// nothing on the board to take.
    fn enter_removal(&mut self, victim: Player) -> bool {
        if self.board.count(victim) == 0 {
            return false;
        }
        self.previous_phase = Some(self.phase);
        self.phase = Phase::Removal;
        self.pending_remover = Some(victim);
        true
    }

    // ========================================================================
    // PHASE DERIVATION
    // ========================================================================

    /// Re-derive phase from piece counts after the board changed
    fn update_phase(&mut self, events: &mut Vec<Event>) {
        if self.phase == Phase::Removal {
            return;
        }

        if self.phase == Phase::Placement {
            if self.x_placed < PIECES_PER_PLAYER || self.o_placed < PIECES_PER_PLAYER {
                return;
            }
            self.phase = Phase::Movement;
        }

        let x_live = self.board.count(Player::X);
        let o_live = self.board.count(Player::O);

        for (player, live) in [(Player::X, x_live), (Player::O, o_live)] {
            if live < FLYING_COUNT {
                self.finish(player.opponent(), events);
                return;
            }
        }

        if x_live == FLYING_COUNT || o_live == FLYING_COUNT {
            self.phase = Phase::Flying;
            self.x_flying |= x_live == FLYING_COUNT;
            self.o_flying |= o_live == FLYING_COUNT;
        }

        let to_move = self.current_player;
        if !self.can_fly(to_move) && !self.has_any_move(to_move) {
            self.finish(to_move.opponent(), events);
        }
    }

    fn finish(&mut self, winner: Player, events: &mut Vec<Event>) {
        self.result = GameResult::won_by(winner);
        self.selected_point = None;
        events.push(Event::GameOver { winner });
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
