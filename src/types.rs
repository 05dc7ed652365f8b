//! Core types for the deepmate chess engine.
//!
//! This module defines the fundamental data structures used throughout the
//! engine: players, piece representation, board positions, the board grid
//! itself, and the error type shared by every fallible operation.
//!
//! The board is not fixed to 8×8 — dimensions are chosen at construction and
//! every rule scales with them. Row 0 is the bottom edge; the two players are
//! named after the edge their back rank occupies.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::movegen;
use crate::moves::Move;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by the engine core.
///
/// None of these are recovered internally; callers decide whether to retry,
/// report, or abort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// An index query outside the board.
    OutOfBounds { row: usize, col: usize },
    /// A move request that names no legal move of the side to move.
    InvalidMove(String),
    /// An undo request against an empty move history.
    InvalidUndo,
}

impl fmt::Display for ChessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChessError::OutOfBounds { row, col } => {
                write!(f, "square ({row}, {col}) is off the board")
            }
            ChessError::InvalidMove(reason) => write!(f, "invalid move: {reason}"),
            ChessError::InvalidUndo => write!(f, "no moves to undo"),
        }
    }
}

impl std::error::Error for ChessError {}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One of the two players, named after the board edge holding its back rank.
///
/// `Bottom` owns row 0 and moves first in a standard game; `Top` owns the
/// highest row. "Forward" for a pawn is toward the opposing edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Top,
    Bottom,
}

impl Player {
    /// Returns the opposing player.
    pub fn opponent(self) -> Player {
        match self {
            Player::Top => Player::Bottom,
            Player::Bottom => Player::Top,
        }
    }

    /// Row delta of a forward pawn step: -1 for Top, +1 for Bottom.
    pub fn forward(self) -> i32 {
        match self {
            Player::Top => -1,
            Player::Bottom => 1,
        }
    }

    /// The row on which this player's pawns promote.
    pub fn promotion_row(self, height: usize) -> usize {
        match self {
            Player::Top => 0,
            Player::Bottom => height - 1,
        }
    }

    /// The row on which this player's pawns start in the standard setup.
    pub fn pawn_row(self, height: usize) -> usize {
        match self {
            Player::Top => height - 2,
            Player::Bottom => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Top => write!(f, "top"),
            Player::Bottom => write!(f, "bottom"),
        }
    }
}

impl std::str::FromStr for Player {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(Player::Top),
            "bottom" => Ok(Player::Bottom),
            _ => Err(format!("unknown player '{s}' (expected 'top' or 'bottom')")),
        }
    }
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A chess piece kind. `Castle` is the rook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    King,
    Queen,
    Castle,
    Bishop,
    Knight,
    Pawn,
}

/// A piece value: owner, kind, and whether it has moved this game.
///
/// Pieces are immutable — "marking" a piece as moved produces a new value.
/// Equality and hashing cover all three fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub owner: Player,
    pub kind: PieceKind,
    pub has_moved: bool,
}

impl Piece {
    /// Creates a piece that has not yet moved.
    pub fn new(owner: Player, kind: PieceKind) -> Self {
        Self {
            owner,
            kind,
            has_moved: false,
        }
    }

    /// Returns this piece with `has_moved` set.
    pub fn marked_moved(self) -> Self {
        Self {
            has_moved: true,
            ..self
        }
    }

    /// One-letter notation: uppercase for Bottom, lowercase for Top.
    pub fn letter(self) -> char {
        let c = match self.kind {
            PieceKind::King => 'K',
            PieceKind::Queen => 'Q',
            PieceKind::Castle => 'R',
            PieceKind::Bishop => 'B',
            PieceKind::Knight => 'N',
            PieceKind::Pawn => 'P',
        };
        match self.owner {
            Player::Bottom => c,
            Player::Top => c.to_ascii_lowercase(),
        }
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A board square as 0-based (row, col), counted from the bottom-left corner.
///
/// Positions carry no board dimensions; bounds are checked by the [`Board`]
/// they are used against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// A height×width grid of optional pieces.
///
/// `Clone` is a deep copy — the clone shares no mutable state with the
/// original. Equality and hashing are structural over the dimensions and
/// every cell, which is what lets a board serve as a transposition-table key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    height: usize,
    width: usize,
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// Creates an empty board of the given dimensions.
    pub fn new(height: usize, width: usize) -> Self {
        assert!(height >= 2 && width >= 2, "board too small to hold a game");
        Self {
            height,
            width,
            squares: vec![None; height * width],
        }
    }

    /// Creates the standard 8×8 starting position.
    ///
    /// Back ranks run Castle, Knight, Bishop, Queen, King, Bishop, Knight,
    /// Castle; pawns fill the adjacent rows. Bottom occupies rows 0-1, Top
    /// rows 6-7.
    pub fn standard() -> Self {
        let mut board = Board::new(8, 8);

        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Castle,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Castle,
        ];

        for (col, &kind) in BACK_RANK.iter().enumerate() {
            board.put(Position::new(0, col), Some(Piece::new(Player::Bottom, kind)));
            board.put(Position::new(7, col), Some(Piece::new(Player::Top, kind)));
        }
        for col in 0..8 {
            board.put(
                Position::new(1, col),
                Some(Piece::new(Player::Bottom, PieceKind::Pawn)),
            );
            board.put(
                Position::new(6, col),
                Some(Piece::new(Player::Top, PieceKind::Pawn)),
            );
        }

        board
    }

    /// Board height (number of rows).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Board width (number of columns).
    pub fn width(&self) -> usize {
        self.width
    }

    /// (height, width).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * self.width + pos.col
    }

    /// Whether (row, col) names a square of this board.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    /// Returns the piece at (row, col), or `OutOfBounds` for an invalid index.
    pub fn get(&self, row: usize, col: usize) -> Result<Option<Piece>, ChessError> {
        if self.contains(row, col) {
            Ok(self.at(Position::new(row, col)))
        } else {
            Err(ChessError::OutOfBounds { row, col })
        }
    }

    /// Sets or clears the piece at (row, col), or `OutOfBounds` for an
    /// invalid index.
    pub fn set(&mut self, row: usize, col: usize, piece: Option<Piece>) -> Result<(), ChessError> {
        if self.contains(row, col) {
            self.put(Position::new(row, col), piece);
            Ok(())
        } else {
            Err(ChessError::OutOfBounds { row, col })
        }
    }

    /// Unchecked read for positions already known to be on the board.
    pub(crate) fn at(&self, pos: Position) -> Option<Piece> {
        debug_assert!(self.contains(pos.row, pos.col), "position {pos} off board");
        self.squares[self.index(pos)]
    }

    /// Unchecked write for positions already known to be on the board.
    pub(crate) fn put(&mut self, pos: Position, piece: Option<Piece>) {
        debug_assert!(self.contains(pos.row, pos.col), "position {pos} off board");
        let idx = self.index(pos);
        self.squares[idx] = piece;
    }

    /// Offsets `pos` by (row delta, col delta), or `None` if the result
    /// leaves the board.
    pub(crate) fn offset(&self, pos: Position, dr: i32, dc: i32) -> Option<Position> {
        let row = pos.row as i32 + dr;
        let col = pos.col as i32 + dc;
        if row >= 0 && (row as usize) < self.height && col >= 0 && (col as usize) < self.width {
            Some(Position::new(row as usize, col as usize))
        } else {
            None
        }
    }

    /// Iterates over every occupied square.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.squares.iter().enumerate().filter_map(|(i, square)| {
            square.map(|piece| (Position::new(i / self.width, i % self.width), piece))
        })
    }

    /// Finds the king square for the given side.
    ///
    /// Returns `None` if that king is not on the board (the side has already
    /// lost).
    pub fn find_king(&self, side: Player) -> Option<Position> {
        self.pieces()
            .find(|&(_, piece)| piece.owner == side && piece.kind == PieceKind::King)
            .map(|(pos, _)| pos)
    }

    /// All fully legal moves of `side` in this position.
    pub fn all_legal_moves(&self, side: Player) -> Vec<Move> {
        movegen::legal_moves(self, side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(board: &Board) -> u64 {
        let mut hasher = DefaultHasher::new();
        board.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn standard_setup_places_back_ranks_and_pawns() {
        let board = Board::standard();
        assert_eq!(board.dimensions(), (8, 8));
        assert_eq!(
            board.get(0, 4).unwrap(),
            Some(Piece::new(Player::Bottom, PieceKind::King))
        );
        assert_eq!(
            board.get(7, 3).unwrap(),
            Some(Piece::new(Player::Top, PieceKind::Queen))
        );
        for col in 0..8 {
            assert_eq!(
                board.get(1, col).unwrap(),
                Some(Piece::new(Player::Bottom, PieceKind::Pawn))
            );
            assert_eq!(
                board.get(6, col).unwrap(),
                Some(Piece::new(Player::Top, PieceKind::Pawn))
            );
        }
        for row in 2..6 {
            for col in 0..8 {
                assert_eq!(board.get(row, col).unwrap(), None);
            }
        }
    }

    #[test]
    fn get_and_set_reject_out_of_bounds() {
        let mut board = Board::new(6, 6);
        assert_eq!(
            board.get(6, 0),
            Err(ChessError::OutOfBounds { row: 6, col: 0 })
        );
        assert_eq!(
            board.set(0, 9, None),
            Err(ChessError::OutOfBounds { row: 0, col: 9 })
        );
        assert!(board.get(5, 5).is_ok());
    }

    #[test]
    fn clone_is_independent() {
        let original = Board::standard();
        let mut copy = original.clone();
        assert_eq!(original, copy);
        assert_eq!(hash_of(&original), hash_of(&copy));

        copy.set(3, 3, Some(Piece::new(Player::Top, PieceKind::Queen)))
            .unwrap();
        assert_ne!(original, copy);
        assert_eq!(original.get(3, 3).unwrap(), None);
    }

    #[test]
    fn equality_covers_has_moved() {
        let mut a = Board::new(4, 4);
        let mut b = Board::new(4, 4);
        a.set(0, 0, Some(Piece::new(Player::Bottom, PieceKind::Castle)))
            .unwrap();
        b.set(
            0,
            0,
            Some(Piece::new(Player::Bottom, PieceKind::Castle).marked_moved()),
        )
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn find_king_locates_each_side() {
        let board = Board::standard();
        assert_eq!(board.find_king(Player::Bottom), Some(Position::new(0, 4)));
        assert_eq!(board.find_king(Player::Top), Some(Position::new(7, 4)));
        assert_eq!(Board::new(4, 4).find_king(Player::Top), None);
    }

    #[test]
    fn marked_moved_returns_a_new_value() {
        let pawn = Piece::new(Player::Bottom, PieceKind::Pawn);
        let moved = pawn.marked_moved();
        assert!(!pawn.has_moved);
        assert!(moved.has_moved);
        assert_eq!(pawn.owner, moved.owner);
        assert_eq!(pawn.kind, moved.kind);
    }
}
