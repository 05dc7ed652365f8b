//! The reversible move primitive.
//!
//! A [`Move`] is one of three variants — regular, castling, promotion —
//! identified by its kind and its source/target squares. Applying a move
//! records, inside the move itself, exactly the state needed to take it back:
//! the captured piece (if any) and the pre-move `has_moved` flags. Identity
//! is unaffected: two moves with the same kind, source, and target compare
//! and hash equal whether or not either has been applied.
//!
//! `apply` and `undo` assume their preconditions (the move was produced by
//! the generator for this board; undo follows its matching apply). Violations
//! are programming errors, caught by debug assertions rather than `Result`s.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::types::{Board, Piece, PieceKind, Position};

/// Discriminates the three move variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// Any non-castling, non-promotion movement, captures included.
    Regular,
    /// King-and-rook relocation; `src`/`dst` are the king's squares.
    Castling,
    /// A pawn arriving at its promotion row; always yields a queen.
    Promotion,
}

/// State recorded at apply time so that undo is exact.
#[derive(Debug, Clone, Copy)]
enum Undo {
    Regular {
        mover: Piece,
        captured: Option<Piece>,
    },
    Castling {
        king: Piece,
        rook: Piece,
        rook_src: Position,
    },
    Promotion {
        pawn: Piece,
        captured: Option<Piece>,
    },
}

/// A move of one piece (or, for castling, a coupled pair).
///
/// Created by the move generator, consumed by `apply`/`undo`, and either
/// discarded or pushed onto a game's history.
#[derive(Debug, Clone)]
pub struct Move {
    kind: MoveKind,
    src: Position,
    dst: Position,
    undo: Option<Undo>,
}

impl Move {
    /// A regular movement or capture from `src` to `dst`.
    pub fn regular(src: Position, dst: Position) -> Self {
        Self {
            kind: MoveKind::Regular,
            src,
            dst,
            undo: None,
        }
    }

    /// A castling move of the king from `src` to `dst` (same row); the rook
    /// involved is the first piece beyond `dst` as seen from `src`.
    pub fn castling(src: Position, dst: Position) -> Self {
        debug_assert_eq!(src.row, dst.row, "castling must stay on one row");
        Self {
            kind: MoveKind::Castling,
            src,
            dst,
            undo: None,
        }
    }

    /// A pawn move from `src` onto its promotion row at `dst`.
    pub fn promotion(src: Position, dst: Position) -> Self {
        Self {
            kind: MoveKind::Promotion,
            src,
            dst,
            undo: None,
        }
    }

    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    pub fn src(&self) -> Position {
        self.src
    }

    pub fn dst(&self) -> Position {
        self.dst
    }

    /// Column direction of travel, +1 or -1.
    fn col_dir(&self) -> i32 {
        if self.dst.col > self.src.col { 1 } else { -1 }
    }

    /// For a castling move, the square the rook ends on: adjacent to the
    /// king's destination, on the source side.
    fn castling_rook_dst(&self) -> Position {
        Position::new(self.dst.row, (self.dst.col as i32 - self.col_dir()) as usize)
    }

    /// Mutates `board` to carry out this move, recording undo state.
    ///
    /// Applying a move twice without an undo in between is undefined.
    pub fn apply(&mut self, board: &mut Board) {
        debug_assert!(self.undo.is_none(), "move applied twice without undo");
        match self.kind {
            MoveKind::Regular => {
                let mover = board.at(self.src).expect("no piece on move source");
                let captured = board.at(self.dst);
                board.put(self.dst, Some(mover.marked_moved()));
                board.put(self.src, None);
                self.undo = Some(Undo::Regular { mover, captured });
            }
            MoveKind::Castling => {
                let king = board.at(self.src).expect("no king on castling source");
                debug_assert_eq!(king.kind, PieceKind::King);

                // The rook is the first occupied square past dst, away from src.
                let dir = self.col_dir();
                let mut pos = self.dst;
                let (rook_src, rook) = loop {
                    pos = board
                        .offset(pos, 0, dir)
                        .expect("no rook beyond castling destination");
                    if let Some(piece) = board.at(pos) {
                        break (pos, piece);
                    }
                };
                debug_assert!(rook.kind == PieceKind::Castle && rook.owner == king.owner);

                // Clear both origins before placing: on narrow boards the
                // rook's destination can be the king's source square.
                board.put(self.src, None);
                board.put(rook_src, None);
                board.put(self.dst, Some(king.marked_moved()));
                board.put(self.castling_rook_dst(), Some(rook.marked_moved()));
                self.undo = Some(Undo::Castling {
                    king,
                    rook,
                    rook_src,
                });
            }
            MoveKind::Promotion => {
                let pawn = board.at(self.src).expect("no pawn on promotion source");
                debug_assert_eq!(pawn.kind, PieceKind::Pawn);
                let captured = board.at(self.dst);
                board.put(self.src, None);
                board.put(self.dst, Some(Piece::new(pawn.owner, PieceKind::Queen)));
                self.undo = Some(Undo::Promotion { pawn, captured });
            }
        }
    }

    /// Rewinds the matching `apply`, restoring every touched square and
    /// `has_moved` flag to its pre-move state.
    pub fn undo(&mut self, board: &mut Board) {
        let Some(undo) = self.undo.take() else {
            debug_assert!(false, "undo without a matching apply");
            return;
        };
        match undo {
            Undo::Regular { mover, captured } => {
                board.put(self.src, Some(mover));
                board.put(self.dst, captured);
            }
            Undo::Castling {
                king,
                rook,
                rook_src,
            } => {
                board.put(self.dst, None);
                board.put(self.castling_rook_dst(), None);
                board.put(self.src, Some(king));
                board.put(rook_src, Some(rook));
            }
            Undo::Promotion { pawn, captured } => {
                board.put(self.dst, captured);
                board.put(self.src, Some(pawn));
            }
        }
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.src == other.src && self.dst == other.dst
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.src.hash(state);
        self.dst.hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.src, self.dst)?;
        match self.kind {
            MoveKind::Regular => Ok(()),
            MoveKind::Castling => write!(f, " (castling)"),
            MoveKind::Promotion => write!(f, " (=Q)"),
        }
    }
}
