//! Leaf evaluation for the search engine.
//!
//! Scores are integers from the root side's perspective — higher is better
//! for the side the searcher plays. The evaluator sees only the board, the
//! root side, and the combined legal-move list of both sides at the leaf;
//! the owner of each move is read back from the board at its source square.

use crate::moves::Move;
use crate::types::{Board, PieceKind, Player, Position};

/// Score of a position where the root side has already won.
///
/// Strictly exceeds every heuristic evaluation.
pub const MAX_SCORE: i32 = 1_000_000;

/// Score of a position where the root side has already lost.
pub const MIN_SCORE: i32 = -1_000_000;

/// Material weight of a piece kind.
pub fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 10,
        PieceKind::Knight | PieceKind::Bishop => 30,
        PieceKind::Castle => 50,
        PieceKind::Queen => 90,
        PieceKind::King => 900,
    }
}

/// A pluggable position evaluator.
pub trait Evaluate {
    /// Scores `board` for `root_side`; `legal` is the combined legal-move
    /// list of both sides in this position.
    fn evaluate(&self, board: &Board, root_side: Player, legal: &[Move]) -> i32;
}

/// The default evaluator: material, pawn structure, and mobility.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEval;

impl Evaluate for StandardEval {
    fn evaluate(&self, board: &Board, root_side: Player, legal: &[Move]) -> i32 {
        let mut score = 0;

        for (pos, piece) in board.pieces() {
            let value = piece_value(piece.kind);
            if piece.owner == root_side {
                score += value;
                if piece.kind == PieceKind::Pawn {
                    score += pawn_structure(board, pos, piece.owner);
                }
            } else {
                score -= value;
            }
        }

        // Mobility: every legal move of ours counts for us, every legal move
        // of the opponent against us.
        for mv in legal {
            match board.at(mv.src()) {
                Some(piece) if piece.owner == root_side => score += 1,
                Some(_) => score -= 1,
                None => debug_assert!(false, "legal move {mv} has an empty source"),
            }
        }

        score
    }
}

/// Per-pawn structural terms: advancement from the starting row, +5 when the
/// square ahead is occupied, +5 more when that blocker is a friendly pawn.
fn pawn_structure(board: &Board, pos: Position, owner: Player) -> i32 {
    let start_row = owner.pawn_row(board.height()) as i32;
    let mut bonus = (pos.row as i32 - start_row).abs();

    if let Some(ahead) = board.offset(pos, owner.forward(), 0)
        && let Some(blocker) = board.at(ahead)
    {
        bonus += 5;
        if blocker.owner == owner && blocker.kind == PieceKind::Pawn {
            bonus += 5;
        }
    }

    bonus
}
