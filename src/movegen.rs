//! Move generation for the deepmate chess engine.
//!
//! Two layers live here:
//!
//! - **Pseudo-legal generation**: piece geometry and friendly-piece blocking
//!   only — sliders, the knight leaper, king steps, castling candidates, and
//!   pawn pushes/captures with promotion emission. King safety is ignored.
//! - **Legality filtering**: each pseudo-legal move is applied to a scratch
//!   board, the mover's king square is probed for attacks, and the move is
//!   undone. A move that captures the opposing king is accepted outright.
//!
//! Attack probing ([`is_square_attacked`]) tests piece geometry directly and
//! never considers castling; castling candidacy depends on it, so this is
//! what keeps castling emission from recursing into itself.

use crate::moves::Move;
use crate::types::{Board, Piece, PieceKind, Player, Position};

/// Direction vectors for sliding pieces.
const CASTLE_DIRS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const BISHOP_DIRS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const QUEEN_DIRS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// The eight knight hops.
const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

// ---------------------------------------------------------------------------
// Attack detection
// ---------------------------------------------------------------------------

/// Returns `true` if any piece of `attacker` reaches `sq` by geometry alone.
///
/// Castling is never considered, which makes this probe safe to use from
/// castling emission itself.
pub fn is_square_attacked(board: &Board, sq: Position, attacker: Player) -> bool {
    // Knight hops
    for &(dr, dc) in &KNIGHT_OFFSETS {
        if let Some(from) = board.offset(sq, dr, dc)
            && let Some(piece) = board.at(from)
            && piece.owner == attacker
            && piece.kind == PieceKind::Knight
        {
            return true;
        }
    }

    // King steps
    for dr in -1..=1i32 {
        for dc in -1..=1i32 {
            if dr == 0 && dc == 0 {
                continue;
            }
            if let Some(from) = board.offset(sq, dr, dc)
                && let Some(piece) = board.at(from)
                && piece.owner == attacker
                && piece.kind == PieceKind::King
            {
                return true;
            }
        }
    }

    // Pawn captures: the attacking pawn sits one row behind sq, relative to
    // its own forward direction.
    let fwd = attacker.forward();
    for dc in [-1i32, 1] {
        if let Some(from) = board.offset(sq, -fwd, dc)
            && let Some(piece) = board.at(from)
            && piece.owner == attacker
            && piece.kind == PieceKind::Pawn
        {
            return true;
        }
    }

    // Castle/queen along ranks and files
    if slider_reaches(board, sq, attacker, &CASTLE_DIRS, PieceKind::Castle) {
        return true;
    }

    // Bishop/queen along diagonals
    slider_reaches(board, sq, attacker, &BISHOP_DIRS, PieceKind::Bishop)
}

/// Walks each ray in `dirs` away from `sq` and reports whether the first
/// piece found is an attacker of `kind` (or a queen).
fn slider_reaches(
    board: &Board,
    sq: Position,
    attacker: Player,
    dirs: &[(i32, i32)],
    kind: PieceKind,
) -> bool {
    for &(dr, dc) in dirs {
        let mut cur = sq;
        while let Some(next) = board.offset(cur, dr, dc) {
            if let Some(piece) = board.at(next) {
                if piece.owner == attacker && (piece.kind == kind || piece.kind == PieceKind::Queen)
                {
                    return true;
                }
                break;
            }
            cur = next;
        }
    }
    false
}

/// Returns `true` if `side`'s king is currently attacked.
pub fn is_in_check(board: &Board, side: Player) -> bool {
    match board.find_king(side) {
        Some(king) => is_square_attacked(board, king, side.opponent()),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Pseudo-legal generation
// ---------------------------------------------------------------------------

/// All pseudo-legal moves of `side`'s pieces.
pub fn pseudo_legal_moves(board: &Board, side: Player) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for (pos, piece) in board.pieces() {
        if piece.owner == side {
            piece_moves(board, pos, piece, &mut moves);
        }
    }
    moves
}

/// Pseudo-legal moves of the piece standing on `from`, or nothing if the
/// square is empty.
pub fn pseudo_legal_from(board: &Board, from: Position) -> Vec<Move> {
    let mut moves = Vec::new();
    if let Some(piece) = board.at(from) {
        piece_moves(board, from, piece, &mut moves);
    }
    moves
}

fn piece_moves(board: &Board, from: Position, piece: Piece, moves: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::Queen => slider_moves(board, from, piece.owner, &QUEEN_DIRS, moves),
        PieceKind::Castle => slider_moves(board, from, piece.owner, &CASTLE_DIRS, moves),
        PieceKind::Bishop => slider_moves(board, from, piece.owner, &BISHOP_DIRS, moves),
        PieceKind::Knight => knight_moves(board, from, piece.owner, moves),
        PieceKind::King => king_moves(board, from, piece, moves),
        PieceKind::Pawn => pawn_moves(board, from, piece, moves),
    }
}

/// Slider rays: emit empty squares until a blocker; emit an enemy blocker as
/// a capture, never pass through it.
fn slider_moves(
    board: &Board,
    from: Position,
    owner: Player,
    dirs: &[(i32, i32)],
    moves: &mut Vec<Move>,
) {
    for &(dr, dc) in dirs {
        let mut cur = from;
        while let Some(to) = board.offset(cur, dr, dc) {
            match board.at(to) {
                None => {
                    moves.push(Move::regular(from, to));
                    cur = to;
                }
                Some(target) => {
                    if target.owner != owner {
                        moves.push(Move::regular(from, to));
                    }
                    break;
                }
            }
        }
    }
}

fn knight_moves(board: &Board, from: Position, owner: Player, moves: &mut Vec<Move>) {
    for &(dr, dc) in &KNIGHT_OFFSETS {
        if let Some(to) = board.offset(from, dr, dc) {
            match board.at(to) {
                None => moves.push(Move::regular(from, to)),
                Some(target) => {
                    if target.owner != owner {
                        moves.push(Move::regular(from, to));
                    }
                }
            }
        }
    }
}

/// King steps plus castling candidates. Step moves are emitted first so a
/// destination shared with a castling candidate resolves to the step.
fn king_moves(board: &Board, from: Position, king: Piece, moves: &mut Vec<Move>) {
    for dr in -1..=1i32 {
        for dc in -1..=1i32 {
            if dr == 0 && dc == 0 {
                continue;
            }
            if let Some(to) = board.offset(from, dr, dc) {
                match board.at(to) {
                    None => moves.push(Move::regular(from, to)),
                    Some(target) => {
                        if target.owner != king.owner {
                            moves.push(Move::regular(from, to));
                        }
                    }
                }
            }
        }
    }

    castling_candidates(board, from, king, moves);
}

/// Emits castling candidates in both row directions.
///
/// Preconditions checked here: unmoved king, unmoved first-piece rook with at
/// least one empty square between, and no attack on the king's current,
/// traversed, or destination squares. The king travels two squares toward the
/// rook when the gap allows, otherwise one (ending next to the rook); the
/// rook always ends on the far side of the king.
fn castling_candidates(board: &Board, from: Position, king: Piece, moves: &mut Vec<Move>) {
    if king.has_moved {
        return;
    }
    let opponent = king.owner.opponent();
    if is_square_attacked(board, from, opponent) {
        return;
    }

    for dir in [-1i32, 1] {
        // Find the first piece along the row and count the gap to it.
        let mut gap = 0i32;
        let mut cur = from;
        let rook = loop {
            match board.offset(cur, 0, dir) {
                None => break None,
                Some(next) => match board.at(next) {
                    None => {
                        gap += 1;
                        cur = next;
                    }
                    Some(piece) => break Some(piece),
                },
            }
        };

        let Some(rook) = rook else { continue };
        if rook.kind != PieceKind::Castle
            || rook.owner != king.owner
            || rook.has_moved
            || gap == 0
        {
            continue;
        }

        let steps = if gap >= 2 { 2 } else { 1 };
        let mut safe = true;
        for s in 1..=steps {
            let sq = Position::new(from.row, (from.col as i32 + s * dir) as usize);
            if is_square_attacked(board, sq, opponent) {
                safe = false;
                break;
            }
        }
        if safe {
            let dst = Position::new(from.row, (from.col as i32 + steps * dir) as usize);
            moves.push(Move::castling(from, dst));
        }
    }
}

/// Pawn pushes and captures.
///
/// Forward one onto an empty square; forward two for an unmoved pawn when
/// both squares are empty; diagonal-forward only onto an enemy piece. Any
/// landing on the promotion row becomes a promotion move.
fn pawn_moves(board: &Board, from: Position, pawn: Piece, moves: &mut Vec<Move>) {
    let fwd = pawn.owner.forward();
    let promotion_row = pawn.owner.promotion_row(board.height());

    let emit = |to: Position, moves: &mut Vec<Move>| {
        if to.row == promotion_row {
            moves.push(Move::promotion(from, to));
        } else {
            moves.push(Move::regular(from, to));
        }
    };

    // Single and double pushes
    if let Some(one_ahead) = board.offset(from, fwd, 0)
        && board.at(one_ahead).is_none()
    {
        emit(one_ahead, moves);

        if !pawn.has_moved
            && let Some(two_ahead) = board.offset(from, 2 * fwd, 0)
            && board.at(two_ahead).is_none()
        {
            emit(two_ahead, moves);
        }
    }

    // Diagonal captures
    for dc in [-1i32, 1] {
        if let Some(to) = board.offset(from, fwd, dc)
            && let Some(target) = board.at(to)
            && target.owner != pawn.owner
        {
            emit(to, moves);
        }
    }
}

// ---------------------------------------------------------------------------
// Legality filtering
// ---------------------------------------------------------------------------

/// All fully legal moves of `side`.
///
/// A pseudo-legal move survives if it captures the opposing king outright,
/// or if the mover's king square is unattacked once the move is applied. The
/// probe runs against the post-move board, so a capture that removes an
/// attacker is handled naturally. A side with no king has no legal moves.
pub fn legal_moves(board: &Board, side: Player) -> Vec<Move> {
    let Some(king_pos) = board.find_king(side) else {
        return Vec::new();
    };
    let opponent = side.opponent();

    let pseudo = pseudo_legal_moves(board, side);
    let mut legal = Vec::with_capacity(pseudo.len());
    let mut scratch = board.clone();

    for mut mv in pseudo {
        if let Some(target) = board.at(mv.dst())
            && target.owner == opponent
            && target.kind == PieceKind::King
        {
            legal.push(mv);
            continue;
        }

        mv.apply(&mut scratch);
        let king_sq = if mv.src() == king_pos { mv.dst() } else { king_pos };
        let safe = !is_square_attacked(&scratch, king_sq, opponent);
        mv.undo(&mut scratch);

        if safe {
            legal.push(mv);
        }
    }

    legal
}
