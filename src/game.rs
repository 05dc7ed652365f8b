//! Game state management for the deepmate chess engine.
//!
//! [`Game`] couples a board with the side to move and the stack of moves
//! that produced the current position. It is the surface the renderer,
//! controller, and search engine talk to: queries (`piece_at`,
//! `legal_targets_from`, `is_game_over`), mutations (`make_move`,
//! `undo_last_move`, `restart`), and board snapshots for the searchers.

use crate::movegen;
use crate::moves::Move;
use crate::types::{Board, ChessError, Piece, Player, Position};

/// A chess game in progress: board, side to move, and move history.
///
/// Within `make_move` the sequence validate → apply → push → flip is atomic
/// with respect to other `Game` operations; callers must not re-enter the
/// game from inside apply/undo.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    turn: Player,
    history: Vec<Move>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a game on the standard 8×8 starting position, Bottom to move.
    pub fn new() -> Self {
        Self {
            board: Board::standard(),
            turn: Player::Bottom,
            history: Vec::new(),
        }
    }

    /// Creates a game from an arbitrary position with an empty history.
    pub fn from_position(board: Board, turn: Player) -> Self {
        Self {
            board,
            turn,
            history: Vec::new(),
        }
    }

    /// Resets to the initial state.
    pub fn restart(&mut self) {
        log::info!("restarting game after {} moves", self.history.len());
        *self = Game::new();
    }

    /// (height, width) of the underlying board.
    pub fn dimensions(&self) -> (usize, usize) {
        self.board.dimensions()
    }

    /// The side to move.
    pub fn current_player(&self) -> Player {
        self.turn
    }

    /// A read-only view of the board, for renderers.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// An independent board snapshot, for searchers.
    pub fn board_copy(&self) -> Board {
        self.board.clone()
    }

    /// The piece at (row, col); `OutOfBounds` on an invalid index.
    pub fn piece_at(&self, row: usize, col: usize) -> Result<Option<Piece>, ChessError> {
        self.board.get(row, col)
    }

    /// The moves played so far, earliest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// All legal moves of the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.board.all_legal_moves(self.turn)
    }

    /// Whether the side to move is in check.
    pub fn is_in_check(&self) -> bool {
        movegen::is_in_check(&self.board, self.turn)
    }

    /// The game is over exactly when the side to move has no legal move.
    pub fn is_game_over(&self) -> bool {
        self.legal_moves().is_empty()
    }

    /// The distinct destination squares of legal moves starting at
    /// (row, col).
    ///
    /// `OutOfBounds` on an invalid index; an empty list when the square is
    /// empty, holds an opponent piece, or has no legal moves. A castling and
    /// a regular king move sharing a destination contribute one entry.
    pub fn legal_targets_from(&self, row: usize, col: usize) -> Result<Vec<Position>, ChessError> {
        if !self.board.contains(row, col) {
            return Err(ChessError::OutOfBounds { row, col });
        }
        let src = Position::new(row, col);
        match self.board.at(src) {
            Some(piece) if piece.owner == self.turn => {
                let mut targets = Vec::new();
                for mv in self.legal_moves() {
                    if mv.src() == src && !targets.contains(&mv.dst()) {
                        targets.push(mv.dst());
                    }
                }
                Ok(targets)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Plays the legal move of the side to move from (sr, sc) to (dr, dc).
    ///
    /// `InvalidMove` when the source is off the board, empty, or an opponent
    /// piece, or when no legal move matches the squares.
    pub fn make_move(
        &mut self,
        sr: usize,
        sc: usize,
        dr: usize,
        dc: usize,
    ) -> Result<(), ChessError> {
        let source = match self.board.get(sr, sc) {
            Ok(Some(piece)) => piece,
            Ok(None) => {
                return Err(ChessError::InvalidMove(format!(
                    "no piece on ({sr}, {sc})"
                )));
            }
            Err(_) => {
                return Err(ChessError::InvalidMove(format!(
                    "source ({sr}, {sc}) is off the board"
                )));
            }
        };
        if source.owner != self.turn {
            return Err(ChessError::InvalidMove(format!(
                "the piece on ({sr}, {sc}) belongs to {}, but it is {}'s turn",
                source.owner, self.turn
            )));
        }

        let src = Position::new(sr, sc);
        let dst = Position::new(dr, dc);
        let mut mv = self
            .legal_moves()
            .into_iter()
            .find(|m| m.src() == src && m.dst() == dst)
            .ok_or_else(|| {
                ChessError::InvalidMove(format!(
                    "{} has no legal move from ({sr}, {sc}) to ({dr}, {dc})",
                    self.turn
                ))
            })?;

        mv.apply(&mut self.board);
        log::debug!("{} played {mv}", self.turn);
        self.history.push(mv);
        self.turn = self.turn.opponent();
        Ok(())
    }

    /// Takes back the last move; `InvalidUndo` when no move has been played.
    pub fn undo_last_move(&mut self) -> Result<(), ChessError> {
        let mut mv = self.history.pop().ok_or(ChessError::InvalidUndo)?;
        mv.undo(&mut self.board);
        self.turn = self.turn.opponent();
        log::debug!("{} took back {mv}", self.turn);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    fn put(board: &mut Board, row: usize, col: usize, owner: Player, kind: PieceKind) {
        board.set(row, col, Some(Piece::new(owner, kind))).unwrap();
    }

    fn sorted(mut positions: Vec<Position>) -> Vec<Position> {
        positions.sort();
        positions
    }

    fn pos_set(coords: &[(usize, usize)]) -> Vec<Position> {
        sorted(coords.iter().map(|&(r, c)| Position::new(r, c)).collect())
    }

    #[test]
    fn initial_targets_for_pawns_and_knights() {
        let game = Game::new();

        for col in 0..8 {
            assert_eq!(
                sorted(game.legal_targets_from(1, col).unwrap()),
                pos_set(&[(2, col), (3, col)]),
                "pawn on column {col}"
            );
        }
        assert_eq!(
            sorted(game.legal_targets_from(0, 1).unwrap()),
            pos_set(&[(2, 0), (2, 2)])
        );
        assert_eq!(
            sorted(game.legal_targets_from(0, 6).unwrap()),
            pos_set(&[(2, 5), (2, 7)])
        );

        for row in [0, 2, 3, 4, 5, 6, 7] {
            for col in 0..8 {
                if row == 0 && (col == 1 || col == 6) {
                    continue;
                }
                assert!(
                    game.legal_targets_from(row, col).unwrap().is_empty(),
                    "square ({row}, {col}) should have no targets"
                );
            }
        }
    }

    #[test]
    fn check_forces_blocks_and_captures() {
        let mut board = Board::new(6, 6);
        put(&mut board, 4, 4, Player::Top, PieceKind::King);
        put(&mut board, 4, 1, Player::Top, PieceKind::Pawn);
        put(&mut board, 3, 4, Player::Top, PieceKind::Knight);
        put(&mut board, 2, 1, Player::Top, PieceKind::Bishop);
        put(&mut board, 1, 2, Player::Bottom, PieceKind::King);
        put(&mut board, 2, 3, Player::Bottom, PieceKind::Castle);
        put(&mut board, 3, 2, Player::Bottom, PieceKind::Queen);
        put(&mut board, 3, 0, Player::Bottom, PieceKind::Pawn);
        let game = Game::from_position(board, Player::Bottom);

        assert!(game.is_in_check());
        assert_eq!(
            sorted(game.legal_targets_from(1, 2).unwrap()),
            pos_set(&[(0, 1), (0, 2), (1, 1), (2, 1)])
        );
        assert_eq!(
            sorted(game.legal_targets_from(2, 3).unwrap()),
            pos_set(&[(2, 1)])
        );
        assert_eq!(
            sorted(game.legal_targets_from(3, 2).unwrap()),
            pos_set(&[(2, 1)])
        );
        assert!(game.legal_targets_from(3, 0).unwrap().is_empty());
    }

    #[test]
    fn checkmate_is_game_over_and_lifting_it_is_not() {
        let mut board = Board::new(6, 6);
        put(&mut board, 5, 3, Player::Top, PieceKind::King);
        put(&mut board, 1, 4, Player::Top, PieceKind::Queen);
        put(&mut board, 4, 1, Player::Top, PieceKind::Bishop);
        put(&mut board, 0, 2, Player::Bottom, PieceKind::Queen);
        put(&mut board, 0, 3, Player::Bottom, PieceKind::King);
        put(&mut board, 0, 4, Player::Bottom, PieceKind::Bishop);
        put(&mut board, 0, 5, Player::Bottom, PieceKind::Knight);

        let game = Game::from_position(board.clone(), Player::Bottom);
        assert!(game.is_game_over());

        board.set(0, 2, None).unwrap();
        let freed = Game::from_position(board, Player::Bottom);
        assert!(!freed.is_game_over());
    }

    #[test]
    fn make_move_then_undo_restores_everything() {
        let mut game = Game::new();
        let initial_board = game.board_copy();

        game.make_move(1, 4, 3, 4).unwrap();
        assert_eq!(game.current_player(), Player::Top);
        assert_eq!(game.history().len(), 1);

        game.undo_last_move().unwrap();
        assert_eq!(game.board(), &initial_board);
        assert_eq!(game.current_player(), Player::Bottom);
        assert!(game.history().is_empty());
    }

    #[test]
    fn capture_sequence_unwinds_to_the_start() {
        let mut game = Game::new();
        let initial_board = game.board_copy();

        game.make_move(1, 4, 3, 4).unwrap(); // bottom pawn two up
        game.make_move(6, 3, 4, 3).unwrap(); // top pawn two down
        game.make_move(3, 4, 4, 3).unwrap(); // pawn takes pawn
        game.make_move(7, 3, 4, 3).unwrap(); // queen takes pawn
        assert_eq!(game.history().len(), 4);

        for _ in 0..4 {
            game.undo_last_move().unwrap();
        }
        assert_eq!(game.board(), &initial_board);
        assert_eq!(game.current_player(), Player::Bottom);
        assert!(game.history().is_empty());
    }

    #[test]
    fn make_move_rejects_bad_sources_and_targets() {
        let mut game = Game::new();

        assert!(matches!(
            game.make_move(3, 3, 4, 3),
            Err(ChessError::InvalidMove(_))
        ));
        assert!(matches!(
            game.make_move(6, 0, 5, 0),
            Err(ChessError::InvalidMove(_))
        ));
        assert!(matches!(
            game.make_move(8, 0, 5, 0),
            Err(ChessError::InvalidMove(_))
        ));
        assert!(matches!(
            game.make_move(0, 0, 5, 5),
            Err(ChessError::InvalidMove(_))
        ));
        // Nothing changed.
        assert_eq!(game.current_player(), Player::Bottom);
        assert!(game.history().is_empty());
    }

    #[test]
    fn undo_on_empty_history_is_rejected() {
        let mut game = Game::new();
        assert_eq!(game.undo_last_move(), Err(ChessError::InvalidUndo));
    }

    #[test]
    fn bounds_errors_on_queries() {
        let game = Game::new();
        assert_eq!(
            game.piece_at(9, 0),
            Err(ChessError::OutOfBounds { row: 9, col: 0 })
        );
        assert_eq!(
            game.legal_targets_from(0, 8),
            Err(ChessError::OutOfBounds { row: 0, col: 8 })
        );
    }

    #[test]
    fn restart_returns_to_the_initial_state() {
        let mut game = Game::new();
        game.make_move(1, 0, 2, 0).unwrap();
        game.make_move(6, 0, 5, 0).unwrap();
        game.restart();
        assert_eq!(game.board(), &Board::standard());
        assert_eq!(game.current_player(), Player::Bottom);
        assert!(game.history().is_empty());
    }
}
