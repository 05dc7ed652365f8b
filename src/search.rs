//! Adversarial search: naive minimax, fail-soft alpha-beta with a
//! transposition cache, and an MTD(f) driver over the alpha-beta core.
//!
//! All three searchers share one surface: [`Searcher::best_move`] takes a
//! game, borrows a board snapshot, and threads that single scratch board
//! through `Move::apply`/`Move::undo` so the stack of moves observed is
//! exactly the stack of undos applied. Scores are always from the root
//! side's perspective; the side to move at a node maximizes when it is the
//! root side and minimizes otherwise.
//!
//! Given the same board and depth, each searcher returns the same move. At
//! the root, ties keep the first move found; only a strictly higher score
//! replaces the current best. This matters for the alpha-beta and MTD(f)
//! variants, whose narrow-window results can be bound approximations rather
//! than exact values.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::eval::{Evaluate, MAX_SCORE, MIN_SCORE, StandardEval};
use crate::game::Game;
use crate::movegen;
use crate::moves::Move;
use crate::transposition::{Bound, TranspositionTable};
use crate::types::{Board, Player};

/// Which search algorithm a [`Searcher`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Full-width minimax, the reference implementation.
    Minimax,
    /// Fail-soft alpha-beta with entry-type aware cache reuse.
    AlphaBeta,
    /// Iterative zero-window MTD(f) over the alpha-beta core.
    Mtdf,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Minimax => write!(f, "minimax"),
            Strategy::AlphaBeta => write!(f, "alphabeta"),
            Strategy::Mtdf => write!(f, "mtdf"),
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimax" => Ok(Strategy::Minimax),
            "alphabeta" | "alpha-beta" => Ok(Strategy::AlphaBeta),
            "mtdf" | "mtd-f" => Ok(Strategy::Mtdf),
            _ => Err(format!(
                "unknown strategy '{s}' (expected 'minimax', 'alphabeta' or 'mtdf')"
            )),
        }
    }
}

/// One-shot convenience over [`Searcher`]: picks `side`'s best move in
/// `game` with a fresh transposition table.
///
/// Controllers that search repeatedly should hold a `Searcher` instead so
/// the table survives between moves.
pub fn best_move(game: &Game, strategy: Strategy, depth: u32, side: Player) -> Move {
    Searcher::new(strategy, depth, side).best_move(game)
}

/// A depth-bounded searcher for one side, owning its transposition table.
///
/// Construct one per (strategy, depth, side); the table is reused across
/// `best_move` calls but never across perspectives. Single-threaded: to run
/// the search off a UI thread, move the whole searcher there.
pub struct Searcher<E: Evaluate = StandardEval> {
    strategy: Strategy,
    max_depth: u32,
    side: Player,
    table: TranspositionTable,
    eval: E,
}

impl Searcher<StandardEval> {
    /// A searcher with the standard evaluator.
    pub fn new(strategy: Strategy, max_depth: u32, side: Player) -> Self {
        Self::with_evaluator(strategy, max_depth, side, StandardEval)
    }
}

impl<E: Evaluate> Searcher<E> {
    /// A searcher with a custom evaluator.
    pub fn with_evaluator(strategy: Strategy, max_depth: u32, side: Player, eval: E) -> Self {
        assert!(max_depth >= 1, "search depth must be at least one ply");
        Self {
            strategy,
            max_depth,
            side,
            table: TranspositionTable::new(),
            eval,
        }
    }

    /// The side this searcher plays.
    pub fn side(&self) -> Player {
        self.side
    }

    /// Picks the best move for the configured side.
    ///
    /// Must not be invoked on a terminal position: the root is asserted to
    /// have at least one legal move.
    pub fn best_move(&mut self, game: &Game) -> Move {
        let mut board = game.board_copy();
        let moves = movegen::legal_moves(&board, self.side);
        assert!(
            !moves.is_empty(),
            "search invoked on a position with no legal moves"
        );

        let opponent = self.side.opponent();
        let mut best: Option<Move> = None;
        let mut best_score = MIN_SCORE;

        for mut mv in moves {
            mv.apply(&mut board);
            let score = match self.strategy {
                Strategy::Minimax => self.minimax(&mut board, opponent, self.max_depth - 1),
                Strategy::AlphaBeta => {
                    self.alpha_beta(&mut board, opponent, self.max_depth - 1, best_score, MAX_SCORE)
                }
                Strategy::Mtdf => self.mtdf(&mut board, opponent, self.max_depth - 1, best_score),
            };
            mv.undo(&mut board);
            log::debug!("{} root move {mv}: {score}", self.strategy);

            if best.is_none() || score > best_score {
                best_score = score;
                best = Some(mv);
            }
        }

        let chosen = best.expect("the asserted root move survives the loop");
        log::debug!(
            "{} picked {chosen} for {} at depth {} (score {best_score}, {} cached positions)",
            self.strategy,
            self.side,
            self.max_depth,
            self.table.len()
        );
        chosen
    }

    /// The terminal score of a node whose side to move has no legal move:
    /// that side has lost.
    fn lost_score(&self, to_move: Player) -> i32 {
        if to_move == self.side { MIN_SCORE } else { MAX_SCORE }
    }

    /// Evaluates a leaf with the combined legal-move list of both sides.
    fn evaluate_leaf(&self, board: &Board, to_move: Player, mut moves: Vec<Move>) -> i32 {
        moves.extend(movegen::legal_moves(board, to_move.opponent()));
        self.eval.evaluate(board, self.side, &moves)
    }

    /// Reference minimax. Every fully searched node is cached exact at its
    /// remaining depth, and only exact entries are ever stored, so probing
    /// is a plain depth check.
    fn minimax(&mut self, board: &mut Board, to_move: Player, remaining: u32) -> i32 {
        if let Some(&entry) = self.table.get(board, to_move)
            && entry.depth >= remaining
            && entry.bound == Bound::Exact
        {
            return entry.score;
        }

        let moves = movegen::legal_moves(board, to_move);
        if moves.is_empty() {
            return self.lost_score(to_move);
        }
        if remaining == 0 {
            let score = self.evaluate_leaf(board, to_move, moves);
            self.table.put(board, to_move, score, 0, Bound::Exact);
            return score;
        }

        let maximizing = to_move == self.side;
        let mut best = if maximizing { MIN_SCORE } else { MAX_SCORE };
        for mut mv in moves {
            mv.apply(board);
            let score = self.minimax(board, to_move.opponent(), remaining - 1);
            mv.undo(board);
            best = if maximizing {
                best.max(score)
            } else {
                best.min(score)
            };
        }

        self.table.put(board, to_move, best, remaining, Bound::Exact);
        best
    }

    /// Fail-soft alpha-beta over the window (lower, upper).
    ///
    /// The returned score may fall outside the window, encoding a bound; the
    /// result is classified against the window as given by the caller and
    /// cached with its bound type.
    fn alpha_beta(
        &mut self,
        board: &mut Board,
        to_move: Player,
        remaining: u32,
        mut lower: i32,
        mut upper: i32,
    ) -> i32 {
        let (orig_lower, orig_upper) = (lower, upper);

        if let Some(&entry) = self.table.get(board, to_move)
            && entry.depth >= remaining
        {
            match entry.bound {
                Bound::Exact => return entry.score,
                Bound::Lower => lower = lower.max(entry.score),
                Bound::Upper => upper = upper.min(entry.score),
            }
            if lower >= upper {
                return entry.score;
            }
        }

        let moves = movegen::legal_moves(board, to_move);
        if moves.is_empty() {
            return self.lost_score(to_move);
        }
        if remaining == 0 {
            let score = self.evaluate_leaf(board, to_move, moves);
            self.table.put(board, to_move, score, 0, Bound::Exact);
            return score;
        }

        let maximizing = to_move == self.side;
        let mut best = if maximizing { MIN_SCORE } else { MAX_SCORE };
        for mut mv in moves {
            mv.apply(board);
            let score = self.alpha_beta(board, to_move.opponent(), remaining - 1, lower, upper);
            mv.undo(board);

            if maximizing {
                best = best.max(score);
                lower = lower.max(best);
            } else {
                best = best.min(score);
                upper = upper.min(best);
            }
            if lower >= upper {
                break;
            }
        }

        let bound = if best >= orig_upper {
            Bound::Lower
        } else if best <= orig_lower {
            Bound::Upper
        } else {
            Bound::Exact
        };
        self.table.put(board, to_move, best, remaining, bound);
        best
    }

    /// MTD(f): binary-searches the true value with zero-width alpha-beta
    /// probes, sharing one transposition table across probes.
    fn mtdf(&mut self, board: &mut Board, to_move: Player, remaining: u32, guess: i32) -> i32 {
        let mut score_lower = guess;
        let mut score_upper = MAX_SCORE;
        let mut score = guess;

        while score_lower < score_upper {
            let window_upper = (score_lower + score_upper).div_euclid(2) + 1;
            score = self.alpha_beta(board, to_move, remaining, window_upper - 1, window_upper);
            if score < window_upper {
                score_upper = score;
            } else {
                score_lower = score;
            }
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Piece, PieceKind, Position};

    const STRATEGIES: [Strategy; 3] = [Strategy::Minimax, Strategy::AlphaBeta, Strategy::Mtdf];

    fn put(board: &mut Board, row: usize, col: usize, owner: Player, kind: PieceKind) {
        board.set(row, col, Some(Piece::new(owner, kind))).unwrap();
    }

    /// Bottom mates in one by lifting the rook to the back rank.
    fn back_rank_mate() -> Game {
        let mut board = Board::new(8, 8);
        put(&mut board, 7, 7, Player::Top, PieceKind::King);
        put(&mut board, 6, 6, Player::Top, PieceKind::Pawn);
        put(&mut board, 6, 7, Player::Top, PieceKind::Pawn);
        put(&mut board, 0, 0, Player::Bottom, PieceKind::Castle);
        put(&mut board, 0, 4, Player::Bottom, PieceKind::King);
        Game::from_position(board, Player::Bottom)
    }

    #[test]
    fn every_strategy_finds_the_mate_in_one() {
        let game = back_rank_mate();
        for strategy in STRATEGIES {
            let mv = best_move(&game, strategy, 2, Player::Bottom);
            assert_eq!(mv.src(), Position::new(0, 0), "{strategy}");
            assert_eq!(mv.dst(), Position::new(7, 0), "{strategy}");
        }
    }

    #[test]
    fn strategies_agree_on_a_forced_position() {
        // Bottom stands in check; the responses are heavily constrained, so
        // every strategy must converge on the same minimax choice.
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

        let reference = Searcher::new(Strategy::Minimax, 3, Player::Bottom).best_move(&game);
        for strategy in [Strategy::AlphaBeta, Strategy::Mtdf] {
            let mv = Searcher::new(strategy, 3, Player::Bottom).best_move(&game);
            assert_eq!(mv, reference, "{strategy} disagrees with minimax");
        }
    }

    #[test]
    fn search_is_deterministic_and_cache_safe() {
        let game = Game::new();
        for strategy in STRATEGIES {
            let mut first = Searcher::new(strategy, 2, Player::Bottom);
            let cold = first.best_move(&game);
            assert!(!first.table.is_empty(), "{strategy} cached nothing");

            // Same searcher again (warm cache) and a fresh one must agree.
            let warm = first.best_move(&game);
            let fresh = Searcher::new(strategy, 2, Player::Bottom).best_move(&game);
            assert_eq!(cold, warm, "{strategy} warm cache changed the move");
            assert_eq!(cold, fresh, "{strategy} is not deterministic");
        }
    }

    #[test]
    fn searcher_avoids_hanging_material() {
        // A bottom queen hangs to the top pawn; at depth 2 the capture
        // dominates every quiet move.
        let mut board = Board::new(6, 6);
        put(&mut board, 0, 0, Player::Bottom, PieceKind::King);
        put(&mut board, 3, 2, Player::Bottom, PieceKind::Queen);
        put(&mut board, 4, 1, Player::Top, PieceKind::Pawn);
        put(&mut board, 5, 5, Player::Top, PieceKind::King);
        let game = Game::from_position(board, Player::Top);

        let mut searcher = Searcher::new(Strategy::AlphaBeta, 2, Player::Top);
        let mv = searcher.best_move(&game);
        // Taking the queen is worth far more than any quiet move.
        assert_eq!(mv.src(), Position::new(4, 1));
        assert_eq!(mv.dst(), Position::new(3, 2));
    }

    #[test]
    #[should_panic(expected = "no legal moves")]
    fn best_move_rejects_terminal_positions() {
        // A lone bottom king fully boxed in: no legal moves.
        let mut board = Board::new(4, 4);
        put(&mut board, 0, 0, Player::Bottom, PieceKind::King);
        put(&mut board, 2, 0, Player::Top, PieceKind::Castle);
        put(&mut board, 2, 1, Player::Top, PieceKind::Castle);
        put(&mut board, 0, 2, Player::Top, PieceKind::Queen);
        put(&mut board, 3, 3, Player::Top, PieceKind::King);
        let game = Game::from_position(board, Player::Bottom);

        let mut searcher = Searcher::new(Strategy::Minimax, 2, Player::Bottom);
        let _ = searcher.best_move(&game);
    }

    #[test]
    fn strategy_parsing_round_trips() {
        for strategy in STRATEGIES {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
        }
        assert!("fishbrain".parse::<Strategy>().is_err());
    }
}
