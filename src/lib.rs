//! # deepmate — a chess engine with adversarial search
//!
//! deepmate is a chess engine core built around three pieces of hard
//! engineering:
//!
//! - **Correct chess rules** on boards of any size: sliders, leapers, pawn
//!   pushes and captures, castling (with attack-gated king paths), and
//!   promotion, all filtered for king safety under pinned-piece
//!   interactions.
//! - **Reversible mutation**: every move records at apply time exactly the
//!   state needed to take it back, so a single scratch board can be threaded
//!   through an entire search.
//! - **Correctness-sensitive search**: naive minimax as the reference,
//!   fail-soft alpha-beta with an entry-type aware transposition table, and
//!   an iterative MTD(f) driver — all behind one `best_move` surface with a
//!   pluggable evaluator.
//!
//! The crate exposes a programmatic API (see [`game::Game`] and
//! [`search::Searcher`]) consumed by renderers and controllers; a minimal
//! colored terminal front-end ships in [`terminal`] and the `deepmate`
//! binary.
//!
//! Coordinates are (row, column) with (0, 0) at the bottom-left. The two
//! players are `Bottom` (rows 0-1 in the standard setup, moves first) and
//! `Top`; a Top pawn's "forward" is decreasing row.

pub mod eval;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod search;
pub mod terminal;
pub mod transposition;
pub mod types;

pub use eval::{Evaluate, MAX_SCORE, MIN_SCORE, StandardEval};
pub use game::Game;
pub use moves::{Move, MoveKind};
pub use search::{Searcher, Strategy, best_move};
pub use types::{Board, ChessError, Piece, PieceKind, Player, Position};
