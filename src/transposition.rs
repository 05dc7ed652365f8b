//! Transposition table: a cache from (position, side to move) to a scored,
//! depth-tagged, bound-typed entry.
//!
//! Keys are structural board values — the table deep-copies the board on
//! insertion, so later mutation by the searcher cannot corrupt a key. An
//! existing entry is only replaced by one of equal or greater depth, since
//! deeper results are worth more. Not thread-safe by contract; each searcher
//! owns its own table.

use std::collections::HashMap;

use crate::types::{Board, Player};

/// How a cached score relates to the true value of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The score is the exact search value.
    Exact,
    /// The search failed high; the true value is at least this score.
    Lower,
    /// The search failed low; the true value is at most this score.
    Upper,
}

/// A cached search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    pub score: i32,
    pub depth: u32,
    pub bound: Bound,
}

/// The cache itself, split per side to move so probes can borrow the
/// caller's board directly.
#[derive(Debug, Default)]
pub struct TranspositionTable {
    top: HashMap<Board, TableEntry>,
    bottom: HashMap<Board, TableEntry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn side_map(&self, side: Player) -> &HashMap<Board, TableEntry> {
        match side {
            Player::Top => &self.top,
            Player::Bottom => &self.bottom,
        }
    }

    fn side_map_mut(&mut self, side: Player) -> &mut HashMap<Board, TableEntry> {
        match side {
            Player::Top => &mut self.top,
            Player::Bottom => &mut self.bottom,
        }
    }

    /// Looks up the entry stored for (board, side), if any.
    pub fn get(&self, board: &Board, side: Player) -> Option<&TableEntry> {
        self.side_map(side).get(board)
    }

    /// Stores an entry, replacing an existing one only when the new depth is
    /// at least as great.
    pub fn put(&mut self, board: &Board, side: Player, score: i32, depth: u32, bound: Bound) {
        let entry = TableEntry {
            score,
            depth,
            bound,
        };
        let map = self.side_map_mut(side);
        if let Some(existing) = map.get_mut(board) {
            if depth >= existing.depth {
                *existing = entry;
            }
        } else {
            map.insert(board.clone(), entry);
        }
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.top.clear();
        self.bottom.clear();
    }

    /// Number of stored entries across both sides.
    pub fn len(&self) -> usize {
        self.top.len() + self.bottom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
