use serde::{Deserialize, Serialize};

use super::board::{Cell, COLS, ROWS};
use super::opponent::{OpponentKind, Piece};

/// One participant as it appears in a save record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentRecord {
    pub name: String,
    pub kind: OpponentKind,
    pub piece: Piece,
    pub wins: u32,
}

/// The persistable projection of a [`Match`](super::Match).
///
/// Produced on demand by [`Match::snapshot`](super::Match::snapshot) and
/// consumed by [`Match::from_snapshot`](super::Match::from_snapshot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rounds_completed: u32,
    pub current_turn: String,
    /// Player one first.
    pub players: [OpponentRecord; 2],
    pub cells: [[Cell; COLS]; ROWS],
}
