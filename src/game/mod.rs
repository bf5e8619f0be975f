//! Core Connect Four game logic: the board and its gravity rule, win
//! detection, opponents, and the match state machine with its snapshot.

mod board;
mod opponent;
mod snapshot;
mod state;
mod win;

pub use board::{Board, Cell, COLS, ROWS};
pub use opponent::{Opponent, OpponentKind, Piece};
pub use snapshot::{OpponentRecord, Snapshot};
pub use state::{validate_name, HistoryRecord, Match, MatchStatus, MoveOutcome, Seat};
pub use win::{check_win, RUN_LEN};
