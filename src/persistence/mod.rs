//! Persistence of matches, win totals and the history ledger as plain text.

pub mod history;
mod records;
pub mod saves;
pub mod scores;
mod storage;

pub use records::Records;
pub use scores::WinTotals;
pub use storage::{FsStorage, MemoryStorage, TextStorage};
