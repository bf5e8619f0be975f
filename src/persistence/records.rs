use tracing::{debug, info};

use super::history;
use super::saves;
use super::scores::{self, WinTotals};
use super::storage::TextStorage;
use crate::config::StorageConfig;
use crate::error::PersistenceError;
use crate::game::{HistoryRecord, Snapshot};

/// Saved matches, win totals and the history ledger over one storage backend.
#[derive(Debug, Clone)]
pub struct Records<S> {
    storage: S,
    saves_file: String,
    scores_file: String,
    history_file: String,
}

impl<S: TextStorage> Records<S> {
    pub fn new(storage: S, config: &StorageConfig) -> Self {
        Records {
            storage,
            saves_file: config.saves_file.clone(),
            scores_file: config.scores_file.clone(),
            history_file: config.history_file.clone(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn read(&self, name: &str) -> Result<String, PersistenceError> {
        Ok(self.storage.read(name)?.unwrap_or_default())
    }

    /// Append a snapshot as a new record and return its 1-based index.
    pub fn save_snapshot(&mut self, snapshot: &Snapshot) -> Result<usize, PersistenceError> {
        let index = self.save_count()? + 1;
        let record = saves::encode_record(snapshot);
        self.storage.append(&self.saves_file, &record)?;
        info!(index, file = %self.saves_file, "match saved");
        Ok(index)
    }

    pub fn load_snapshot(&self, index: usize) -> Result<Snapshot, PersistenceError> {
        let text = self.read(&self.saves_file)?;
        let snapshot = saves::decode_record(&text, index)?;
        info!(index, file = %self.saves_file, "match loaded");
        Ok(snapshot)
    }

    pub fn save_count(&self) -> Result<usize, PersistenceError> {
        Ok(saves::count_records(&self.read(&self.saves_file)?))
    }

    /// Every record, each parsed on its own so one bad record does not hide
    /// the rest.
    pub fn list_snapshots(
        &self,
    ) -> Result<Vec<(usize, Result<Snapshot, PersistenceError>)>, PersistenceError> {
        Ok(saves::decode_all(&self.read(&self.saves_file)?))
    }

    pub fn win_totals(&self) -> Result<WinTotals, PersistenceError> {
        scores::parse_totals(&self.read(&self.scores_file)?)
    }

    /// Persisted total for `name`; players never seen have zero.
    pub fn win_total(&self, name: &str) -> Result<u32, PersistenceError> {
        Ok(self.win_totals()?.get(name).copied().unwrap_or(0))
    }

    /// Read all totals, overwrite `name`, write them all back.
    pub fn set_win_total(&mut self, name: &str, total: u32) -> Result<(), PersistenceError> {
        let mut totals = self.win_totals()?;
        totals.insert(name.to_string(), total);
        self.storage
            .replace(&self.scores_file, &scores::render_totals(&totals))?;
        debug!(name, total, "win total stored");
        Ok(())
    }

    pub fn history_count(&self) -> Result<u64, PersistenceError> {
        Ok(history::count_records(&self.read(&self.history_file)?))
    }

    pub fn append_history(&mut self, record: &HistoryRecord) -> Result<(), PersistenceError> {
        self.storage
            .append(&self.history_file, &history::render_record(record))?;
        debug!(number = record.number, winner = record.winner_name(), "history appended");
        Ok(())
    }
}
