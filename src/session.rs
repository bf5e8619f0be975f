//! A match bound to the storage that keeps its totals, history and saves.

use tracing::{info, warn};

use crate::error::{MoveError, PersistenceError, SessionError};
use crate::game::{HistoryRecord, Match, MoveOutcome, Seat};
use crate::persistence::{Records, TextStorage};

/// Owns one [`Match`] and the [`Records`] it reads from and writes to.
///
/// Front-ends drive the game through this type so that every won round is
/// committed to the totals file and the history ledger.
pub struct Session<S> {
    game: Match,
    records: Records<S>,
    commit_error: Option<PersistenceError>,
}

impl<S: TextStorage> Session<S> {
    /// Start a new match, seeding win counts and the ledger length from
    /// storage.
    pub fn new(
        records: Records<S>,
        player_one: &str,
        player_two: &str,
        player_two_automated: bool,
    ) -> Result<Self, SessionError> {
        let game = Match::new(player_one, player_two, player_two_automated)?;
        let wins = [
            records.win_total(player_one)?,
            records.win_total(player_two)?,
        ];
        let history_count = records.history_count()?;
        info!(player_one, player_two, player_two_automated, "new match");

        Ok(Session {
            game: game.with_records(wins, history_count),
            records,
            commit_error: None,
        })
    }

    /// Resume the match stored as save `index` (1-based).
    pub fn resume(records: Records<S>, index: usize) -> Result<Self, PersistenceError> {
        let game = load_match(&records, index)?;
        Ok(Session {
            game,
            records,
            commit_error: None,
        })
    }

    pub fn game(&self) -> &Match {
        &self.game
    }

    pub fn records(&self) -> &Records<S> {
        &self.records
    }

    /// Play a move for whoever is to move. A won round is written to the
    /// totals file and the history ledger; if that write fails the game
    /// still advances and the error is kept for [`Session::take_commit_error`].
    pub fn submit_move(&mut self, column: usize) -> Result<MoveOutcome, MoveError> {
        let mut outcome = self.game.submit_move(column)?;
        if let MoveOutcome::Won { winner, record } = &mut outcome {
            if let Err(e) = self.commit_win(*winner, record) {
                warn!(error = %e, record = record.number, "failed to record win");
                self.commit_error = Some(e);
            }
        }
        Ok(outcome)
    }

    /// The record is numbered from the ledger as it is on disk now, not as it
    /// was when the match started.
    fn commit_win(
        &mut self,
        winner: Seat,
        record: &mut HistoryRecord,
    ) -> Result<(), PersistenceError> {
        let persisted = self.records.history_count()?;
        self.game.sync_history_count(persisted);
        record.number = persisted + 1;
        self.records.append_history(record)?;
        self.game.sync_history_count(record.number);

        let name = self.game.opponent(winner).name().to_string();
        let total = self.game.wins_of(winner);
        self.records.set_win_total(&name, total)
    }

    /// The last failed win commit, if any.
    pub fn take_commit_error(&mut self) -> Option<PersistenceError> {
        self.commit_error.take()
    }

    pub fn reset(&mut self) {
        self.game.reset();
    }

    /// Append the current state as a new save and return its index.
    pub fn save(&mut self) -> Result<usize, PersistenceError> {
        self.records.save_snapshot(&self.game.snapshot())
    }

    /// Replace the current match with save `index`. On failure the current
    /// match is left as it was.
    pub fn load(&mut self, index: usize) -> Result<(), PersistenceError> {
        self.game = load_match(&self.records, index)?;
        Ok(())
    }
}

fn load_match<S: TextStorage>(
    records: &Records<S>,
    index: usize,
) -> Result<Match, PersistenceError> {
    let snapshot = records.load_snapshot(index)?;
    let history_count = records.history_count()?;
    Match::from_snapshot(&snapshot, history_count).map_err(|e| PersistenceError::CorruptRecord {
        index,
        reason: e.to_string(),
    })
}
