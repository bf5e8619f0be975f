//! Append-only ledger of won rounds.

use crate::game::HistoryRecord;

/// Opens each record; the ledger length is the number of lines starting
/// with it.
pub const RECORD_HEADER: &str = "Game Record #";

const RULE: &str = "-------------------------------------------";

pub fn render_record(record: &HistoryRecord) -> String {
    let [one, two] = &record.players;
    let [score_one, score_two] = record.scores();
    format!(
        "\n{RULE}\n{RECORD_HEADER}{}\nWinner: {}\n\
         Scores: {one} : {score_one} | {two} : {score_two}\n{RULE}\n",
        record.number,
        record.winner_name(),
    )
}

pub fn count_records(text: &str) -> u64 {
    text.lines()
        .filter(|line| line.trim_start().starts_with(RECORD_HEADER))
        .count() as u64
}
