//! Text records for saved matches.
//!
//! Each record is five lines:
//!
//! ```text
//! ---NEW_SAVE---
//! 2,Ben
//! Ana,Interactive,X,3
//! Ben,Interactive,O,1
//! ..........................................
//! ```
//!
//! The grid line is the board flattened row by row from the top, with `.`
//! for empty cells. Records are only ever appended; they are addressed by
//! their 1-based position in the file.

use crate::error::PersistenceError;
use crate::game::{Cell, OpponentKind, OpponentRecord, Piece, Snapshot, COLS, ROWS};

pub const SAVE_SEPARATOR: &str = "---NEW_SAVE---";

/// Render a snapshot as one complete record, trailing newline included.
pub fn encode_record(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    out.push_str(SAVE_SEPARATOR);
    out.push('\n');
    out.push_str(&format!(
        "{},{}\n",
        snapshot.rounds_completed, snapshot.current_turn
    ));
    for player in &snapshot.players {
        out.push_str(&format!(
            "{},{},{},{}\n",
            player.name,
            player.kind.tag(),
            player.piece.symbol(),
            player.wins
        ));
    }
    out.extend(snapshot.cells.iter().flatten().map(|cell| cell.to_char()));
    out.push('\n');
    out
}

/// Number of records in a save file.
pub fn count_records(text: &str) -> usize {
    text.lines()
        .filter(|line| line.trim() == SAVE_SEPARATOR)
        .count()
}

/// Parse the record following the `index`th separator (1-based).
pub fn decode_record(text: &str, index: usize) -> Result<Snapshot, PersistenceError> {
    let available = count_records(text);
    if index == 0 || index > available {
        return Err(PersistenceError::MissingRecord { index, available });
    }

    let body: Vec<&str> = text
        .lines()
        .map(str::trim)
        .skip_while({
            let mut seen = 0;
            move |line| {
                if *line == SAVE_SEPARATOR {
                    seen += 1;
                }
                seen < index || *line == SAVE_SEPARATOR && seen == index
            }
        })
        .take_while(|line| *line != SAVE_SEPARATOR)
        .filter(|line| !line.is_empty())
        .collect();

    parse_body(&body).map_err(|reason| PersistenceError::CorruptRecord { index, reason })
}

/// Parse every record, keeping failures next to their index.
pub fn decode_all(text: &str) -> Vec<(usize, Result<Snapshot, PersistenceError>)> {
    (1..=count_records(text))
        .map(|index| (index, decode_record(text, index)))
        .collect()
}

fn parse_body(lines: &[&str]) -> Result<Snapshot, String> {
    let [meta, first, second, grid] = lines else {
        return Err(format!("expected 4 lines after the separator, found {}", lines.len()));
    };

    let (rounds, current) = meta
        .split_once(',')
        .ok_or_else(|| format!("bad header line {meta:?}"))?;
    let rounds_completed = rounds
        .parse::<u32>()
        .map_err(|_| format!("bad rounds count {rounds:?}"))?;

    Ok(Snapshot {
        rounds_completed,
        current_turn: current.to_string(),
        players: [parse_player(first)?, parse_player(second)?],
        cells: parse_grid(grid)?,
    })
}

fn parse_player(line: &str) -> Result<OpponentRecord, String> {
    let fields: Vec<&str> = line.split(',').collect();
    let [name, kind, symbol, wins] = fields.as_slice() else {
        return Err(format!("player line {line:?} needs 4 fields"));
    };

    let kind: OpponentKind = kind.parse()?;
    let mut chars = symbol.chars();
    let piece = match (chars.next(), chars.next()) {
        (Some(c), None) => Piece::from_symbol(c),
        _ => None,
    }
    .ok_or_else(|| format!("bad symbol {symbol:?}"))?;
    let wins = wins.parse::<u32>().map_err(|_| format!("bad win count {wins:?}"))?;

    Ok(OpponentRecord {
        name: name.to_string(),
        kind,
        piece,
        wins,
    })
}

fn parse_grid(line: &str) -> Result<[[Cell; COLS]; ROWS], String> {
    let cells: Vec<Cell> = line
        .chars()
        .map(|c| Cell::from_char(c).ok_or_else(|| format!("bad grid character {c:?}")))
        .collect::<Result<_, _>>()?;
    if cells.len() != ROWS * COLS {
        return Err(format!("grid has {} cells, expected {}", cells.len(), ROWS * COLS));
    }

    let mut grid = [[Cell::Empty; COLS]; ROWS];
    for (i, cell) in cells.into_iter().enumerate() {
        grid[i / COLS][i % COLS] = cell;
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Match;

    fn sample() -> Snapshot {
        let mut game = Match::new("Ana", "Computer", true)
            .unwrap()
            .with_records([3, 1], 4);
        for col in [3, 3, 2] {
            game.submit_move(col).unwrap();
        }
        let mut snapshot = game.snapshot();
        snapshot.rounds_completed = 2;
        snapshot
    }

    #[test]
    fn test_encode_layout() {
        let text = encode_record(&sample());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], SAVE_SEPARATOR);
        assert_eq!(lines[1], "2,Computer");
        assert_eq!(lines[2], "Ana,Interactive,X,3");
        assert_eq!(lines[3], "Computer,Automated,O,1");
        assert_eq!(lines[4].len(), ROWS * COLS);
        assert_eq!(&lines[4][21..], "..........O.....XX...");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_decode_picks_requested_record() {
        let first = sample();
        let mut second = sample();
        second.rounds_completed = 9;
        let text = encode_record(&first) + &encode_record(&second);

        assert_eq!(count_records(&text), 2);
        assert_eq!(decode_record(&text, 1).unwrap(), first);
        assert_eq!(decode_record(&text, 2).unwrap(), second);
    }

    #[test]
    fn test_decode_missing_index() {
        let text = encode_record(&sample());
        for index in [0, 2] {
            assert!(matches!(
                decode_record(&text, index),
                Err(PersistenceError::MissingRecord { available: 1, .. })
            ));
        }
        assert!(matches!(
            decode_record("", 1),
            Err(PersistenceError::MissingRecord { available: 0, .. })
        ));
    }

    #[test]
    fn test_decode_legacy_tags_and_crlf() {
        let grid = ".".repeat(ROWS * COLS);
        let text = format!(
            "{SAVE_SEPARATOR}\r\n0,Ana\r\nAna,HumanPlayer,X,0\r\nBot,AIPlayer,O,5\r\n{grid}\r\n"
        );
        let snapshot = decode_record(&text, 1).unwrap();
        assert_eq!(snapshot.players[0].kind, OpponentKind::Interactive);
        assert_eq!(snapshot.players[1].kind, OpponentKind::Automated);
        assert_eq!(snapshot.players[1].wins, 5);
    }

    #[test]
    fn test_corrupt_record_is_isolated() {
        let good = encode_record(&sample());
        let bad = good.replace("Computer,Automated,O,1", "Computer,Automated,O,lots");
        let text = bad + &good;

        let all = decode_all(&text);
        assert_eq!(all.len(), 2);
        assert!(matches!(
            &all[0].1,
            Err(PersistenceError::CorruptRecord { index: 1, reason })
                if reason.contains("win count")
        ));
        assert!(all[1].1.is_ok());
    }

    #[test]
    fn test_truncated_record_is_corrupt() {
        let text = encode_record(&sample());
        let truncated: String = text.lines().take(4).map(|l| format!("{l}\n")).collect();
        assert!(matches!(
            decode_record(&truncated, 1),
            Err(PersistenceError::CorruptRecord { index: 1, .. })
        ));
    }

    #[test]
    fn test_bad_grid_is_corrupt() {
        let text = encode_record(&sample());
        let short = text.replacen("..........O", ".........O", 1);
        let err = decode_record(&short, 1).unwrap_err();
        assert!(err.to_string().contains("41 cells"), "{err}");

        let odd = text.replacen("..........O", "..........Z", 1);
        let err = decode_record(&odd, 1).unwrap_err();
        assert!(err.to_string().contains("'Z'"), "{err}");
    }
}
