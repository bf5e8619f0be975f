//! Four-in-a-row detection over a whole board.

use super::board::{Board, COLS, ROWS};
use super::Piece;

/// Length of a winning run.
pub const RUN_LEN: usize = 4;

/// Direction vectors as (row delta, col delta): horizontal, vertical,
/// down-right and down-left.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Whether `piece` owns any four-in-a-row anywhere on the board.
pub fn check_win(board: &Board, piece: Piece) -> bool {
    DIRECTIONS.iter().any(|&(dr, dc)| {
        starts(dr, dc).any(|(row, col)| run_matches(board, piece, row, col, dr, dc))
    })
}

/// Every start cell whose run of [`RUN_LEN`] stays on the board.
fn starts(dr: isize, dc: isize) -> impl Iterator<Item = (isize, isize)> {
    let span = RUN_LEN as isize - 1;
    let rows = ROWS as isize;
    let cols = COLS as isize;
    (0..rows).flat_map(move |row| {
        (0..cols)
            .filter(move |&col| {
                let end_row = row + span * dr;
                let end_col = col + span * dc;
                (0..rows).contains(&end_row) && (0..cols).contains(&end_col)
            })
            .map(move |col| (row, col))
    })
}

fn run_matches(board: &Board, piece: Piece, row: isize, col: isize, dr: isize, dc: isize) -> bool {
    let target = piece.to_cell();
    (0..RUN_LEN as isize).all(|i| board.cell_at(row + i * dr, col + i * dc) == target)
}

/// Number of distinct runs checked; used to sanity-check the scan bounds.
#[cfg(test)]
fn run_count() -> usize {
    DIRECTIONS.iter().map(|&(dr, dc)| starts(dr, dc).count()).sum()
}
