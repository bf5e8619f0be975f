use std::collections::BTreeMap;

use tracing::{debug, info, instrument};

use super::board::{Board, Cell};
use super::opponent::{Opponent, OpponentKind, Piece};
use super::snapshot::{OpponentRecord, Snapshot};
use super::win::check_win;
use crate::error::{MoveError, RestoreError, SetupError};

/// Which of the two owned opponents. Player one always opens a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub fn other(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    InProgress,
    Won(Seat),
    Draw,
}

/// One completed, non-drawn round as written to the history ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    pub number: u64,
    /// Player one first.
    pub players: [String; 2],
    pub winner: Seat,
}

impl HistoryRecord {
    pub fn winner_name(&self) -> &str {
        &self.players[self.winner.index()]
    }

    pub fn loser_name(&self) -> &str {
        &self.players[self.winner.other().index()]
    }

    /// Score pair in player order: 1 for the winner, 0 for the loser.
    pub fn scores(&self) -> [u8; 2] {
        match self.winner {
            Seat::One => [1, 0],
            Seat::Two => [0, 1],
        }
    }
}

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The piece landed and the turn passed to the other player.
    Accepted { row: usize, col: usize },
    /// The mover completed four in a row.
    Won { winner: Seat, record: HistoryRecord },
    /// The board filled up without a winner.
    Draw,
}

/// A series of rounds between two opponents.
///
/// Owns the board, both opponents, whose turn it is and the running win
/// tally. Every state change goes through [`Match::submit_move`] or
/// [`Match::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    board: Board,
    players: [Opponent; 2],
    current: Seat,
    status: MatchStatus,
    wins: BTreeMap<String, u32>,
    rounds_completed: u32,
    history_count: u64,
}

impl Match {
    /// Player one plays `X` and is always interactive; player two plays `O`.
    pub fn new(
        player_one: &str,
        player_two: &str,
        player_two_automated: bool,
    ) -> Result<Self, SetupError> {
        validate_name(player_one)?;
        validate_name(player_two)?;
        if player_one == player_two {
            return Err(SetupError::DuplicateName(player_one.to_string()));
        }

        let second_kind = if player_two_automated {
            OpponentKind::Automated
        } else {
            OpponentKind::Interactive
        };
        let players = [
            Opponent::new(player_one, Piece::X, OpponentKind::Interactive),
            Opponent::new(player_two, Piece::O, second_kind),
        ];
        let wins = players.iter().map(|p| (p.name().to_string(), 0)).collect();

        Ok(Match {
            board: Board::new(),
            players,
            current: Seat::One,
            status: MatchStatus::InProgress,
            wins,
            rounds_completed: 0,
            history_count: 0,
        })
    }

    /// Seed the win tally and the history ledger length from persisted totals.
    pub fn with_records(mut self, wins: [u32; 2], history_count: u64) -> Self {
        for (player, count) in self.players.iter().zip(wins) {
            self.wins.insert(player.name().to_string(), count);
        }
        self.history_count = history_count;
        self
    }

    /// Drop the current player's piece into `column`.
    ///
    /// Rejected moves leave the match untouched. A win or a full board ends
    /// the round and freezes the turn until [`Match::reset`].
    #[instrument(skip(self), fields(player = %self.current_turn().name()))]
    pub fn submit_move(&mut self, column: usize) -> Result<MoveOutcome, MoveError> {
        if self.status != MatchStatus::InProgress {
            return Err(MoveError::RoundOver);
        }

        let mover = self.current;
        let piece = self.players[mover.index()].piece();
        let row = self.board.drop_piece(column, piece)?;
        debug!(row, column, ?piece, "piece placed");

        if check_win(&self.board, piece) {
            let name = self.players[mover.index()].name().to_string();
            let total = self.wins.entry(name.clone()).or_insert(0);
            *total += 1;
            self.history_count += 1;
            self.rounds_completed += 1;
            self.status = MatchStatus::Won(mover);
            info!(winner = %name, total = *total, round = self.rounds_completed, "round won");

            let record = HistoryRecord {
                number: self.history_count,
                players: self.player_names(),
                winner: mover,
            };
            return Ok(MoveOutcome::Won {
                winner: mover,
                record,
            });
        }

        if self.board.is_full() {
            self.rounds_completed += 1;
            self.status = MatchStatus::Draw;
            info!(round = self.rounds_completed, "round drawn");
            return Ok(MoveOutcome::Draw);
        }

        self.current = mover.other();
        Ok(MoveOutcome::Accepted { row, col: column })
    }

    /// Start a fresh round. Win counts and history are kept.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.status = MatchStatus::InProgress;
        self.current = Seat::One;
        debug!(rounds_completed = self.rounds_completed, "new round");
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.board.get(row, col)
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status != MatchStatus::InProgress
    }

    pub fn current_seat(&self) -> Seat {
        self.current
    }

    pub fn current_turn(&self) -> &Opponent {
        &self.players[self.current.index()]
    }

    pub fn opponent(&self, seat: Seat) -> &Opponent {
        &self.players[seat.index()]
    }

    pub fn players(&self) -> &[Opponent; 2] {
        &self.players
    }

    /// Cumulative wins for `name`; unknown names have none.
    pub fn wins(&self, name: &str) -> u32 {
        self.wins.get(name).copied().unwrap_or(0)
    }

    pub fn wins_of(&self, seat: Seat) -> u32 {
        self.wins(self.opponent(seat).name())
    }

    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    /// Length of the history ledger including records from this match.
    pub fn history_count(&self) -> u64 {
        self.history_count
    }

    /// Adopt the ledger length reported by storage, which other sessions may
    /// have appended to since this match started.
    pub fn sync_history_count(&mut self, count: u64) {
        self.history_count = count;
    }

    fn player_names(&self) -> [String; 2] {
        [
            self.players[0].name().to_string(),
            self.players[1].name().to_string(),
        ]
    }

    pub fn snapshot(&self) -> Snapshot {
        let record = |seat: Seat| {
            let player = self.opponent(seat);
            OpponentRecord {
                name: player.name().to_string(),
                kind: player.kind(),
                piece: player.piece(),
                wins: self.wins_of(seat),
            }
        };

        Snapshot {
            rounds_completed: self.rounds_completed,
            current_turn: self.current_turn().name().to_string(),
            players: [record(Seat::One), record(Seat::Two)],
            cells: *self.board.cells(),
        }
    }

    /// Rebuild a match from a snapshot.
    ///
    /// The round status is derived from the grid, and the grid must be one
    /// that alternating play could have produced.
    pub fn from_snapshot(snapshot: &Snapshot, history_count: u64) -> Result<Self, RestoreError> {
        let [one, two] = &snapshot.players;
        validate_name(&one.name)?;
        validate_name(&two.name)?;
        if one.name == two.name {
            return Err(SetupError::DuplicateName(one.name.clone()).into());
        }
        if one.piece != Piece::X || two.piece != Piece::O {
            return Err(RestoreError::PieceMismatch);
        }

        let board = Board::from_cells(snapshot.cells).map_err(RestoreError::FloatingPiece)?;
        let count = |cell: Cell| board.cells().iter().flatten().filter(|&&c| c == cell).count();
        let (x, o) = (count(Cell::X), count(Cell::O));
        if x != o && x != o + 1 {
            return Err(RestoreError::ImbalancedPieces { x, o });
        }

        let status = match (check_win(&board, Piece::X), check_win(&board, Piece::O)) {
            (true, true) => return Err(RestoreError::TwoWinners),
            (true, false) => MatchStatus::Won(Seat::One),
            (false, true) => MatchStatus::Won(Seat::Two),
            (false, false) if board.is_full() => MatchStatus::Draw,
            (false, false) => MatchStatus::InProgress,
        };

        let current = if snapshot.current_turn == one.name {
            Seat::One
        } else if snapshot.current_turn == two.name {
            Seat::Two
        } else {
            return Err(RestoreError::UnknownCurrentTurn(snapshot.current_turn.clone()));
        };

        // Terminal rounds keep the last mover; open rounds alternate from X.
        let expected = match status {
            MatchStatus::Won(winner) => winner,
            MatchStatus::Draw => Seat::Two,
            MatchStatus::InProgress if x == o => Seat::One,
            MatchStatus::InProgress => Seat::Two,
        };
        if current != expected {
            return Err(RestoreError::TurnMismatch {
                expected: snapshot.players[expected.index()].name.clone(),
                found: snapshot.current_turn.clone(),
            });
        }

        let players = [
            Opponent::new(one.name.clone(), one.piece, one.kind),
            Opponent::new(two.name.clone(), two.piece, two.kind),
        ];
        let wins = snapshot
            .players
            .iter()
            .map(|p| (p.name.clone(), p.wins))
            .collect();

        Ok(Match {
            board,
            players,
            current,
            status,
            wins,
            rounds_completed: snapshot.rounds_completed,
            history_count,
        })
    }
}

/// Names end up in comma- and colon-delimited records, one per line.
pub fn validate_name(name: &str) -> Result<(), SetupError> {
    if name.trim().is_empty() {
        return Err(SetupError::EmptyName);
    }
    if name.contains([',', ':', '\n', '\r']) || name.trim() != name {
        return Err(SetupError::ReservedCharacter(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{COLS, ROWS};

    fn human_match() -> Match {
        Match::new("Ana", "Ben", false).unwrap()
    }

    /// Column order that fills the whole board with no four in a row:
    ///
    /// ```text
    /// OOOXOOO
    /// XXXOXXX
    /// OOOXOOO
    /// XXXOXXX
    /// OOOXOOO
    /// XXXOXXX
    /// ```
    fn drawing_sequence() -> Vec<usize> {
        let mut moves = vec![0; ROWS];
        moves.extend([1; ROWS]);
        moves.extend([2; ROWS]);
        moves.push(4);
        moves.extend([3; ROWS]);
        moves.extend([4; ROWS - 1]);
        moves.extend([5; ROWS]);
        moves.extend([6; ROWS]);
        moves
    }

    #[test]
    fn test_initial_state() {
        let game = human_match();
        assert_eq!(game.current_seat(), Seat::One);
        assert_eq!(game.current_turn().name(), "Ana");
        assert_eq!(game.current_turn().piece(), Piece::X);
        assert_eq!(game.status(), MatchStatus::InProgress);
        assert_eq!(game.rounds_completed(), 0);
        assert_eq!(game.wins("Ana"), 0);
        assert_eq!(game.wins("nobody"), 0);
    }

    #[test]
    fn test_player_two_kind() {
        let game = Match::new("Ana", "Computer", true).unwrap();
        assert_eq!(game.opponent(Seat::One).kind(), OpponentKind::Interactive);
        assert_eq!(game.opponent(Seat::Two).kind(), OpponentKind::Automated);
        assert_eq!(game.opponent(Seat::Two).piece(), Piece::O);
    }

    #[test]
    fn test_rejects_bad_names() {
        assert_eq!(Match::new("", "Ben", false), Err(SetupError::EmptyName));
        assert!(matches!(
            Match::new("A,na", "Ben", false),
            Err(SetupError::ReservedCharacter(_))
        ));
        assert!(matches!(
            Match::new("Ana", "Be:n", false),
            Err(SetupError::ReservedCharacter(_))
        ));
        assert_eq!(
            Match::new("Ana", "Ana", true),
            Err(SetupError::DuplicateName("Ana".into()))
        );
    }

    #[test]
    fn test_accepted_move_flips_turn() {
        let mut game = human_match();
        let outcome = game.submit_move(3).unwrap();
        assert_eq!(outcome, MoveOutcome::Accepted { row: 5, col: 3 });
        assert_eq!(game.current_seat(), Seat::Two);
        assert_eq!(game.cell(5, 3), Cell::X);
    }

    #[test]
    fn test_invalid_move_changes_nothing() {
        let mut game = human_match();
        for _ in 0..ROWS {
            game.submit_move(2).unwrap();
        }
        let before = game.clone();

        assert_eq!(game.submit_move(2), Err(MoveError::ColumnFull(2)));
        assert_eq!(game.submit_move(COLS), Err(MoveError::InvalidColumn(COLS)));
        assert_eq!(game, before);
    }

    #[test]
    fn test_horizontal_win_freezes_turn() {
        let mut game = human_match();
        for col in 0..3 {
            game.submit_move(col).unwrap(); // X bottom row
            game.submit_move(col).unwrap(); // O on top
        }
        let outcome = game.submit_move(3).unwrap();

        let MoveOutcome::Won { winner, record } = outcome else {
            panic!("expected a win, got {outcome:?}");
        };
        assert_eq!(winner, Seat::One);
        assert_eq!(record.number, 1);
        assert_eq!(record.winner_name(), "Ana");
        assert_eq!(record.loser_name(), "Ben");
        assert_eq!(record.scores(), [1, 0]);

        assert_eq!(game.status(), MatchStatus::Won(Seat::One));
        assert_eq!(game.current_seat(), Seat::One);
        assert_eq!(game.wins("Ana"), 1);
        assert_eq!(game.wins("Ben"), 0);
        assert_eq!(game.rounds_completed(), 1);
        assert_eq!(game.submit_move(6), Err(MoveError::RoundOver));
    }

    #[test]
    fn test_record_numbers_continue_from_ledger() {
        let mut game = human_match().with_records([4, 2], 6);
        assert_eq!(game.wins("Ana"), 4);
        assert_eq!(game.wins_of(Seat::Two), 2);

        // O wins vertically in column 1.
        for _ in 0..3 {
            game.submit_move(0).unwrap();
            game.submit_move(1).unwrap();
        }
        game.submit_move(2).unwrap();
        let outcome = game.submit_move(1).unwrap();

        let MoveOutcome::Won { winner, record } = outcome else {
            panic!("expected a win, got {outcome:?}");
        };
        assert_eq!(winner, Seat::Two);
        assert_eq!(record.number, 7);
        assert_eq!(record.scores(), [0, 1]);
        assert_eq!(game.wins("Ben"), 3);
        assert_eq!(game.history_count(), 7);
    }

    #[test]
    fn test_full_board_is_a_draw() {
        let mut game = human_match();
        let moves = drawing_sequence();
        assert_eq!(moves.len(), ROWS * COLS);

        let (last, rest) = moves.split_last().unwrap();
        for &col in rest {
            assert!(matches!(
                game.submit_move(col).unwrap(),
                MoveOutcome::Accepted { .. }
            ));
        }
        assert_eq!(game.submit_move(*last).unwrap(), MoveOutcome::Draw);

        assert!(game.board().is_full());
        assert!(!check_win(game.board(), Piece::X));
        assert!(!check_win(game.board(), Piece::O));
        assert_eq!(game.status(), MatchStatus::Draw);
        assert_eq!(game.rounds_completed(), 1);
        assert_eq!(game.current_seat(), Seat::Two);
        assert_eq!(game.wins("Ana") + game.wins("Ben"), 0);
    }

    #[test]
    fn test_reset_keeps_tally() {
        let mut game = human_match();
        for col in 0..3 {
            game.submit_move(col).unwrap();
            game.submit_move(col).unwrap();
        }
        game.submit_move(3).unwrap();
        game.reset();

        assert_eq!(game.status(), MatchStatus::InProgress);
        assert_eq!(game.current_seat(), Seat::One);
        assert_eq!(game.board(), &Board::new());
        assert_eq!(game.wins("Ana"), 1);
        assert_eq!(game.rounds_completed(), 1);
        assert_eq!(game.history_count(), 1);
    }

    #[test]
    fn test_snapshot_roundtrip_in_progress() {
        let mut game = human_match().with_records([1, 5], 6);
        for col in [3, 3, 4, 2, 6] {
            game.submit_move(col).unwrap();
        }
        let restored = Match::from_snapshot(&game.snapshot(), 6).unwrap();
        assert_eq!(restored, game);
    }

    #[test]
    fn test_snapshot_roundtrip_won_and_draw() {
        let mut won = human_match();
        for col in [0, 6, 1, 6, 2, 6, 3] {
            won.submit_move(col).unwrap();
        }
        assert_eq!(won.status(), MatchStatus::Won(Seat::One));
        let restored = Match::from_snapshot(&won.snapshot(), won.history_count()).unwrap();
        assert_eq!(restored, won);

        let mut drawn = human_match();
        for col in drawing_sequence() {
            drawn.submit_move(col).unwrap();
        }
        let restored = Match::from_snapshot(&drawn.snapshot(), 0).unwrap();
        assert_eq!(restored, drawn);
        assert_eq!(restored.status(), MatchStatus::Draw);
    }

    #[test]
    fn test_restore_rejects_unknown_turn() {
        let mut snapshot = human_match().snapshot();
        snapshot.current_turn = "Zed".into();
        assert_eq!(
            Match::from_snapshot(&snapshot, 0),
            Err(RestoreError::UnknownCurrentTurn("Zed".into()))
        );
    }

    #[test]
    fn test_restore_rejects_wrong_turn() {
        let mut game = human_match();
        game.submit_move(0).unwrap();
        let mut snapshot = game.snapshot();
        snapshot.current_turn = "Ana".into();
        assert!(matches!(
            Match::from_snapshot(&snapshot, 0),
            Err(RestoreError::TurnMismatch { .. })
        ));
    }

    #[test]
    fn test_restore_rejects_floating_piece() {
        let mut snapshot = human_match().snapshot();
        snapshot.cells[0][4] = Cell::X;
        assert_eq!(
            Match::from_snapshot(&snapshot, 0),
            Err(RestoreError::FloatingPiece(4))
        );
    }

    #[test]
    fn test_restore_rejects_imbalanced_pieces() {
        let mut snapshot = human_match().snapshot();
        snapshot.cells[5][0] = Cell::O;
        assert_eq!(
            Match::from_snapshot(&snapshot, 0),
            Err(RestoreError::ImbalancedPieces { x: 0, o: 1 })
        );
    }

    #[test]
    fn test_restore_rejects_swapped_pieces() {
        let mut snapshot = human_match().snapshot();
        snapshot.players[0].piece = Piece::O;
        snapshot.players[1].piece = Piece::X;
        assert_eq!(
            Match::from_snapshot(&snapshot, 0),
            Err(RestoreError::PieceMismatch)
        );
    }
}
