use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::board::{Board, Cell};
use crate::ai::Agent;

/// One of the two fixed game tokens. `X` always belongs to player one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Piece {
    X,
    O,
}

impl Piece {
    /// Get the other piece
    pub fn other(self) -> Piece {
        match self {
            Piece::X => Piece::O,
            Piece::O => Piece::X,
        }
    }

    pub fn to_cell(self) -> Cell {
        match self {
            Piece::X => Cell::X,
            Piece::O => Cell::O,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Piece::X => 'X',
            Piece::O => 'O',
        }
    }

    pub fn from_symbol(c: char) -> Option<Piece> {
        match c {
            'X' => Some(Piece::X),
            'O' => Some(Piece::O),
            _ => None,
        }
    }
}

/// How an opponent's moves are decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpponentKind {
    /// Moves come from outside, e.g. a human at the keyboard.
    Interactive,
    /// Moves are computed by an [`Agent`].
    Automated,
}

impl OpponentKind {
    /// Tag written into save records.
    pub fn tag(self) -> &'static str {
        match self {
            OpponentKind::Interactive => "Interactive",
            OpponentKind::Automated => "Automated",
        }
    }
}

impl fmt::Display for OpponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for OpponentKind {
    type Err = String;

    /// Accepts the current tags and the class-style tags of older save files.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Interactive" | "HumanPlayer" => Ok(OpponentKind::Interactive),
            "Automated" | "AIPlayer" => Ok(OpponentKind::Automated),
            other => Err(format!("unknown opponent kind '{other}'")),
        }
    }
}

/// A participant in a match. Win counts are tracked by the match, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opponent {
    name: String,
    piece: Piece,
    kind: OpponentKind,
}

impl Opponent {
    pub fn new(name: impl Into<String>, piece: Piece, kind: OpponentKind) -> Self {
        Opponent {
            name: name.into(),
            piece,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn piece(&self) -> Piece {
        self.piece
    }

    pub fn kind(&self) -> OpponentKind {
        self.kind
    }

    pub fn is_automated(&self) -> bool {
        self.kind == OpponentKind::Automated
    }

    /// Resolve this opponent's next column.
    ///
    /// Interactive opponents pass `supplied` straight through; automated ones
    /// ignore it and ask `agent`. `None` means there is no move to make.
    pub fn next_move(
        &self,
        board: &Board,
        supplied: Option<usize>,
        agent: &mut dyn Agent,
    ) -> Option<usize> {
        match self.kind {
            OpponentKind::Interactive => supplied,
            OpponentKind::Automated => agent.select_column(board),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::RandomAgent;

    #[test]
    fn test_other_piece() {
        assert_eq!(Piece::X.other(), Piece::O);
        assert_eq!(Piece::O.other(), Piece::X);
    }

    #[test]
    fn test_symbol_roundtrip() {
        for piece in [Piece::X, Piece::O] {
            assert_eq!(Piece::from_symbol(piece.symbol()), Some(piece));
        }
        assert_eq!(Piece::from_symbol('.'), None);
    }

    #[test]
    fn test_kind_parses_legacy_tags() {
        assert_eq!("HumanPlayer".parse::<OpponentKind>(), Ok(OpponentKind::Interactive));
        assert_eq!("AIPlayer".parse::<OpponentKind>(), Ok(OpponentKind::Automated));
        assert_eq!("Automated".parse::<OpponentKind>(), Ok(OpponentKind::Automated));
        assert!("Robot".parse::<OpponentKind>().is_err());
    }

    #[test]
    fn test_interactive_passes_supplied_move_through() {
        let human = Opponent::new("Ana", Piece::X, OpponentKind::Interactive);
        let mut agent = RandomAgent::with_seed(1);
        let board = Board::new();
        assert_eq!(human.next_move(&board, Some(4), &mut agent), Some(4));
        assert_eq!(human.next_move(&board, None, &mut agent), None);
    }

    #[test]
    fn test_automated_ignores_supplied_move() {
        let mut board = Board::new();
        for col in 0..6 {
            for _ in 0..6 {
                board.drop_piece(col, Piece::X).unwrap();
            }
        }
        let bot = Opponent::new("Computer", Piece::O, OpponentKind::Automated);
        let mut agent = RandomAgent::with_seed(3);
        assert_eq!(bot.next_move(&board, Some(0), &mut agent), Some(6));
    }

    /// Plays a fixed list of columns, then gives up.
    struct Scripted(Vec<usize>);

    impl Agent for Scripted {
        fn select_column(&mut self, _board: &Board) -> Option<usize> {
            self.0.pop()
        }
    }

    #[test]
    fn test_automated_asks_any_agent() {
        let bot = Opponent::new("Computer", Piece::O, OpponentKind::Automated);
        let mut agent = Scripted(vec![5, 2]);
        let board = Board::new();
        assert_eq!(bot.next_move(&board, None, &mut agent), Some(2));
        assert_eq!(bot.next_move(&board, Some(1), &mut agent), Some(5));
        assert_eq!(bot.next_move(&board, None, &mut agent), None);
    }
}
