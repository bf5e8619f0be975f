use crate::game::Board;

/// Anything that can pick a column for the side to move.
pub trait Agent {
    /// Choose a column with room for a piece, or `None` when the board is
    /// full.
    fn select_column(&mut self, board: &Board) -> Option<usize>;
}
