use crate::game::{Board, Direction};

/// Anything that can pick the next move for a board.
pub trait Agent {
    /// Choose a direction for the given board. The direction is not
    /// required to change the board; callers re-ask on a rejected move.
    fn select_direction(&mut self, board: &Board) -> Direction;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}
