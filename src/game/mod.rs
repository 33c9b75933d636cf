//! Core 2048 rules: board representation, line compression, directional
//! moves, tile spawning and game-over detection.

mod board;
mod difficulty;
mod direction;
mod engine;
mod history;

pub use board::{compress_line, merge_line, Board, Line, SIZE};
pub use difficulty::Difficulty;
pub use direction::Direction;
pub use engine::{BoardEngine, TurnOutcome};
pub use history::{MoveHistory, Snapshot};
