use std::time::{Duration, Instant};

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::history::{MoveHistory, Snapshot};
use super::{Board, Difficulty, Direction};
use crate::config::GameConfig;

/// Result of one turn of the turn protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The board changed and a tile was spawned at the given cell.
    Moved { spawned: Option<(usize, usize)> },
    /// The direction did not change the board; nothing was spawned.
    Rejected,
    /// No direction can change the board.
    GameOver,
}

/// Owns the board and applies the rules of one game.
pub struct BoardEngine {
    board: Board,
    difficulty: Difficulty,
    history: MoveHistory,
    score: u32,
    moves: usize,
    best_move_time: Option<Duration>,
    last_move_time: Option<Duration>,
    initial_tiles: usize,
    rng: StdRng,
}

impl BoardEngine {
    /// New game with an OS-seeded RNG and one starting tile.
    pub fn new(difficulty: Difficulty) -> Self {
        Self::build(difficulty, StdRng::from_os_rng(), 1, MoveHistory::default())
    }

    /// New game with a deterministic RNG.
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self::build(
            difficulty,
            StdRng::seed_from_u64(seed),
            1,
            MoveHistory::default(),
        )
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::build(
            config.difficulty,
            rng,
            config.initial_tiles,
            MoveHistory::with_capacity(config.history_capacity),
        )
    }

    /// Continue from an existing position; no tiles are spawned.
    pub fn from_board(board: Board, difficulty: Difficulty, seed: u64) -> Self {
        BoardEngine {
            board,
            difficulty,
            history: MoveHistory::default(),
            score: 0,
            moves: 0,
            best_move_time: None,
            last_move_time: None,
            initial_tiles: 1,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn build(
        difficulty: Difficulty,
        rng: StdRng,
        initial_tiles: usize,
        history: MoveHistory,
    ) -> Self {
        let mut engine = BoardEngine {
            board: Board::new(),
            difficulty,
            history,
            score: 0,
            moves: 0,
            best_move_time: None,
            last_move_time: None,
            initial_tiles,
            rng,
        };
        engine.reset();
        engine
    }

    /// Start over: clear everything and spawn the starting tiles.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.score = 0;
        self.moves = 0;
        self.best_move_time = None;
        self.last_move_time = None;
        self.history.clear();
        for _ in 0..self.initial_tiles {
            self.spawn_tile();
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// Number of accepted moves
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Fastest accepted turn so far
    pub fn best_move_time(&self) -> Option<Duration> {
        self.best_move_time
    }

    /// Duration of the most recent accepted turn (apply + spawn)
    pub fn last_move_time(&self) -> Option<Duration> {
        self.last_move_time
    }

    pub fn highest_tile(&self) -> u32 {
        self.board.highest_tile()
    }

    /// Put a new tile in a uniformly chosen empty cell.
    /// A full board is left as is and `None` is returned.
    pub fn spawn_tile(&mut self) -> Option<(usize, usize)> {
        let empty = self.board.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let (row, col) = empty[self.rng.random_range(0..empty.len())];
        let value = self.difficulty.sample_tile(&mut self.rng);
        self.board.set(row, col, value);
        trace!("spawned {} at ({}, {})", value, row, col);
        Some((row, col))
    }

    /// Slide and merge toward `dir`. Returns whether the board changed;
    /// an unchanged board leaves score and history untouched.
    pub fn apply_move(&mut self, dir: Direction) -> bool {
        let (next, points) = self.board.shifted(dir);
        if next == self.board {
            debug!("move {} left the board unchanged", dir.name());
            return false;
        }

        self.history.record(Snapshot {
            board: self.board,
            score: self.score,
            direction: dir,
        });
        self.board = next;
        self.score += points;
        debug!("move {} scored {} (total {})", dir.name(), points, self.score);
        true
    }

    /// True when no direction can change the board. The live board is not touched.
    pub fn is_game_over(&self) -> bool {
        self.board.is_game_over()
    }

    /// Apply a move, spawn on success and report the resulting state.
    pub fn play_turn(&mut self, dir: Direction) -> TurnOutcome {
        if self.is_game_over() {
            return TurnOutcome::GameOver;
        }

        let start = Instant::now();
        if !self.apply_move(dir) {
            return TurnOutcome::Rejected;
        }
        let spawned = self.spawn_tile();
        self.moves += 1;
        self.record_move_time(start.elapsed());

        if self.is_game_over() {
            info!(
                "game over after {} moves: score {}, highest tile {}",
                self.moves,
                self.score,
                self.highest_tile()
            );
            TurnOutcome::GameOver
        } else {
            TurnOutcome::Moved { spawned }
        }
    }

    /// Restore the state before the last recorded move.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(snapshot) => {
                self.board = snapshot.board;
                self.score = snapshot.score;
                self.moves = self.moves.saturating_sub(1);
                debug!("undid move {}", snapshot.direction.name());
                true
            }
            None => false,
        }
    }

    fn record_move_time(&mut self, elapsed: Duration) {
        self.last_move_time = Some(elapsed);
        match self.best_move_time {
            Some(best) if best <= elapsed => {}
            _ => self.best_move_time = Some(elapsed),
        }
    }
}
