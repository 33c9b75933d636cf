use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;

use crate::game::Difficulty;

/// Per-session move counters and a rolling window of turn latencies.
/// Best and last turn times live on the engine.
pub struct SessionStats {
    move_micros: VecDeque<u32>, // per accepted turn
    capacity: usize,
    moves: usize,
    rejected: usize,
}

impl SessionStats {
    pub fn with_capacity(capacity: usize) -> Self {
        SessionStats {
            move_micros: VecDeque::with_capacity(capacity),
            capacity,
            moves: 0,
            rejected: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn record_move(&mut self, d: Duration) {
        self.moves += 1;
        self.move_micros.push_back(d.as_micros().min(u32::MAX as u128) as u32);
        if self.move_micros.len() > self.capacity {
            self.move_micros.pop_front();
        }
    }

    /// Take back the newest accepted move. Its latency sample stays in the window.
    pub fn record_undo(&mut self) {
        self.moves = self.moves.saturating_sub(1);
    }

    /// A direction the agent chose that did not change the board.
    pub fn record_rejected(&mut self) {
        self.rejected += 1;
    }

    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Mean of the last `last_n` turn times in milliseconds.
    pub fn avg_move_ms(&self, last_n: usize) -> f32 {
        let n = self.move_micros.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let mean = self
            .move_micros
            .iter()
            .rev()
            .take(n)
            .map(|&v| v as f64)
            .sum::<f64>()
            / n as f64;
        (mean / 1000.0) as f32
    }

    pub fn reset(&mut self) {
        *self = Self::with_capacity(self.capacity);
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Final report of a bot session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub difficulty: Difficulty,
    pub score: u32,
    pub highest_tile: u32,
    pub moves: usize,
    pub rejected: usize,
    pub best_move_ms: Option<f64>,
    pub avg_move_ms: f32,
    /// False when the session stopped before the board was dead.
    pub game_over: bool,
}

impl SessionSummary {
    /// Human-readable report printed at exit
    pub fn report(&self) -> String {
        let best = match self.best_move_ms {
            Some(ms) => format!("{:.3} ms", ms),
            None => "n/a".to_string(),
        };
        let headline = if self.game_over {
            "Game Over !!"
        } else {
            "Stopped"
        };
        format!(
            "{}\nFinal Score: {}\nHighest Tile: {}\nMoves: {} ({} rejected)\nBest Time: {}\nAverage Time: {:.3} ms",
            headline,
            self.score,
            self.highest_tile,
            self.moves,
            self.rejected,
            best,
            self.avg_move_ms
        )
    }
}
