use std::collections::VecDeque;

use super::{Board, Direction};

/// State captured just before a successful move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    pub score: u32,
    pub direction: Direction,
}

/// Bounded log of full-move snapshots, newest last.
/// Capacity 0 disables recording.
#[derive(Debug, Clone)]
pub struct MoveHistory {
    entries: VecDeque<Snapshot>,
    capacity: usize,
}

impl MoveHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        MoveHistory {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a snapshot, dropping the oldest when full.
    pub fn record(&mut self, snapshot: Snapshot) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_back(snapshot);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Remove and return the newest snapshot.
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop_back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for MoveHistory {
    fn default() -> Self {
        Self::with_capacity(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(score: u32) -> Snapshot {
        Snapshot {
            board: Board::new(),
            score,
            direction: Direction::Left,
        }
    }

    #[test]
    fn test_record_and_pop() {
        let mut history = MoveHistory::with_capacity(4);
        history.record(snapshot(0));
        history.record(snapshot(4));
        assert_eq!(history.len(), 2);
        assert_eq!(history.pop().map(|s| s.score), Some(4));
        assert_eq!(history.pop().map(|s| s.score), Some(0));
        assert!(history.pop().is_none());
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = MoveHistory::with_capacity(3);
        for score in 0..10 {
            history.record(snapshot(score));
        }
        assert_eq!(history.len(), 3);
        let scores: Vec<u32> = std::iter::from_fn(|| history.pop().map(|s| s.score)).collect();
        assert_eq!(scores, vec![9, 8, 7]);
    }

    #[test]
    fn test_disabled_history_records_nothing() {
        let mut history = MoveHistory::with_capacity(0);
        history.record(snapshot(2));
        assert!(!history.is_enabled());
        assert!(history.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut history = MoveHistory::default();
        history.record(snapshot(2));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 256);
    }
}
