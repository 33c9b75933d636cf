use std::time::Duration;

use log::{debug, info, warn};

use super::stats::{SessionStats, SessionSummary};
use crate::ai::Agent;
use crate::config::BotConfig;
use crate::game::{BoardEngine, Direction, TurnOutcome};

/// Directions drawn per turn before a step gives up as `Rejected`.
/// A live board always has a legal direction, so a uniform agent only
/// exhausts this with vanishing probability.
const MAX_DRAWS_PER_TURN: usize = 64;

/// Runs the turn protocol: ask the agent, play the turn, re-ask on a
/// rejected direction, stop at game over.
pub struct BotSession {
    engine: BoardEngine,
    agent: Box<dyn Agent>,
    config: BotConfig,
    stats: SessionStats,
}

impl BotSession {
    pub fn new(engine: BoardEngine, agent: Box<dyn Agent>, config: BotConfig) -> Self {
        BotSession {
            engine,
            agent,
            config,
            stats: SessionStats::new(),
        }
    }

    pub fn engine(&self) -> &BoardEngine {
        &self.engine
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn agent_name(&self) -> &str {
        self.agent.name()
    }

    pub fn move_delay(&self) -> Duration {
        Duration::from_millis(self.config.move_delay_ms)
    }

    /// Start a new game and clear the counters.
    pub fn restart(&mut self) {
        self.engine.reset();
        self.stats.reset();
    }

    /// Take back the last accepted move on the engine and in the counters.
    pub fn undo(&mut self) -> bool {
        if !self.engine.undo() {
            return false;
        }
        self.stats.record_undo();
        true
    }

    /// Whether the configured move cap has been reached.
    pub fn reached_move_limit(&self) -> bool {
        self.config
            .max_moves
            .is_some_and(|max| self.stats.moves() >= max)
    }

    /// Play one bot turn.
    pub fn step(&mut self) -> TurnOutcome {
        if self.engine.is_game_over() {
            return TurnOutcome::GameOver;
        }

        for _ in 0..MAX_DRAWS_PER_TURN {
            let dir = self.agent.select_direction(self.engine.board());
            let outcome = self.engine.play_turn(dir);

            match outcome {
                TurnOutcome::Rejected => {
                    self.stats.record_rejected();
                    debug!("{} picked {}, no change", self.agent.name(), dir.name());
                }
                _ => {
                    self.record_accepted();
                    debug!(
                        "{} moved {} (score {})",
                        self.agent.name(),
                        dir.name(),
                        self.engine.score()
                    );
                    return outcome;
                }
            }
        }

        warn!(
            "{} found no legal direction in {} draws",
            self.agent.name(),
            MAX_DRAWS_PER_TURN
        );
        TurnOutcome::Rejected
    }

    /// Play a move chosen outside the agent, counted like a bot move.
    pub fn play(&mut self, dir: Direction) -> TurnOutcome {
        if self.engine.is_game_over() {
            return TurnOutcome::GameOver;
        }
        let outcome = self.engine.play_turn(dir);
        if outcome != TurnOutcome::Rejected {
            self.record_accepted();
        }
        outcome
    }

    fn record_accepted(&mut self) {
        let elapsed = self.engine.last_move_time().unwrap_or_default();
        self.stats.record_move(elapsed);
    }

    /// Play until game over or the move cap, pausing `move_delay_ms` between
    /// turns. `observer` sees every turn and may stop the session by
    /// returning false.
    pub fn run<F>(&mut self, mut observer: F) -> SessionSummary
    where
        F: FnMut(&BoardEngine, &SessionStats, TurnOutcome) -> bool,
    {
        let delay = self.move_delay();

        while !self.engine.is_game_over() && !self.reached_move_limit() {
            let outcome = self.step();
            if !observer(&self.engine, &self.stats, outcome) {
                info!("session stopped by observer");
                break;
            }
            if outcome == TurnOutcome::GameOver {
                break;
            }
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
        }

        let summary = self.summary();
        info!(
            "session finished: score {}, highest tile {}, {} moves",
            summary.score, summary.highest_tile, summary.moves
        );
        summary
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            difficulty: self.engine.difficulty(),
            score: self.engine.score(),
            highest_tile: self.engine.highest_tile(),
            moves: self.stats.moves(),
            rejected: self.stats.rejected(),
            best_move_ms: self
                .engine
                .best_move_time()
                .map(|d| d.as_secs_f64() * 1000.0),
            avg_move_ms: self.stats.avg_move_ms(usize::MAX),
            game_over: self.engine.is_game_over(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::RandomAgent;
    use crate::game::{Board, Difficulty};

    fn instant_config() -> BotConfig {
        BotConfig {
            move_delay_ms: 0,
            max_moves: None,
        }
    }

    fn session(seed: u64, config: BotConfig) -> BotSession {
        BotSession::new(
            BoardEngine::with_seed(Difficulty::TwoOrFour, seed),
            Box::new(RandomAgent::with_seed(seed)),
            config,
        )
    }

    /// Always answers with the same direction.
    struct FixedAgent(Direction);

    impl Agent for FixedAgent {
        fn select_direction(&mut self, _board: &Board) -> Direction {
            self.0
        }

        fn name(&self) -> &str {
            "Fixed"
        }
    }

    #[test]
    fn test_run_plays_to_game_over() {
        let mut session = session(1, instant_config());
        let mut turns = 0;
        let summary = session.run(|_, _, _| {
            turns += 1;
            true
        });

        assert!(summary.game_over);
        assert!(session.engine().is_game_over());
        assert_eq!(summary.moves, session.engine().moves());
        assert_eq!(summary.score, session.engine().score());
        assert!(summary.best_move_ms.is_some());
        assert!(turns >= summary.moves);
    }

    #[test]
    fn test_summary_best_time_comes_from_engine() {
        let mut session = session(6, instant_config());
        for _ in 0..10 {
            session.step();
        }
        let best = session.engine().best_move_time().unwrap();
        assert_eq!(session.summary().best_move_ms, Some(best.as_secs_f64() * 1000.0));
    }

    #[test]
    fn test_undo_frees_move_limit() {
        let config = BotConfig {
            move_delay_ms: 0,
            max_moves: Some(1),
        };
        let mut session = session(5, config);
        assert!(matches!(session.step(), TurnOutcome::Moved { .. }));
        assert!(session.reached_move_limit());

        assert!(session.undo());
        assert_eq!(session.stats().moves(), 0);
        assert_eq!(session.engine().moves(), 0);
        assert!(!session.reached_move_limit());

        assert!(!session.undo());
        assert_eq!(session.stats().moves(), 0);
    }

    #[test]
    fn test_manual_play_counts_moves() {
        let board = Board::from_rows([
            [2, 0, 0, 0],
            [4, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let mut session = BotSession::new(
            BoardEngine::from_board(board, Difficulty::AlwaysTwo, 0),
            Box::new(FixedAgent(Direction::Up)),
            instant_config(),
        );
        assert_eq!(session.play(Direction::Up), TurnOutcome::Rejected);
        assert_eq!(session.stats().moves(), 0);

        assert!(matches!(session.play(Direction::Right), TurnOutcome::Moved { .. }));
        assert_eq!(session.stats().moves(), 1);
        assert_eq!(session.engine().moves(), 1);

        assert!(session.undo());
        assert_eq!(session.stats().moves(), session.engine().moves());
        assert_eq!(*session.engine().board(), board);
    }

    #[test]
    fn test_run_respects_move_limit() {
        let config = BotConfig {
            move_delay_ms: 0,
            max_moves: Some(5),
        };
        let mut session = session(2, config);
        let summary = session.run(|_, _, _| true);
        assert_eq!(summary.moves, 5);
        assert!(!summary.game_over);
    }

    #[test]
    fn test_observer_can_stop() {
        let mut session = session(3, instant_config());
        let summary = session.run(|_, stats, _| stats.moves() < 3);
        assert_eq!(summary.moves, 3);
    }

    #[test]
    fn test_stuck_agent_is_rejected() {
        // Only Left/Right change this board.
        let board = Board::from_rows([
            [2, 0, 0, 0],
            [4, 0, 0, 0],
            [8, 0, 0, 0],
            [16, 0, 0, 0],
        ]);
        let mut session = BotSession::new(
            BoardEngine::from_board(board, Difficulty::AlwaysTwo, 0),
            Box::new(FixedAgent(Direction::Up)),
            instant_config(),
        );
        assert_eq!(session.step(), TurnOutcome::Rejected);
        assert_eq!(session.stats().rejected(), MAX_DRAWS_PER_TURN);
        assert_eq!(session.stats().moves(), 0);
        assert_eq!(*session.engine().board(), board);
    }

    #[test]
    fn test_step_on_dead_board() {
        let board = Board::from_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        let mut session = BotSession::new(
            BoardEngine::from_board(board, Difficulty::AlwaysTwo, 0),
            Box::new(RandomAgent::with_seed(0)),
            instant_config(),
        );
        assert_eq!(session.step(), TurnOutcome::GameOver);
        assert_eq!(session.stats().moves(), 0);
        assert!(session.summary().game_over);
    }

    #[test]
    fn test_restart_clears_stats() {
        let mut session = session(4, instant_config());
        for _ in 0..5 {
            session.step();
        }
        assert!(session.stats().moves() > 0);
        session.restart();
        assert_eq!(session.stats().moves(), 0);
        assert_eq!(session.engine().score(), 0);
        assert_eq!(session.agent_name(), "Random");
    }
}
