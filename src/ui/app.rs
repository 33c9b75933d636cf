use std::io;
use std::time::{Duration, Instant};

use crate::ai::RandomAgent;
use crate::config::AppConfig;
use crate::game::{BoardEngine, Direction, TurnOutcome};
use crate::session::BotSession;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use log::info;
use ratatui::{backend::Backend, Terminal};

/// Frame interval while waiting for input.
const FRAME: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Manual,
    Auto,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Manual => "Manual",
            Mode::Auto => "Autoplay",
        }
    }
}

pub struct App {
    session: BotSession,
    mode: Mode,
    should_quit: bool,
    message: Option<String>,
    last_bot_turn: Instant,
}

impl App {
    pub fn new(config: &AppConfig, mode: Mode) -> Self {
        let agent = match config.game.seed {
            Some(seed) => RandomAgent::with_seed(seed),
            None => RandomAgent::new(),
        };
        App {
            session: BotSession::new(
                BoardEngine::from_config(&config.game),
                Box::new(agent),
                config.bot.clone(),
            ),
            mode,
            should_quit: false,
            message: None,
            last_bot_turn: Instant::now(),
        }
    }

    pub fn engine(&self) -> &BoardEngine {
        self.session.engine()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        loop {
            terminal.draw(|f| self.render(f)).map_err(Into::into)?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
            self.tick();
        }
        info!(
            "quit with score {} after {} moves",
            self.engine().score(),
            self.engine().moves()
        );
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(self.poll_timeout())? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    /// Wait for input until the next bot turn is due.
    fn poll_timeout(&self) -> Duration {
        match self.mode {
            Mode::Manual => FRAME,
            Mode::Auto => self
                .session
                .move_delay()
                .saturating_sub(self.last_bot_turn.elapsed())
                .min(FRAME),
        }
    }

    /// Play a bot turn when autoplay is on and the delay has passed.
    pub fn tick(&mut self) {
        if self.mode != Mode::Auto || self.last_bot_turn.elapsed() < self.session.move_delay() {
            return;
        }
        self.last_bot_turn = Instant::now();

        if self.session.reached_move_limit() {
            self.mode = Mode::Manual;
            self.message = Some("Move limit reached, autoplay stopped.".to_string());
            return;
        }

        let outcome = self.session.step();
        self.show_outcome(outcome);
        if outcome == TurnOutcome::GameOver {
            self.mode = Mode::Manual;
        }
    }

    /// Handle key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Clear message on any key press
        self.message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => self.play(Direction::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => self.play(Direction::Down),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => self.play(Direction::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => self.play(Direction::Right),
            KeyCode::Char('b') => self.toggle_autoplay(),
            KeyCode::Char('u') => {
                if self.session.undo() {
                    self.message = Some("Move undone.".to_string());
                } else {
                    self.message = Some("Nothing to undo.".to_string());
                }
            }
            KeyCode::Char('r') => {
                // Reset game
                self.session.restart();
                self.mode = Mode::Manual;
                self.message = Some("New game started!".to_string());
            }
            _ => {}
        }
    }

    fn toggle_autoplay(&mut self) {
        self.mode = match self.mode {
            Mode::Manual if self.engine().is_game_over() => {
                self.message = Some("Game over! Press 'r' to restart.".to_string());
                Mode::Manual
            }
            Mode::Manual => {
                self.message = Some(format!("{} bot playing.", self.session.agent_name()));
                Mode::Auto
            }
            Mode::Auto => {
                self.message = Some("Autoplay paused.".to_string());
                Mode::Manual
            }
        };
        self.last_bot_turn = Instant::now();
    }

    /// Play a move chosen by the player
    fn play(&mut self, dir: Direction) {
        if self.mode == Mode::Auto {
            self.message = Some("Autoplay is on, press 'b' to take over.".to_string());
            return;
        }
        let outcome = self.session.play(dir);
        self.show_outcome(outcome);
    }

    fn show_outcome(&mut self, outcome: TurnOutcome) {
        match outcome {
            TurnOutcome::Moved { .. } => {}
            TurnOutcome::Rejected => {
                self.message = Some("That move changes nothing.".to_string());
            }
            TurnOutcome::GameOver => {
                self.message = Some(format!(
                    "Game over! Final score {}. Press 'r' to restart.",
                    self.engine().score()
                ));
            }
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(frame, self.engine(), &self.message, self.mode.name());
    }
}
