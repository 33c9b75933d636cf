use std::time::Duration;

use crate::game::BoardEngine;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::board_widget;

pub fn render(frame: &mut Frame, engine: &BoardEngine, message: &Option<String>, mode: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Header
            Constraint::Min(17),    // Board
            Constraint::Length(3),  // Message
            Constraint::Length(3),  // Controls
        ])
        .split(frame.area());

    render_header(frame, engine, mode, chunks[0]);
    board_widget::render_board(frame, engine.board(), chunks[1]);
    render_message(frame, message, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn format_time(time: Option<Duration>) -> String {
    match time {
        Some(d) => format!("{:.3} ms", d.as_secs_f64() * 1000.0),
        None => "-".to_string(),
    }
}

/// Undo depth as "stored/capacity", or "off" when history is disabled.
fn undo_depth(engine: &BoardEngine) -> String {
    let history = engine.history();
    if history.is_enabled() {
        format!("{}/{}", history.len(), history.capacity())
    } else {
        "off".to_string()
    }
}

fn render_header(frame: &mut Frame, engine: &BoardEngine, mode: &str, area: ratatui::layout::Rect) {
    let (status, color) = if engine.is_game_over() {
        ("Game Over", Color::Red)
    } else {
        ("Playing", Color::Green)
    };

    let line1 = Line::from(vec![
        Span::styled(
            format!("Score: {}", engine.score()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  |  Moves: {}  |  Highest: {}  |  Undo: {}",
            engine.moves(),
            engine.highest_tile(),
            undo_depth(engine)
        )),
    ]);
    let line2 = Line::from(vec![
        Span::styled(status, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            "  |  {}  |  Difficulty {} ({})  |  Best time: {}",
            mode,
            engine.difficulty().level(),
            engine.difficulty().name(),
            format_time(engine.best_move_time())
        )),
    ]);

    let header = Paragraph::new(vec![line1, line2])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("2048"));

    frame.render_widget(header, area);
}

fn render_message(frame: &mut Frame, message: &Option<String>, area: ratatui::layout::Rect) {
    let text = message.as_deref().unwrap_or("");
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: ratatui::layout::Rect) {
    let line = Line::from("←↑↓→ / WASD: Move  |  B: Bot autoplay  |  U: Undo  |  R: Restart  |  Q: Quit");

    let controls = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}
