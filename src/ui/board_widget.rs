use crate::game::{Board, SIZE};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

/// Width of one tile in terminal columns.
const TILE_WIDTH: usize = 7;
/// Height of one tile in terminal rows.
const TILE_HEIGHT: usize = 3;

pub const BOARD_BG: Color = Color::Rgb(187, 173, 160);
/// Used for every tile above 2048.
pub const SUPER_TILE_BG: Color = Color::Rgb(60, 58, 50);

/// Background colour of a tile. Values past 2048 share `SUPER_TILE_BG`.
pub fn tile_color(value: u32) -> Color {
    match value {
        0 => Color::Rgb(250, 250, 250),
        2 => Color::Rgb(238, 228, 218),
        4 => Color::Rgb(238, 225, 201),
        8 => Color::Rgb(243, 178, 122),
        16 => Color::Rgb(246, 150, 100),
        32 => Color::Rgb(247, 124, 95),
        64 => Color::Rgb(247, 95, 59),
        128 => Color::Rgb(237, 208, 115),
        256 => Color::Rgb(237, 204, 98),
        512 => Color::Rgb(237, 201, 80),
        1024 => Color::Rgb(237, 197, 63),
        2048 => Color::Rgb(237, 194, 46),
        _ => SUPER_TILE_BG,
    }
}

/// Text colour that stays readable on `tile_color(value)`.
pub fn tile_text_color(value: u32) -> Color {
    if value > 2048 {
        Color::Rgb(249, 246, 242)
    } else {
        Color::Black
    }
}

fn tile_label(value: u32, line: usize) -> String {
    if value == 0 || line != TILE_HEIGHT / 2 {
        " ".repeat(TILE_WIDTH)
    } else {
        format!("{:^width$}", value, width = TILE_WIDTH)
    }
}

/// Styled lines for the whole grid, one block of `TILE_HEIGHT` lines per row.
pub fn board_lines(board: &Board) -> Vec<Line<'static>> {
    let gap = Span::styled(" ", Style::default().bg(BOARD_BG));
    let mut lines = Vec::with_capacity(SIZE * (TILE_HEIGHT + 1) + 1);

    let blank_row = Line::from(Span::styled(
        " ".repeat(SIZE * (TILE_WIDTH + 1) + 1),
        Style::default().bg(BOARD_BG),
    ));
    lines.push(blank_row.clone());

    for row in 0..SIZE {
        for tile_line in 0..TILE_HEIGHT {
            let mut spans = vec![gap.clone()];
            for col in 0..SIZE {
                let value = board.get(row, col);
                spans.push(Span::styled(
                    tile_label(value, tile_line),
                    Style::default()
                        .bg(tile_color(value))
                        .fg(tile_text_color(value))
                        .add_modifier(Modifier::BOLD),
                ));
                spans.push(gap.clone());
            }
            lines.push(Line::from(spans));
        }
        lines.push(blank_row.clone());
    }

    lines
}

/// Render the board centred in the given area.
pub fn render_board(frame: &mut Frame, board: &Board, area: Rect) {
    let widget = Paragraph::new(board_lines(board))
        .alignment(Alignment::Center)
        .block(Block::default());
    frame.render_widget(widget, area);
}
