//! Terminal UI: a 2048 board with keyboard play and a bot autoplay mode.

mod app;
pub mod board_widget;
mod game_view;

pub use app::{App, Mode};
