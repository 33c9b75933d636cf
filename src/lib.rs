//! # twenty48-tui
//!
//! The 2048 sliding-tile puzzle on a fixed 4x4 board, playable in the terminal
//! or by a random-move bot.
//!
//! ## Modules
//!
//! - [`game`] — Core rules: board, line compression, moves, spawning, game over
//! - [`ai`] — Agent trait and the uniform random agent
//! - [`session`] — Turn-protocol driver for bots, timing and summaries
//! - [`ui`] — Terminal UI: board view, keyboard play, autoplay
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod session;
pub mod ui;
