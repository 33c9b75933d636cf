use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use env_logger::Env;
use ratatui::{backend::CrosstermBackend, Terminal};

use twenty48_tui::config::AppConfig;
use twenty48_tui::game::Difficulty;
use twenty48_tui::ui::{App, Mode};

/// Play 2048 in the terminal.
#[derive(Parser)]
#[command(name = "twenty48-tui", about = "Play 2048 in the terminal")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the tile spawn policy
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Fixed RNG seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Start with the random bot playing
    #[arg(long)]
    auto: bool,

    /// Override the pause between bot moves in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,
}

fn main() -> Result<()> {
    // Logging stays off unless asked for; stderr output would tear the TUI.
    env_logger::Builder::from_env(Env::default().default_filter_or("off")).init();

    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(difficulty) = cli.difficulty {
        config.game.difficulty = difficulty;
    }
    if let Some(seed) = cli.seed {
        config.game.seed = Some(seed);
    }
    if let Some(delay) = cli.delay_ms {
        config.bot.move_delay_ms = delay;
    }
    config.validate().context("validating config")?;

    let mode = if cli.auto { Mode::Auto } else { Mode::Manual };
    let mut app = App::new(&config, mode);

    // Setup terminal
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal")?;

    let res = app.run(&mut terminal);

    // Restore terminal — always runs, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res.context("running game")?;

    let engine = app.engine();
    println!("Final Score: {}", engine.score());
    if let Some(best) = engine.best_move_time() {
        println!("Best Time: {:?}", best);
    }
    Ok(())
}
