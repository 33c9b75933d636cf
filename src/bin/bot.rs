use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use twenty48_tui::ai::RandomAgent;
use twenty48_tui::config::AppConfig;
use twenty48_tui::game::{BoardEngine, Difficulty, TurnOutcome};
use twenty48_tui::session::BotSession;

/// Let the random bot play a game of 2048 on stdout.
#[derive(Parser)]
#[command(name = "bot", about = "Play 2048 with a random-move bot")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the tile spawn policy
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Fixed RNG seed for the board and the bot
    #[arg(long)]
    seed: Option<u64>,

    /// Override the pause between moves in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Stop after this many moves
    #[arg(long)]
    max_moves: Option<usize>,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,

    /// Do not print the board after every move
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

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
    if let Some(max_moves) = cli.max_moves {
        config.bot.max_moves = Some(max_moves);
    }
    config.validate().context("validating config")?;

    let agent = match config.game.seed {
        Some(seed) => RandomAgent::with_seed(seed),
        None => RandomAgent::new(),
    };
    let engine = BoardEngine::from_config(&config.game);
    info!(
        "starting game: difficulty {} ({}), move delay {} ms",
        config.game.difficulty.level(),
        config.game.difficulty.name(),
        config.bot.move_delay_ms
    );

    let mut session = BotSession::new(engine, Box::new(agent), config.bot.clone());
    if !cli.quiet {
        println!("{}", session.engine().board());
    }

    let summary = session.run(|engine, _stats, outcome| {
        if cli.quiet || outcome == TurnOutcome::Rejected {
            return true;
        }
        println!("{}", engine.board());
        if let Some(last) = engine.last_move_time() {
            println!("Move Time: {:?}", last);
        }
        if let Some(best) = engine.best_move_time() {
            println!("Best Time: {:?}", best);
        }
        true
    });

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("serializing summary")?
        );
    } else {
        println!("{}", summary.report());
    }
    Ok(())
}
