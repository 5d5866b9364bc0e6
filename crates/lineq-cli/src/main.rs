mod config;
#[cfg(feature = "tui")]
mod tui;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use lineq_hint::HintClient;

#[derive(Parser)]
#[command(
    name = "lineq",
    version,
    about = "Interactive terminal tutor for linear equations (y = ax + b)"
)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive exercises (the default)
    Run,

    /// Show the resolved configuration and hint-feature status
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_tui(config),
        Commands::Config => cmd_config(cli.config.as_deref(), &config),
    }
}

#[cfg(feature = "tui")]
fn run_tui(config: config::Config) -> Result<()> {
    tui::run(config)
}

#[cfg(not(feature = "tui"))]
fn run_tui(_config: config::Config) -> Result<()> {
    anyhow::bail!("tui feature not enabled — rebuild with `--features tui`")
}

fn cmd_config(path_override: Option<&std::path::Path>, config: &config::Config) -> Result<()> {
    println!("config file: {}", config::show_config_path(path_override));
    match HintClient::from_config(&config.hint) {
        Some(_) => println!(
            "hints:       enabled ({} via {})",
            config.hint.model, config.hint.endpoint
        ),
        None => println!(
            "hints:       disabled — set api_key under [hint] or export OPENAI_API_KEY"
        ),
    }
    Ok(())
}
