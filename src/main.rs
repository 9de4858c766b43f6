//! Pomodoro - translation cache maintenance
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use pomodoro::cache::CacheContext;
use pomodoro::cli::{Cli, Commands};
use pomodoro::config::ConfigManager;
use pomodoro::error::PomodoroResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> PomodoroResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let mut config = config_manager.load().await?;
    // --cache-dir (or its env var, merged by clap) is what `config show` reports
    if let Some(dir) = cli.cache_dir.clone() {
        config.cache.dir = Some(dir);
    }

    init_logging(cli.verbose, &config.general.log_format);
    pomodoro::ui::init_theme();
    debug!("Using config {}", config_manager.path().display());

    // Config commands don't touch the cache directory
    if let Commands::Config(args) = cli.command {
        return pomodoro::cli::commands::config(args, &config, &config_manager).await;
    }

    let cache = CacheContext::resolve(&config, cli.cache_dir);

    match cli.command {
        Commands::Config(_) => unreachable!("Config handled above"),
        Commands::Stats(args) => pomodoro::cli::commands::stats(args, &cache).await,
        Commands::List(args) => pomodoro::cli::commands::list(args, &cache).await,
        Commands::Lint => pomodoro::cli::commands::lint(&cache).await,
        Commands::Prune(args) => pomodoro::cli::commands::prune(args, &cache).await,
    }
}

/// 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, format: &str) {
    let filter = match verbose {
        0 => EnvFilter::new("pomodoro=warn"),
        1 => EnvFilter::new("pomodoro=info"),
        _ => EnvFilter::new("pomodoro=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
