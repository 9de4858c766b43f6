//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Pomodoro - translation cache maintenance
///
/// Inspects, validates and prunes the cache files that memoize
/// message-catalog translation lookups.
#[derive(Parser, Debug)]
#[command(name = "pomodoro")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "POMODORO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache directory (overrides configuration)
    #[arg(long, global = true, env = "POMODORO_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show cache directory, file count and total size
    Stats(StatsArgs),

    /// List cache files
    List(ListArgs),

    /// Validate every cache file
    Lint,

    /// Delete cache files
    Prune(PruneArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the stats command
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the prune command
#[derive(Parser, Debug)]
pub struct PruneArgs {
    /// Only delete cache files of this namespace
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for stats and list
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_prune() {
        let cli = Cli::parse_from(["pomodoro", "prune", "--namespace", "woocommerce", "--yes"]);
        match cli.command {
            Commands::Prune(args) => {
                assert_eq!(args.namespace.as_deref(), Some("woocommerce"));
                assert!(args.yes);
            }
            _ => panic!("expected Prune command"),
        }
    }

    #[test]
    fn cli_parses_prune_all() {
        let cli = Cli::parse_from(["pomodoro", "prune"]);
        match cli.command {
            Commands::Prune(args) => {
                assert!(args.namespace.is_none());
                assert!(!args.yes);
            }
            _ => panic!("expected Prune command"),
        }
    }

    #[test]
    fn cli_parses_list_format() {
        let cli = Cli::parse_from(["pomodoro", "list", "--format", "json"]);
        match cli.command {
            Commands::List(args) => assert!(matches!(args.format, OutputFormat::Json)),
            _ => panic!("expected List command"),
        }
    }

    #[test]
    fn cli_parses_lint() {
        let cli = Cli::parse_from(["pomodoro", "lint"]);
        assert!(matches!(cli.command, Commands::Lint));
    }

    #[test]
    fn cli_global_cache_dir() {
        let cli = Cli::parse_from(["pomodoro", "stats", "--cache-dir", "/var/cache/po"]);
        assert_eq!(cli.cache_dir, Some(PathBuf::from("/var/cache/po")));
    }

    #[test]
    fn cli_verbose_levels() {
        let cli = Cli::parse_from(["pomodoro", "lint"]);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from(["pomodoro", "-vv", "lint"]);
        assert_eq!(cli.verbose, 2);
    }
}
