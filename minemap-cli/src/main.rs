//! minemap CLI - Command-line interface
//!
//! Drives the layer reconciliation engine against the geoportal REST API
//! with an in-memory map surface.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::common::{CategoryArg, LayerSelection, StatusArg};
use commands::config::ConfigCommands;
use commands::style::StyleArgs;
use commands::sync::SyncArgs;
use commands::watch::WatchArgs;

#[derive(Parser)]
#[command(name = "minemap")]
#[command(version = minemap::VERSION)]
#[command(about = "Keep geoportal map layers in sync with the layer catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List layers once and mount every visible one
    Sync {
        #[command(flatten)]
        selection: LayerSelection,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,
    },

    /// Poll the layer catalog and reconcile until Ctrl+C
    Watch {
        #[command(flatten)]
        selection: LayerSelection,

        /// Poll interval in seconds (default: sync.poll_interval)
        #[arg(long)]
        interval: Option<u64>,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,
    },

    /// Show the resolved style for a category and status
    Style {
        /// Layer category
        #[arg(long, value_enum, default_value = "custom")]
        category: CategoryArg,

        /// Project status
        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        /// Stroke colour override (CSS hex)
        #[arg(long)]
        color: Option<String>,

        /// Fill colour override (CSS hex)
        #[arg(long)]
        fill_color: Option<String>,

        /// Stroke weight override
        #[arg(long)]
        weight: Option<f64>,

        /// Stroke opacity override
        #[arg(long)]
        opacity: Option<f64>,

        /// Fill opacity override
        #[arg(long)]
        fill_opacity: Option<f64>,

        /// Dash pattern override; an empty string forces a solid stroke
        #[arg(long)]
        dash_array: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sync { selection, debug } => {
            commands::sync::run(SyncArgs { selection, debug })
        }
        Commands::Watch {
            selection,
            interval,
            debug,
        } => commands::watch::run(WatchArgs {
            selection,
            interval,
            debug,
        }),
        Commands::Style {
            category,
            status,
            color,
            fill_color,
            weight,
            opacity,
            fill_opacity,
            dash_array,
            json,
        } => commands::style::run(StyleArgs {
            category,
            status,
            color,
            fill_color,
            weight,
            opacity,
            fill_opacity,
            dash_array,
            json,
        }),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sync_with_toggles() {
        let cli = Cli::try_parse_from([
            "minemap", "sync", "--show", "1,2", "--hide", "3", "--category", "deposit",
        ])
        .unwrap();
        match cli.command {
            Commands::Sync { selection, debug } => {
                assert_eq!(selection.show, vec![1, 2]);
                assert_eq!(selection.hide, vec![3]);
                assert_eq!(selection.category, Some(CategoryArg::Deposit));
                assert!(!debug);
            }
            _ => panic!("expected sync"),
        }
    }

    #[test]
    fn test_parse_config_set() {
        let cli =
            Cli::try_parse_from(["minemap", "config", "set", "sync.poll_interval", "60"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Set { .. }
            }
        ));
    }

    #[test]
    fn test_parse_style_accepts_empty_dash() {
        let cli = Cli::try_parse_from([
            "minemap",
            "style",
            "--category",
            "zone",
            "--status",
            "exploratory",
            "--dash-array",
            "",
        ])
        .unwrap();
        match cli.command {
            Commands::Style {
                category,
                status,
                dash_array,
                ..
            } => {
                assert_eq!(category, CategoryArg::Zone);
                assert_eq!(status, Some(StatusArg::Exploratory));
                assert_eq!(dash_array.as_deref(), Some(""));
            }
            _ => panic!("expected style"),
        }
    }
}
