//! Marksync CLI
//!
//! Command-line interface for Marksync - WebDAV bookmark, tab, and
//! history synchronization.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use marksync_core::export::SnapshotKind;
use marksync_core::Config;

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "marksync")]
#[command(about = "Marksync - sync bookmarks, tabs, and history over WebDAV")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one bidirectional bookmark sync
    Sync,
    /// Upload the configured folder as the remote snapshot (one-way)
    Export,
    /// Replace the configured folder with the remote snapshot (one-way)
    Import {
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Inspect per-device tab and history snapshots
    Devices {
        /// Snapshot family to operate on
        #[arg(short, long, value_enum, default_value = "tabs")]
        kind: Kind,
        #[command(subcommand)]
        command: Option<DeviceCommands>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show configuration readiness and local profile summary
    Status,
    /// Run scheduled syncs in the foreground until interrupted
    Watch,
}

#[derive(Subcommand, Clone)]
enum DeviceCommands {
    /// List devices with an uploaded snapshot
    #[command(alias = "ls")]
    List,
    /// Show one device's snapshot contents
    Show {
        /// Device name as shown by `devices list`
        device: String,
    },
    /// Delete one device's snapshot from the server
    #[command(alias = "rm")]
    Delete {
        /// Device name as shown by `devices list`
        device: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value (e.g. webdav.url, bookmarks.sync_path)
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Tabs,
    History,
}

impl From<Kind> for SnapshotKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Tabs => SnapshotKind::Tabs,
            Kind::History => SnapshotKind::History,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    init_logging(&output);

    // Config commands work without a loadable sync setup
    if let Commands::Config { command } = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(&key, &value, &output)
            }
            Some(ConfigCommands::Show) | None => commands::config::show(&output),
        };
    }

    let config = Config::load()?;

    match cli.command {
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Sync => commands::sync::sync(&config, &output).await,
        Commands::Export => commands::sync::export(&config, &output).await,
        Commands::Import { force } => commands::sync::import(&config, force, &output).await,
        Commands::Devices { kind, command } => match command {
            Some(DeviceCommands::Show { device }) => {
                commands::devices::show(&config, kind.into(), &device, &output).await
            }
            Some(DeviceCommands::Delete { device }) => {
                commands::devices::delete(&config, kind.into(), &device, &output).await
            }
            Some(DeviceCommands::List) | None => {
                commands::devices::list(&config, kind.into(), &output).await
            }
        },
        Commands::Status => commands::status::show(&config, &output).await,
        Commands::Watch => commands::watch::run(config, &output).await,
    }
}

/// Initialize tracing output
///
/// RUST_LOG takes precedence; otherwise warnings and errors are shown,
/// and watch mode benefits from `RUST_LOG=marksync_core=info`.
fn init_logging(output: &Output) {
    let default_level = if output.is_quiet() { "error" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("marksync_core={0},marksync={0}", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
