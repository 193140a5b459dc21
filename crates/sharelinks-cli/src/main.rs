//! Sharelinks CLI
//!
//! Command-line interface for creating, checking, and revoking share links.

use std::fs::File;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sharelinks_core::{Config, FilePersistence, ItemType, LinkStore, SystemClock};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "sharelinks")]
#[command(about = "Create and manage shareable links for local items")]
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
    /// Create a share link for an item
    #[command(alias = "add")]
    Create {
        /// Id of the item to share
        item_id: String,
        /// Kind of item (document, shopping, todo, note)
        #[arg(short = 't', long = "type")]
        item_type: ItemType,
        /// Days until the link expires (fractions allowed)
        #[arg(short, long)]
        days: Option<f64>,
    },
    /// Revoke a link (id or full URL)
    Revoke { link: String },
    /// Revoke every active link for an item
    RevokeItem { item_id: String },
    /// Check a link and count an access if valid
    Validate { link: String },
    /// Show link details
    Show { link: String },
    /// List links
    #[command(alias = "ls")]
    List {
        /// Only links for this item
        #[arg(short, long)]
        item: Option<String>,
        /// Only links that are currently valid
        #[arg(short, long)]
        active: bool,
    },
    /// Push a link's expiry further out
    Extend {
        link: String,
        /// Additional days (defaults to the configured lifetime)
        #[arg(short, long)]
        days: Option<f64>,
    },
    /// Permanently remove expired links
    Cleanup,
    /// Show configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    let config = Config::load().context("Failed to load configuration")?;
    init_logging(&config, &output);

    if let Commands::Config { command } = &cli.command {
        match command {
            Some(ConfigCommands::Show) | None => commands::config::show(&config, &output),
        }
        return Ok(());
    }

    let mut store = LinkStore::open(
        Box::new(FilePersistence::from_config(&config)),
        Box::new(SystemClock),
        config.store_options(),
    );
    info!(
        "Opened {} with {} link(s)",
        config.links_path().display(),
        store.links().len()
    );
    if store.is_read_only() {
        output.warn(&format!(
            "{} was written by a newer release; changes will not be saved",
            config.links_path().display()
        ));
    }

    match cli.command {
        Commands::Create {
            item_id,
            item_type,
            days,
        } => commands::link::create(&mut store, item_id, item_type, days, &output),
        Commands::Revoke { link } => commands::link::revoke(&mut store, link, &output),
        Commands::RevokeItem { item_id } => {
            commands::link::revoke_item(&mut store, item_id, &output)
        }
        Commands::Validate { link } => commands::link::validate(&mut store, link, &output),
        Commands::Show { link } => commands::link::show(&store, link, &output),
        Commands::List { item, active } => commands::link::list(&store, item, active, &output),
        Commands::Extend { link, days } => commands::link::extend(&mut store, link, days, &output),
        Commands::Cleanup => commands::link::cleanup(&mut store, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

/// Initialize logging
///
/// `RUST_LOG` wins over the configured level. Logs go to `config.log_file`
/// when set, otherwise to stderr.
fn init_logging(config: &Config, output: &Output) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "sharelinks_core={level},sharelinks_cli={level}",
            level = config.log_level
        ))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    match &config.log_file {
        Some(path) => match File::options().create(true).append(true).open(path) {
            Ok(file) => {
                let _ = builder
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
            }
            Err(e) => {
                output.warn(&format!("Could not open log file {:?}: {}", path, e));
                let _ = builder.with_writer(std::io::stderr).try_init();
            }
        },
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
}
