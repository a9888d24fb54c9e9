use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use equilibrium_admin::config::Config;
use equilibrium_admin::error::AdminErrorTrait;

mod commands;

// The binary renders its own messages, so it needs its own translation table
rust_i18n::i18n!("locales", fallback = "en");

#[derive(Parser)]
#[command(
    name = "equilibrium",
    version,
    about = "Admin client for the Equilibrium partner network",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Dump Prometheus metrics to stderr when the command finishes
    #[arg(long, global = true)]
    metrics: bool,

    /// TOML configuration file (environment variables otherwise)
    #[arg(short, long, global = true, env = "EQUILIBRIUM_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the partner structure grouped by level
    Structure {
        /// Print the level grouping as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// List pending registrations
    Queue,

    /// Complete the registration of a queued user
    Complete {
        /// User id of the queue entry
        user_id: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }
    config.validate().context("Invalid configuration")?;

    setup_tracing(&config.logging.format, &config.logging.level, cli.verbose)?;
    equilibrium_admin::i18n::init_from_env();
    if let Err(e) = equilibrium_admin::metrics::init_metrics() {
        tracing::warn!(error = %e, "Metrics initialization failed");
    }

    tracing::info!(api = %config.gateway.base_url, "equilibrium admin starting");

    let outcome = match cli.command {
        Commands::Structure { json } => {
            tracing::info!(json = %json, "Starting structure command");
            commands::structure(&config, json).await
        }
        Commands::Queue => {
            tracing::info!("Starting queue command");
            commands::queue(&config).await
        }
        Commands::Complete { user_id } => {
            tracing::info!(user_id = %user_id, "Starting complete command");
            commands::complete(&config, user_id).await
        }
    };

    if cli.metrics {
        match equilibrium_admin::metrics::encode_metrics() {
            Ok(text) => eprint!("{text}"),
            Err(e) => tracing::warn!(error = %e, "Metrics encoding failed"),
        }
    }

    if let Err(e) = outcome {
        tracing::error!(
            error = %e,
            category = ?e.category(),
            recoverable = e.is_recoverable(),
            "Command failed"
        );
        eprintln!("{}: {}", e.category().localized_desc(), e.localized_desc());
        std::process::exit(1);
    }

    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("equilibrium_admin=debug,equilibrium=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!(
            "equilibrium_admin={level},equilibrium={level},warn"
        ))
        .context("Invalid log level")?
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
