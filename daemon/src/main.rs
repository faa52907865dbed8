//! VERTEX daemon — entry point for running a consensus engine node.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use vertex_crypto::{generate_keypair, Ed25519Verifier};
use vertex_node::logging::{init_logging, LogFormat};
use vertex_node::{Node, NodeConfig};
use vertex_validators::{Validator, ValidatorRegistry};

#[derive(Parser)]
#[command(name = "vertex-daemon", about = "VERTEX transaction-DAG consensus node")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "VERTEX_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for operational state.
    #[arg(long, env = "VERTEX_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Block production cadence in milliseconds.
    #[arg(long, env = "VERTEX_BLOCK_INTERVAL_MS")]
    block_interval_ms: Option<u64>,

    /// Number of synthetic validators to seed (dev networks).
    #[arg(long, env = "VERTEX_DEV_VALIDATORS")]
    dev_validators: Option<usize>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "VERTEX_LOG_LEVEL")]
    log_level: String,

    /// Log format: "human" or "json".
    #[arg(long, env = "VERTEX_LOG_FORMAT")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => NodeConfig::from_toml_file(&path.display().to_string())?,
        None => NodeConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(interval) = cli.block_interval_ms {
        config.block_interval_ms = interval;
    }
    if let Some(count) = cli.dev_validators {
        config.dev_validators = count;
    }
    config.log_level = cli.log_level;
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    config.validate()?;

    init_logging(
        LogFormat::from_config(&config.log_format),
        &config.log_level,
    );
    if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), "loaded config file");
    }

    // Validator membership is an administrative concern; until an admin
    // surface exists, seed a synthetic set with fresh keys.
    let mut registry = ValidatorRegistry::new(&config.consensus);
    for _ in 0..config.dev_validators {
        let keypair = generate_keypair();
        registry.register(Validator::new(keypair.public, u128::from(config.dev_stake)))?;
    }
    tracing::info!(
        validators = config.dev_validators,
        stake = %config.dev_stake,
        "seeded dev validator set"
    );

    let mut node = Node::new(config, registry, Arc::new(Ed25519Verifier));
    node.start();

    node.shutdown_controller().wait_for_signal().await;
    node.stop().await?;

    tracing::info!("vertex daemon exited cleanly");
    Ok(())
}
