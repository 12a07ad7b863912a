//! Pegasys market deployer
//!
//! Resolves a market configuration against the target network, deploys the
//! missing infrastructure and wires the oracles.
//! Configuration comes from the environment (and `.env`):
//! - `MARKET` / `NETWORK` / `FORK` / `MAINNET_FORK` select what to resolve
//! - `DRY_RUN=true` records operations instead of sending them
//! - `RPC_URL`, `CHAIN_ID`, `PRIVATE_KEY`, `ARTIFACTS_DIR` configure the chain
//! - `REGISTRY_PATH` and `MARKETS_DIR` locate the address registry and extra markets

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use deployer_chain::{ChainSubmitter, DryRunSubmitter, JsonFileRegistry, RpcSubmitterBuilder};
use deployer_core::{DeploymentPipeline, MarketRegistry, Network, NetworkContext};

/// Environment variable names.
mod env {
    pub const MARKET: &str = "MARKET";
    pub const RPC_URL: &str = "RPC_URL";
    pub const CHAIN_ID: &str = "CHAIN_ID";
    pub const PRIVATE_KEY: &str = "PRIVATE_KEY";
    pub const ARTIFACTS_DIR: &str = "ARTIFACTS_DIR";
    pub const REGISTRY_PATH: &str = "REGISTRY_PATH";
    pub const MARKETS_DIR: &str = "MARKETS_DIR";
    pub const DRY_RUN: &str = "DRY_RUN";
}

/// Rollux mainnet.
const DEFAULT_CHAIN_ID: u64 = 570;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,deployer_core=debug,deployer_chain=debug")),
        )
        .init();

    let config = load_config()?;
    let context = NetworkContext::from_env(Network::Hardhat)?;

    let markets = match &config.markets_dir {
        Some(dir) => MarketRegistry::load_from_dir(dir)?,
        None => MarketRegistry::builtin()?,
    };
    let pool = markets
        .load_pool(&config.market)
        .with_context(|| format!("loading market {}", config.market))?;

    info!(
        market = %pool.market_id,
        network = %context.active(),
        dry_run = config.dry_run,
        "Configuration loaded"
    );

    let submitter = build_submitter(&config).await?;
    // A dry run must not leave its made-up addresses behind for a real run.
    let network = context.active().as_str();
    let registry = if config.dry_run {
        JsonFileRegistry::read_only(&config.registry_path, network)
    } else {
        JsonFileRegistry::open(&config.registry_path, network)
    }
    .with_context(|| format!("opening registry {}", config.registry_path))?;
    let registry = Arc::new(registry);

    let mut pipeline = DeploymentPipeline::new(&pool, context, submitter, registry);
    let outcome = pipeline.run().await;
    let report = match outcome {
        Ok(report) => report,
        Err(e) => {
            for deployment in pipeline.deployments() {
                tracing::warn!(
                    contract = %deployment.name,
                    address = %deployment.address,
                    "Deployed before failure, left in place"
                );
            }
            return Err(e).context("market configuration failed");
        }
    };

    println!("{report}");
    Ok(())
}

/// Configuration loaded from environment.
struct Config {
    market: String,
    dry_run: bool,
    rpc_url: String,
    chain_id: u64,
    private_key: Option<String>,
    artifacts_dir: String,
    registry_path: String,
    markets_dir: Option<String>,
}

fn load_config() -> Result<Config> {
    let get_env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

    let chain_id = match get_env(env::CHAIN_ID) {
        Some(id) => id
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", env::CHAIN_ID, e))?,
        None => DEFAULT_CHAIN_ID,
    };

    Ok(Config {
        market: get_env(env::MARKET).unwrap_or_else(|| "Pegasys".to_string()),
        dry_run: get_env(env::DRY_RUN).is_some_and(|v| v == "true"),
        rpc_url: get_env(env::RPC_URL).unwrap_or_else(|| "http://127.0.0.1:8545".to_string()),
        chain_id,
        private_key: get_env(env::PRIVATE_KEY),
        artifacts_dir: get_env(env::ARTIFACTS_DIR).unwrap_or_else(|| "artifacts".to_string()),
        registry_path: get_env(env::REGISTRY_PATH)
            .unwrap_or_else(|| "deployed-contracts.json".to_string()),
        markets_dir: get_env(env::MARKETS_DIR),
    })
}

async fn build_submitter(config: &Config) -> Result<Arc<dyn ChainSubmitter>> {
    if config.dry_run {
        info!("Dry run: operations are recorded, nothing is sent");
        return Ok(Arc::new(DryRunSubmitter::default()));
    }

    let private_key = config
        .private_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("Missing env var: {}", env::PRIVATE_KEY))?;

    let submitter = RpcSubmitterBuilder::new(&config.rpc_url, config.chain_id)
        .artifacts_dir(&config.artifacts_dir)
        .build(private_key)
        .await
        .context("connecting submitter")?;
    info!(
        address = %submitter.address,
        rpc = %submitter.rpc_url(),
        chain_id = config.chain_id,
        "Submitter initialized"
    );

    Ok(Arc::new(submitter))
}
