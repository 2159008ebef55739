//! Command Line Interface for the LP position aggregator.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use lpfolio_api::{ApiConfig, ApiServer, AppState};
use lpfolio_data::providers::CMC_API_KEY_ENV;
use lpfolio_data::{CoinMarketCapProvider, QuoteProvider};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lpfolio")]
#[command(about = "Multi-chain Uniswap V3 LP position aggregator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Listen host (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Aggregate the positions of a wallet once and print them
    Positions {
        /// Wallet address
        #[arg(short, long)]
        address: String,
    },
    /// Fetch the latest market quotes
    Prices,
    /// Show the enabled chains in scan order
    Chains,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lpfolio=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            let mut config = ApiConfig::from_env()?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            info!(aggregator = %config.aggregator, "Starting API server");

            let state = AppState::from_config(&config)?;
            ApiServer::new(config.server, state)
                .run()
                .await
                .context("API server failed")?;
        }
        Commands::Positions { address } => {
            let config = ApiConfig::from_env()?;
            let state = AppState::from_config(&config)?;

            println!("🔍 Scanning {} chain(s) for {}...", config.chains.len(), address);
            let positions = state.positions.get_positions(Some(address.as_str())).await?;

            let liquid = positions.iter().filter(|p| p.has_liquidity()).count();
            println!("✅ Found {} position(s), {} with liquidity", positions.len(), liquid);
            println!("{}", serde_json::to_string_pretty(&positions)?);
        }
        Commands::Prices => {
            let provider = CoinMarketCapProvider::new(env::var(CMC_API_KEY_ENV).ok())?;

            println!("📡 Requesting {}...", provider.quotes_url());
            let quotes = provider.latest_quotes().await?;
            println!("{}", serde_json::to_string_pretty(&quotes)?);
        }
        Commands::Chains => {
            let config = ApiConfig::from_env()?;
            let registry = config.registry()?;

            println!("{:<10} | {:<44} | {:<42}", "Chain", "RPC endpoint", "Position manager");
            println!("{}", "-".repeat(102));
            for chain in registry.iter() {
                println!(
                    "{:<10} | {:<44} | {:<42}",
                    chain.id.as_str(),
                    chain.rpc_endpoint_template,
                    chain.contract_address
                );
            }
        }
    }

    Ok(())
}
