use crate::config::{ApiConfig, ConfigError};
use crate::services::{PositionService, PriceService};
use lpfolio_data::{CoinMarketCapProvider, QuoteProvider};
use lpfolio_domain::Chain;
use lpfolio_execution::PositionAggregator;
use lpfolio_protocols::AlloyConnector;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub positions: PositionService,
    pub prices: PriceService,
}

impl AppState {
    /// Creates state from ready-made collaborators.
    #[must_use]
    pub fn new(aggregator: Arc<PositionAggregator>, quotes: Arc<dyn QuoteProvider>) -> Self {
        Self {
            positions: PositionService::new(aggregator),
            prices: PriceService::new(quotes),
        }
    }

    /// Wires the production collaborators: Infura-backed chain bindings and
    /// CoinMarketCap quotes.
    ///
    /// # Errors
    /// Returns an error if a chain endpoint or contract address is invalid,
    /// or an HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ConfigError> {
        let registry = Arc::new(config.registry()?);
        let connector = Arc::new(AlloyConnector::new(&registry, &config.infura_key)?);
        let aggregator = Arc::new(PositionAggregator::new(
            registry,
            connector,
            config.aggregator.clone(),
        ));
        let quotes = Arc::new(CoinMarketCapProvider::new(
            config.coinmarketcap_api_key.clone(),
        )?);
        Ok(Self::new(aggregator, quotes))
    }

    /// Enabled chains in scan order.
    #[must_use]
    pub fn chains(&self) -> Vec<Chain> {
        self.positions.aggregator().registry().chains()
    }
}
