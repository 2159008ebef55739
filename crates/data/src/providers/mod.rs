mod coinmarketcap;

pub use coinmarketcap::{CMC_API_KEY_ENV, CMC_DEFAULT_BASE_URL, CoinMarketCapProvider};

use crate::error::MarketDataError;
use async_trait::async_trait;
use serde_json::Value;

/// A source of latest market quotes.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &'static str;

    /// Latest quotes, as returned by the upstream service.
    async fn latest_quotes(&self) -> Result<Value, MarketDataError>;
}
