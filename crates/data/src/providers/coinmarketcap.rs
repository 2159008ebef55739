//! CoinMarketCap quotes.
//!
//! Endpoint: `{base}/v2/cryptocurrency/quotes/latest?id={ids}`
//! Auth: `X-CMC_PRO_API_KEY` header

use super::QuoteProvider;
use crate::error::MarketDataError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Production API host.
pub const CMC_DEFAULT_BASE_URL: &str = "https://pro-api.coinmarketcap.com";

/// Environment variable holding the API key.
pub const CMC_API_KEY_ENV: &str = "COINMARKETCAP_API_KEY";

const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";
const QUOTES_PATH: &str = "/v2/cryptocurrency/quotes/latest";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches latest quotes for a fixed set of CoinMarketCap asset IDs.
#[derive(Debug, Clone)]
pub struct CoinMarketCapProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    asset_ids: Vec<u64>,
}

impl CoinMarketCapProvider {
    /// Creates a provider quoting Bitcoin (`id=1`).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: Option<String>) -> Result<Self, MarketDataError> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Creates a provider with a custom request timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_timeout(api_key: Option<String>, timeout: Duration) -> Result<Self, MarketDataError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: CMC_DEFAULT_BASE_URL.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            asset_ids: vec![1],
        })
    }

    /// Points the provider at another host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replaces the quoted asset IDs.
    #[must_use]
    pub fn with_asset_ids(mut self, asset_ids: Vec<u64>) -> Self {
        self.asset_ids = asset_ids;
        self
    }

    /// Full request URL.
    #[must_use]
    pub fn quotes_url(&self) -> String {
        let ids = self
            .asset_ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        format!("{}{}?id={}", self.base_url, QUOTES_PATH, ids)
    }
}

#[async_trait]
impl QuoteProvider for CoinMarketCapProvider {
    fn name(&self) -> &'static str {
        "coinmarketcap"
    }

    async fn latest_quotes(&self) -> Result<Value, MarketDataError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(MarketDataError::MissingApiKey(CMC_API_KEY_ENV))?;

        let url = self.quotes_url();
        debug!(url = %url, "Requesting quotes");

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Quote request rejected");
            return Err(MarketDataError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| MarketDataError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use serde_json::json;

    async fn quotes(headers: HeaderMap) -> (StatusCode, axum::Json<Value>) {
        match headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
            Some("test-key") => (
                StatusCode::OK,
                axum::Json(json!({ "data": { "1": { "symbol": "BTC" } } })),
            ),
            _ => (
                StatusCode::UNAUTHORIZED,
                axum::Json(json!({ "status": { "error_code": 1002 } })),
            ),
        }
    }

    async fn spawn_upstream() -> String {
        let app = Router::new().route(QUOTES_PATH, get(quotes));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_quotes_url() {
        let provider = CoinMarketCapProvider::new(None).unwrap();
        assert_eq!(
            provider.quotes_url(),
            "https://pro-api.coinmarketcap.com/v2/cryptocurrency/quotes/latest?id=1"
        );

        let provider = provider
            .with_base_url("http://localhost:8080/")
            .with_asset_ids(vec![1, 1027]);
        assert_eq!(
            provider.quotes_url(),
            "http://localhost:8080/v2/cryptocurrency/quotes/latest?id=1,1027"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let provider = CoinMarketCapProvider::new(Some("  ".to_string())).unwrap();
        let err = provider.latest_quotes().await.unwrap_err();
        assert_eq!(err.to_string(), "COINMARKETCAP_API_KEY is not set");
    }

    #[tokio::test]
    async fn test_body_passed_through() {
        let base = spawn_upstream().await;
        let provider = CoinMarketCapProvider::new(Some("test-key".to_string()))
            .unwrap()
            .with_base_url(base);

        let body = provider.latest_quotes().await.unwrap();
        assert_eq!(body, json!({ "data": { "1": { "symbol": "BTC" } } }));
    }

    #[tokio::test]
    async fn test_rejected_key() {
        let base = spawn_upstream().await;
        let provider = CoinMarketCapProvider::new(Some("wrong".to_string()))
            .unwrap()
            .with_base_url(base);

        let err = provider.latest_quotes().await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(401));
        assert_eq!(err.to_string(), "Request failed with status code 401");
    }
}
