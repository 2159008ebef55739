//! Market data access.
//!
//! Provides the upstream quote feed behind the price endpoint:
//! - [`QuoteProvider`] abstraction over quote sources
//! - CoinMarketCap implementation over HTTPS
//! - Error types

/// Error types.
pub mod error;
/// Quote provider implementations.
pub mod providers;

pub use error::MarketDataError;
pub use providers::{CoinMarketCapProvider, QuoteProvider};
