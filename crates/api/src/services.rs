//! Service layer for API operations.
//!
//! Services wrap the core crates, log failures with their context, and hand
//! back [`ApiError`]s ready to be rendered.

use crate::error::ApiError;
use lpfolio_data::QuoteProvider;
use lpfolio_domain::Position;
use lpfolio_execution::{AggregationError, PositionAggregator};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// Position lookups.
#[derive(Clone)]
pub struct PositionService {
    aggregator: Arc<PositionAggregator>,
}

impl PositionService {
    #[must_use]
    pub fn new(aggregator: Arc<PositionAggregator>) -> Self {
        Self { aggregator }
    }

    #[must_use]
    pub fn aggregator(&self) -> &PositionAggregator {
        &self.aggregator
    }

    /// Aggregates the positions of `user_address` across all enabled chains.
    ///
    /// # Errors
    /// Returns [`ApiError::BadRequest`] when no address is given and
    /// [`ApiError::Upstream`] when any upstream call fails.
    pub async fn get_positions(&self, user_address: Option<&str>) -> Result<Vec<Position>, ApiError> {
        let Some(user_address) = user_address else {
            return Err(AggregationError::MissingUserAddress.into());
        };

        match self.aggregator.aggregate(user_address).await {
            Ok(positions) => {
                info!(user = %user_address.trim(), positions = positions.len(), "Positions served");
                Ok(positions)
            }
            Err(e) if e.is_validation() => Err(e.into()),
            Err(e) => {
                error!(
                    user = %user_address.trim(),
                    chain = ?e.chain(),
                    stage = ?e.failed_stage(),
                    error = %e,
                    "Position aggregation failed"
                );
                Err(e.into())
            }
        }
    }
}

/// Market quote passthrough.
#[derive(Clone)]
pub struct PriceService {
    provider: Arc<dyn QuoteProvider>,
}

impl PriceService {
    #[must_use]
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self { provider }
    }

    /// Latest quotes, verbatim from the provider.
    ///
    /// # Errors
    /// Returns [`ApiError::Upstream`] on any provider failure.
    pub async fn latest_quotes(&self) -> Result<Value, ApiError> {
        self.provider.latest_quotes().await.map_err(|e| {
            error!(
                provider = self.provider.name(),
                status = ?e.upstream_status(),
                error = %e,
                "Quote request failed"
            );
            ApiError::from(e)
        })
    }
}
