//! On-chain position manager bindings.
//!
//! Exposes the read-only capability set the aggregator needs from a deployed
//! position manager contract, and an `alloy` implementation for Uniswap V3.

/// Error types.
pub mod error;
/// Raw contract return values.
pub mod raw;
/// Uniswap V3 position manager over JSON-RPC.
pub mod uniswap;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::ProtocolError;
pub use raw::{CollectAmounts, RawPosition};
pub use uniswap::{AlloyConnector, AlloyPositionManager};

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use lpfolio_domain::ChainConfig;
use std::sync::Arc;

/// Read-only calls against a position manager deployment.
#[async_trait]
pub trait PositionManager: Send + Sync {
    /// Number of position tokens held by `owner`.
    async fn balance_of(&self, owner: Address) -> Result<U256, ProtocolError>;

    /// Token ID at ownership index `index` of `owner`.
    async fn token_of_owner_by_index(
        &self,
        owner: Address,
        index: U256,
    ) -> Result<U256, ProtocolError>;

    /// Raw state of a position token.
    async fn positions(&self, token_id: U256) -> Result<RawPosition, ProtocolError>;

    /// Dry run of `collect`: what would be paid out to `recipient`, without
    /// sending a transaction.
    async fn simulate_collect(
        &self,
        token_id: U256,
        recipient: Address,
        amount0_max: u128,
        amount1_max: u128,
    ) -> Result<CollectAmounts, ProtocolError>;
}

/// Hands out a [`PositionManager`] per configured chain.
pub trait PositionManagerConnector: Send + Sync {
    fn connect(&self, chain: &ChainConfig) -> Result<Arc<dyn PositionManager>, ProtocolError>;
}
