//! Position aggregation pipeline.
//!
//! For every chain in registry order the aggregator runs four stages:
//! - `balanceOf(owner)` to learn how many position tokens are held
//! - `tokenOfOwnerByIndex` for every index, concurrently
//! - `positions(tokenId)` for every token, concurrently
//! - a simulated `collect` for every position that still holds liquidity
//!
//! Each chain contributes its liquid positions first and its drained ones
//! after, both in enumeration order. Any stage failure discards the whole
//! result.

mod balance;
mod config;

pub use balance::{BalanceProbe, MAX_POSITIONS_PER_CHAIN};
pub use config::{AggregatorConfig, BalanceFailurePolicy, PolicyParseError, ZeroBalancePolicy};

use crate::error::{AggregationError, Stage};
use crate::scheduler::StageScheduler;
use alloy::primitives::{Address, U256};
use futures::stream::{self, StreamExt};
use lpfolio_domain::{Chain, ChainConfig, ChainRegistry, FEE_AMOUNT_MAX, Position, UncollectedFees};
use lpfolio_protocols::{PositionManager, PositionManagerConnector, ProtocolError};
use std::collections::HashSet;
use std::pin::pin;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// A fetched position together with the token ID it was fetched by.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPosition {
    pub token_id: U256,
    pub position: Position,
}

/// Splits positions into `(with liquidity, without liquidity)`.
///
/// Both halves keep their relative input order.
#[must_use]
pub fn partition_by_liquidity(
    fetched: Vec<FetchedPosition>,
) -> (Vec<FetchedPosition>, Vec<FetchedPosition>) {
    fetched.into_iter().partition(|f| f.position.has_liquidity())
}

/// Statistics of one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationSummary {
    /// Chains whose balance stage completed.
    pub chains_scanned: usize,
    /// Positions in the result.
    pub positions: usize,
    /// Simulated collects issued.
    pub fees_simulated: usize,
    /// Chain whose empty balance ended the scan.
    pub stopped_at: Option<Chain>,
    /// Wall-clock duration.
    pub elapsed: Duration,
}

enum ChainScan {
    /// Positions ready to merge, liquid ones first.
    Positions {
        positions: Vec<Position>,
        fees_simulated: usize,
    },
    /// Nothing held here; move on.
    Skip,
    /// Nothing held here; do not visit later chains.
    Stop,
}

/// Aggregates a wallet's positions across the configured chains.
pub struct PositionAggregator {
    registry: Arc<ChainRegistry>,
    connector: Arc<dyn PositionManagerConnector>,
    scheduler: StageScheduler,
    config: AggregatorConfig,
}

impl PositionAggregator {
    /// Creates an aggregator over `registry`, reaching chains through `connector`.
    pub fn new(
        registry: Arc<ChainRegistry>,
        connector: Arc<dyn PositionManagerConnector>,
        config: AggregatorConfig,
    ) -> Self {
        Self {
            registry,
            connector,
            scheduler: StageScheduler::new(config.max_in_flight),
            config,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Returns every position `user_address` holds on the configured chains.
    ///
    /// # Errors
    /// Returns [`AggregationError::MissingUserAddress`] for an empty address,
    /// before any RPC call. Any failed call on any chain fails the request.
    pub async fn aggregate(&self, user_address: &str) -> Result<Vec<Position>, AggregationError> {
        self.aggregate_with_summary(user_address)
            .await
            .map(|(positions, _)| positions)
    }

    /// Same as [`Self::aggregate`], also returning run statistics.
    ///
    /// # Errors
    /// See [`Self::aggregate`].
    pub async fn aggregate_with_summary(
        &self,
        user_address: &str,
    ) -> Result<(Vec<Position>, AggregationSummary), AggregationError> {
        let owner = parse_owner(user_address)?;
        let started = Instant::now();
        let mut summary = AggregationSummary::default();
        let mut result = Vec::new();

        // `buffered` yields in registry order even when chains overlap.
        let mut scans = pin!(
            stream::iter(self.registry.iter().cloned().collect::<Vec<_>>())
                .map(|config| self.scan_chain(config, owner))
                .buffered(self.config.max_concurrent_chains.get())
        );

        while let Some(scan) = scans.next().await {
            let (chain, scan) = scan?;
            summary.chains_scanned += 1;
            match scan {
                ChainScan::Positions {
                    positions,
                    fees_simulated,
                } => {
                    summary.fees_simulated += fees_simulated;
                    result.extend(positions);
                }
                ChainScan::Skip => {}
                ChainScan::Stop => {
                    debug!(chain = %chain, "Empty balance, skipping remaining chains");
                    summary.stopped_at = Some(chain);
                    break;
                }
            }
        }

        summary.positions = result.len();
        summary.elapsed = started.elapsed();
        info!(
            owner = %owner,
            chains = summary.chains_scanned,
            positions = summary.positions,
            fees_simulated = summary.fees_simulated,
            stopped_at = ?summary.stopped_at,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Positions aggregated"
        );
        Ok((result, summary))
    }

    async fn scan_chain(
        &self,
        config: ChainConfig,
        owner: Address,
    ) -> Result<(Chain, ChainScan), AggregationError> {
        let chain = config.id;
        let manager = self
            .connector
            .connect(&config)
            .map_err(|source| AggregationError::Connect { chain, source })?;

        let count = match BalanceProbe::classify(manager.balance_of(owner).await) {
            BalanceProbe::Holding(count) => count,
            BalanceProbe::Empty => return Ok((chain, self.on_empty())),
            BalanceProbe::Unavailable(source) => match self.config.balance_failure {
                BalanceFailurePolicy::Abort => {
                    return Err(AggregationError::stage(Stage::Balance, chain)(source));
                }
                BalanceFailurePolicy::TreatAsEmpty => {
                    warn!(chain = %chain, error = %source, "Balance unavailable, treating as empty");
                    return Ok((chain, self.on_empty()));
                }
            },
        };
        debug!(chain = %chain, count, "Balance probed");

        let token_ids = self.enumerate(manager.as_ref(), chain, owner, count).await?;
        let fetched = self.fetch(manager.as_ref(), chain, token_ids).await?;
        let (non_empty, empty) = partition_by_liquidity(fetched);
        let fees_simulated = non_empty.len();

        let mut positions = self
            .annotate_fees(manager.as_ref(), chain, owner, non_empty)
            .await?;
        positions.extend(empty.into_iter().map(|f| f.position));

        debug!(chain = %chain, positions = positions.len(), fees_simulated, "Chain scanned");
        Ok((
            chain,
            ChainScan::Positions {
                positions,
                fees_simulated,
            },
        ))
    }

    fn on_empty(&self) -> ChainScan {
        match self.config.zero_balance {
            ZeroBalancePolicy::StopScan => ChainScan::Stop,
            ZeroBalancePolicy::Continue => ChainScan::Skip,
        }
    }

    async fn enumerate(
        &self,
        manager: &dyn PositionManager,
        chain: Chain,
        owner: Address,
        count: usize,
    ) -> Result<Vec<U256>, AggregationError> {
        let calls = (0..count)
            .map(|index| manager.token_of_owner_by_index(owner, U256::from(index)))
            .collect();
        let token_ids = self
            .scheduler
            .run(Stage::Enumeration, calls)
            .await
            .map_err(AggregationError::stage(Stage::Enumeration, chain))?;

        // Indices shift if a transfer lands mid-enumeration.
        let mut seen = HashSet::with_capacity(token_ids.len());
        if let Some(duplicate) = token_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(AggregationError::stage(Stage::Enumeration, chain)(
                ProtocolError::Inconsistent(format!(
                    "token {duplicate} enumerated twice; ownership changed during the scan"
                )),
            ));
        }
        Ok(token_ids)
    }

    async fn fetch(
        &self,
        manager: &dyn PositionManager,
        chain: Chain,
        token_ids: Vec<U256>,
    ) -> Result<Vec<FetchedPosition>, AggregationError> {
        let calls = token_ids.iter().map(|id| manager.positions(*id)).collect();
        let raw = self
            .scheduler
            .run(Stage::Fetch, calls)
            .await
            .map_err(AggregationError::stage(Stage::Fetch, chain))?;

        Ok(token_ids
            .into_iter()
            .zip(raw)
            .map(|(token_id, raw)| FetchedPosition {
                token_id,
                position: raw.into_position(token_id, chain),
            })
            .collect())
    }

    async fn annotate_fees(
        &self,
        manager: &dyn PositionManager,
        chain: Chain,
        owner: Address,
        non_empty: Vec<FetchedPosition>,
    ) -> Result<Vec<Position>, AggregationError> {
        let calls = non_empty
            .iter()
            .map(|f| manager.simulate_collect(f.token_id, owner, FEE_AMOUNT_MAX, FEE_AMOUNT_MAX))
            .collect();
        let fees = self
            .scheduler
            .run(Stage::Fee, calls)
            .await
            .map_err(AggregationError::stage(Stage::Fee, chain))?;

        Ok(non_empty
            .into_iter()
            .zip(fees)
            .map(|(f, amounts)| {
                f.position
                    .with_uncollected_fees(UncollectedFees::new(amounts.amount0, amounts.amount1))
            })
            .collect())
    }
}

fn parse_owner(user_address: &str) -> Result<Address, AggregationError> {
    let trimmed = user_address.trim();
    if trimmed.is_empty() {
        return Err(AggregationError::MissingUserAddress);
    }
    Address::from_str(trimmed).map_err(|_| AggregationError::InvalidAddress(trimmed.to_string()))
}
