use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// What a failed balance call means for the scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BalanceFailurePolicy {
    /// Fail the request.
    #[default]
    Abort,
    /// Treat the chain as holding no positions.
    TreatAsEmpty,
}

impl FromStr for BalanceFailurePolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" | "error" => Ok(Self::Abort),
            "empty" | "treat-as-empty" => Ok(Self::TreatAsEmpty),
            other => Err(PolicyParseError(other.to_string())),
        }
    }
}

/// What a confirmed zero balance means for the remaining chains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ZeroBalancePolicy {
    /// Stop scanning; later chains are not visited.
    #[default]
    StopScan,
    /// Move on to the next chain.
    Continue,
}

impl FromStr for ZeroBalancePolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stop" => Ok(Self::StopScan),
            "continue" => Ok(Self::Continue),
            other => Err(PolicyParseError(other.to_string())),
        }
    }
}

/// Unrecognized policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown policy: {0}")]
pub struct PolicyParseError(pub String);

/// Configuration for the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Chain pipelines running at the same time.
    pub max_concurrent_chains: NonZeroUsize,
    /// RPC calls in flight per stage; `None` is unbounded.
    pub max_in_flight: Option<NonZeroUsize>,
    /// Handling of failed balance calls.
    pub balance_failure: BalanceFailurePolicy,
    /// Handling of chains with zero balance.
    pub zero_balance: ZeroBalancePolicy,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_chains: NonZeroUsize::MIN,
            max_in_flight: None,
            balance_failure: BalanceFailurePolicy::default(),
            zero_balance: ZeroBalancePolicy::default(),
        }
    }
}

impl fmt::Display for AggregatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chains in flight: {}, calls in flight: {}, balance failure: {:?}, zero balance: {:?}",
            self.max_concurrent_chains,
            self.max_in_flight
                .map_or_else(|| "unbounded".to_string(), |n| n.to_string()),
            self.balance_failure,
            self.zero_balance
        )
    }
}
