use lpfolio_domain::Chain;
use lpfolio_protocols::ProtocolError;
use std::fmt;

/// Pipeline stage of a per-chain scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// `balanceOf(owner)`.
    Balance,
    /// `tokenOfOwnerByIndex(owner, i)`.
    Enumeration,
    /// `positions(tokenId)`.
    Fetch,
    /// Simulated `collect`.
    Fee,
}

impl Stage {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Balance => "balance",
            Self::Enumeration => "enumeration",
            Self::Fetch => "fetch",
            Self::Fee => "fee",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregation failures. Any of them discards the whole request.
#[derive(Debug, thiserror::Error)]
pub enum AggregationError {
    /// No wallet address was given.
    #[error("userAddress is required")]
    MissingUserAddress,
    /// Wallet address is not a 20-byte hex address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    /// An RPC call of a pipeline stage failed.
    #[error("{stage} stage failed on {chain}: {source}")]
    Stage {
        stage: Stage,
        chain: Chain,
        #[source]
        source: ProtocolError,
    },
    /// No binding could be obtained for a configured chain.
    #[error("failed to connect to {chain}: {source}")]
    Connect {
        chain: Chain,
        #[source]
        source: ProtocolError,
    },
}

impl AggregationError {
    pub(crate) fn stage(stage: Stage, chain: Chain) -> impl FnOnce(ProtocolError) -> Self {
        move |source| Self::Stage {
            stage,
            chain,
            source,
        }
    }

    /// Whether the request itself was invalid, as opposed to an upstream failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingUserAddress)
    }

    /// Message handed to clients: the underlying cause, without pipeline context.
    #[must_use]
    pub fn upstream_message(&self) -> String {
        match self {
            Self::Stage { source, .. } | Self::Connect { source, .. } => source.to_string(),
            other => other.to_string(),
        }
    }

    /// Chain the failure happened on, if any.
    #[must_use]
    pub fn chain(&self) -> Option<Chain> {
        match self {
            Self::Stage { chain, .. } | Self::Connect { chain, .. } => Some(*chain),
            _ => None,
        }
    }

    /// Stage the failure happened in, if any.
    #[must_use]
    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_is_verbatim() {
        let err = AggregationError::stage(Stage::Fetch, Chain::Base)(ProtocolError::Transport(
            "header not found".to_string(),
        ));
        assert_eq!(err.upstream_message(), "header not found");
        assert_eq!(err.to_string(), "fetch stage failed on Base: header not found");
        assert_eq!(err.chain(), Some(Chain::Base));
        assert_eq!(err.failed_stage(), Some(Stage::Fetch));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_validation_message() {
        let err = AggregationError::MissingUserAddress;
        assert!(err.is_validation());
        assert_eq!(err.upstream_message(), "userAddress is required");
    }
}
