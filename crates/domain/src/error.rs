use crate::chain::Chain;

/// Errors raised while building or querying domain values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Chain name could not be parsed.
    #[error("unknown chain name: {0}")]
    UnknownChainName(String),
    /// Chain is valid but not part of the registry.
    #[error("chain {0} is not configured")]
    UnknownChain(Chain),
    /// The same chain was configured twice.
    #[error("chain {0} is configured more than once")]
    DuplicateChain(Chain),
}
