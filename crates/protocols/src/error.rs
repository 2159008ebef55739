use lpfolio_domain::Chain;

/// Failures talking to a position manager.
///
/// `Display` yields the upstream message unchanged so it can be handed to
/// clients as is.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Contract call failed (transport, node or revert).
    #[error(transparent)]
    Contract(#[from] alloy::contract::Error),
    /// Transport level failure reported outside of a contract call.
    #[error("{0}")]
    Transport(String),
    /// Address could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    /// RPC endpoint URL could not be built.
    #[error("invalid RPC endpoint for {chain}: {reason}")]
    InvalidEndpoint { chain: Chain, reason: String },
    /// Returned value does not fit the expected type.
    #[error("failed to decode {0}")]
    Decode(String),
    /// Answers that contradict each other, e.g. the same token at two indices.
    #[error("{0}")]
    Inconsistent(String),
    /// No binding exists for the chain.
    #[error("no position manager connected for {0}")]
    UnknownChain(Chain),
}
