use alloy::primitives::U256;
use lpfolio_protocols::ProtocolError;

/// Largest balance accepted from a node; beyond it the count is treated as
/// garbage rather than fanned out into that many calls.
pub const MAX_POSITIONS_PER_CHAIN: usize = 10_000;

/// Outcome of the balance stage.
///
/// Keeps "holds nothing" apart from "could not ask", so a node outage is
/// never reported as an empty wallet unless the policy says so.
#[derive(Debug)]
pub enum BalanceProbe {
    /// Owner holds this many position tokens.
    Holding(usize),
    /// Confirmed zero balance.
    Empty,
    /// The call failed or returned an unusable count.
    Unavailable(ProtocolError),
}

impl BalanceProbe {
    /// Classifies the result of `balanceOf`.
    #[must_use]
    pub fn classify(result: Result<U256, ProtocolError>) -> Self {
        match result {
            Ok(balance) if balance.is_zero() => Self::Empty,
            Ok(balance) => match usize::try_from(balance) {
                Ok(count) if count <= MAX_POSITIONS_PER_CHAIN => Self::Holding(count),
                _ => Self::Unavailable(ProtocolError::Decode(format!(
                    "balance {balance} exceeds {MAX_POSITIONS_PER_CHAIN} positions"
                ))),
            },
            Err(e) => Self::Unavailable(e),
        }
    }
}
