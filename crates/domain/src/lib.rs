//! Core domain types for the LP position aggregator.
//!
//! - Chain registry with per-chain RPC endpoint and position manager address
//! - Liquidity position model and its JSON wire format
//! - Domain error types

/// Chains and the chain registry.
pub mod chain;
/// Error types.
pub mod error;
/// Liquidity positions and uncollected fees.
pub mod position;
/// Serde adapters for wide integers.
pub mod serde_helpers;

pub use chain::{Chain, ChainConfig, ChainRegistry};
pub use error::DomainError;
pub use position::{FEE_AMOUNT_MAX, Position, UncollectedFees};
