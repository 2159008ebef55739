//! Uniswap V3 `NonfungiblePositionManager` adapter.
//!
//! This module provides read-only access to position manager deployments:
//! - Enumerate the position tokens of an owner
//! - Read position state
//! - Simulate fee collection with `eth_call`

/// `sol!` generated contract interface.
pub mod bindings;
/// Per-chain provider construction.
pub mod connector;
/// `PositionManager` implementation over an alloy provider.
pub mod position_manager;

pub use connector::AlloyConnector;
pub use position_manager::AlloyPositionManager;
