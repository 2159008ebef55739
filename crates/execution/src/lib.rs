//! Cross-chain position aggregation.
//!
//! This crate drives the position manager bindings through a staged pipeline:
//! - Balance probe per chain
//! - Concurrent token enumeration and position fetch
//! - Fee simulation for positions that still hold liquidity
//! - Ordered, all-or-nothing merge across chains

/// Prelude module for convenient imports.
pub mod prelude;

/// Position aggregation pipeline.
pub mod aggregator;
/// Error types.
pub mod error;
/// Concurrent stage execution.
pub mod scheduler;

pub use aggregator::{
    AggregationSummary, AggregatorConfig, BalanceFailurePolicy, PositionAggregator,
    ZeroBalancePolicy,
};
pub use error::{AggregationError, Stage};
pub use scheduler::StageScheduler;
