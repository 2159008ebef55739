//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use lpfolio_execution::prelude::*;
//! ```

// Aggregator
pub use crate::aggregator::{
    AggregationSummary, AggregatorConfig, BalanceFailurePolicy, BalanceProbe, FetchedPosition,
    PositionAggregator, ZeroBalancePolicy, partition_by_liquidity,
};

// Errors
pub use crate::error::{AggregationError, Stage};

// Scheduler
pub use crate::scheduler::StageScheduler;
