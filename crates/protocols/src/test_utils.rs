//! Scripted in-memory position manager for tests.

use crate::error::ProtocolError;
use crate::raw::{CollectAmounts, RawPosition};
use crate::{PositionManager, PositionManagerConnector};
use alloy::primitives::{Address, U256, address};
use async_trait::async_trait;
use lpfolio_domain::{Chain, ChainConfig};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// WETH on Arbitrum.
pub const TOKEN0: Address = address!("0x82aF49447D8a07e3bd95BD0d56f35241523fBab1");
/// USDC on Arbitrum.
pub const TOKEN1: Address = address!("0xaf88d065e77c8cC2239327C5EDb3A432268e5831");
/// Wallet used across tests.
pub const OWNER: Address = address!("0x247bcb856d028d66bd865480604f45797446d179");

/// A call received by [`MockPositionManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    BalanceOf(Address),
    TokenOfOwnerByIndex(Address, U256),
    Positions(U256),
    Collect {
        token_id: U256,
        recipient: Address,
        amount0_max: u128,
        amount1_max: u128,
    },
}

/// Raw position with the given liquidity and otherwise fixed fields.
#[must_use]
pub fn raw_position(liquidity: u128) -> RawPosition {
    RawPosition {
        nonce: 0,
        operator: Address::ZERO,
        token0: TOKEN0,
        token1: TOKEN1,
        fee: 500,
        tick_lower: -887_270,
        tick_upper: 887_270,
        liquidity,
        fee_growth_inside0_last_x128: U256::from(1_000u64),
        fee_growth_inside1_last_x128: U256::from(2_000u64),
        tokens_owed0: 0,
        tokens_owed1: 0,
    }
}

/// Position manager answering from scripted state.
///
/// The balance defaults to the number of scripted positions; every call is
/// recorded in arrival order.
#[derive(Default)]
pub struct MockPositionManager {
    token_ids: Vec<U256>,
    positions: HashMap<U256, RawPosition>,
    fees: HashMap<U256, CollectAmounts>,
    balance_override: Option<U256>,
    balance_error: Option<String>,
    index_errors: HashMap<usize, String>,
    position_errors: HashMap<U256, String>,
    collect_errors: HashMap<U256, String>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockPositionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an owned position; `fees` is what a simulated collect returns.
    #[must_use]
    pub fn with_position(mut self, token_id: u64, raw: RawPosition, fees: (u128, u128)) -> Self {
        let token_id = U256::from(token_id);
        self.token_ids.push(token_id);
        self.positions.insert(token_id, raw);
        self.fees.insert(
            token_id,
            CollectAmounts {
                amount0: fees.0,
                amount1: fees.1,
            },
        );
        self
    }

    #[must_use]
    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance_override = Some(balance);
        self
    }

    #[must_use]
    pub fn failing_balance(mut self, message: impl Into<String>) -> Self {
        self.balance_error = Some(message.into());
        self
    }

    #[must_use]
    pub fn failing_index(mut self, index: usize, message: impl Into<String>) -> Self {
        self.index_errors.insert(index, message.into());
        self
    }

    #[must_use]
    pub fn failing_positions(mut self, token_id: u64, message: impl Into<String>) -> Self {
        self.position_errors.insert(U256::from(token_id), message.into());
        self
    }

    #[must_use]
    pub fn failing_collect(mut self, token_id: u64, message: impl Into<String>) -> Self {
        self.collect_errors.insert(U256::from(token_id), message.into());
        self
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock_calls().clone()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    /// Token IDs passed to simulated collects.
    pub fn collected_token_ids(&self) -> HashSet<U256> {
        self.lock_calls()
            .iter()
            .filter_map(|c| match c {
                MockCall::Collect { token_id, .. } => Some(*token_id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: MockCall) {
        self.lock_calls().push(call);
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<MockCall>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PositionManager for MockPositionManager {
    async fn balance_of(&self, owner: Address) -> Result<U256, ProtocolError> {
        self.record(MockCall::BalanceOf(owner));
        if let Some(message) = &self.balance_error {
            return Err(ProtocolError::Transport(message.clone()));
        }
        Ok(self
            .balance_override
            .unwrap_or_else(|| U256::from(self.token_ids.len())))
    }

    async fn token_of_owner_by_index(
        &self,
        owner: Address,
        index: U256,
    ) -> Result<U256, ProtocolError> {
        self.record(MockCall::TokenOfOwnerByIndex(owner, index));
        let i = usize::try_from(index)
            .map_err(|_| ProtocolError::Transport("index out of range".to_string()))?;
        if let Some(message) = self.index_errors.get(&i) {
            return Err(ProtocolError::Transport(message.clone()));
        }
        self.token_ids
            .get(i)
            .copied()
            .ok_or_else(|| ProtocolError::Transport("ERC721Enumerable: owner index out of bounds".to_string()))
    }

    async fn positions(&self, token_id: U256) -> Result<RawPosition, ProtocolError> {
        self.record(MockCall::Positions(token_id));
        if let Some(message) = self.position_errors.get(&token_id) {
            return Err(ProtocolError::Transport(message.clone()));
        }
        self.positions
            .get(&token_id)
            .cloned()
            .ok_or_else(|| ProtocolError::Transport("Invalid token ID".to_string()))
    }

    async fn simulate_collect(
        &self,
        token_id: U256,
        recipient: Address,
        amount0_max: u128,
        amount1_max: u128,
    ) -> Result<CollectAmounts, ProtocolError> {
        self.record(MockCall::Collect {
            token_id,
            recipient,
            amount0_max,
            amount1_max,
        });
        if let Some(message) = self.collect_errors.get(&token_id) {
            return Err(ProtocolError::Transport(message.clone()));
        }
        self.fees
            .get(&token_id)
            .copied()
            .ok_or_else(|| ProtocolError::Transport("Invalid token ID".to_string()))
    }
}

/// Connector serving [`MockPositionManager`]s keyed by chain.
#[derive(Default)]
pub struct MockConnector {
    managers: HashMap<Chain, Arc<MockPositionManager>>,
    connects: AtomicUsize,
}

impl MockConnector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_chain(mut self, chain: Chain, manager: Arc<MockPositionManager>) -> Self {
        self.managers.insert(chain, manager);
        self
    }

    /// Total RPC calls received by all managers.
    pub fn total_calls(&self) -> usize {
        self.managers.values().map(|m| m.call_count()).sum()
    }

    /// Number of `connect` invocations.
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl PositionManagerConnector for MockConnector {
    fn connect(&self, chain: &ChainConfig) -> Result<Arc<dyn PositionManager>, ProtocolError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.managers
            .get(&chain.id)
            .cloned()
            .map(|m| m as Arc<dyn PositionManager>)
            .ok_or(ProtocolError::UnknownChain(chain.id))
    }
}
