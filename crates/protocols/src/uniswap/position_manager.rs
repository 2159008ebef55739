use super::bindings::INonfungiblePositionManager::{self, INonfungiblePositionManagerInstance};
use crate::error::ProtocolError;
use crate::raw::{CollectAmounts, RawPosition};
use crate::PositionManager;
use alloy::primitives::{Address, U256};
use alloy::providers::DynProvider;
use async_trait::async_trait;
use tracing::trace;

/// Position manager reached through a JSON-RPC provider.
///
/// Every call is an `eth_call`; nothing is signed or broadcast.
#[derive(Clone)]
pub struct AlloyPositionManager {
    contract: INonfungiblePositionManagerInstance<DynProvider>,
}

impl AlloyPositionManager {
    /// Binds the contract at `address` on `provider`.
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self {
            contract: INonfungiblePositionManager::new(address, provider),
        }
    }

    /// Address of the bound contract.
    #[must_use]
    pub fn address(&self) -> Address {
        *self.contract.address()
    }
}

#[async_trait]
impl PositionManager for AlloyPositionManager {
    async fn balance_of(&self, owner: Address) -> Result<U256, ProtocolError> {
        trace!(contract = %self.address(), owner = %owner, "balanceOf");
        Ok(self.contract.balanceOf(owner).call().await?)
    }

    async fn token_of_owner_by_index(
        &self,
        owner: Address,
        index: U256,
    ) -> Result<U256, ProtocolError> {
        trace!(contract = %self.address(), owner = %owner, index = %index, "tokenOfOwnerByIndex");
        Ok(self.contract.tokenOfOwnerByIndex(owner, index).call().await?)
    }

    async fn positions(&self, token_id: U256) -> Result<RawPosition, ProtocolError> {
        trace!(contract = %self.address(), token_id = %token_id, "positions");
        let ret = self.contract.positions(token_id).call().await?;

        Ok(RawPosition {
            nonce: u128::try_from(ret.nonce)
                .map_err(|_| ProtocolError::Decode(format!("nonce of token {token_id}")))?,
            operator: ret.operator,
            token0: ret.token0,
            token1: ret.token1,
            fee: u32::try_from(ret.fee)
                .map_err(|_| ProtocolError::Decode(format!("fee of token {token_id}")))?,
            tick_lower: i32::try_from(ret.tickLower)
                .map_err(|_| ProtocolError::Decode(format!("tickLower of token {token_id}")))?,
            tick_upper: i32::try_from(ret.tickUpper)
                .map_err(|_| ProtocolError::Decode(format!("tickUpper of token {token_id}")))?,
            liquidity: ret.liquidity,
            fee_growth_inside0_last_x128: ret.feeGrowthInside0LastX128,
            fee_growth_inside1_last_x128: ret.feeGrowthInside1LastX128,
            tokens_owed0: ret.tokensOwed0,
            tokens_owed1: ret.tokensOwed1,
        })
    }

    async fn simulate_collect(
        &self,
        token_id: U256,
        recipient: Address,
        amount0_max: u128,
        amount1_max: u128,
    ) -> Result<CollectAmounts, ProtocolError> {
        trace!(contract = %self.address(), token_id = %token_id, "collect (eth_call)");
        let params = INonfungiblePositionManager::CollectParams {
            tokenId: token_id,
            recipient,
            amount0Max: amount0_max,
            amount1Max: amount1_max,
        };

        // collect is gated on owner/operator, so the call is made from the recipient.
        let ret = self
            .contract
            .collect(params)
            .from(recipient)
            .call()
            .await?;

        CollectAmounts::from_u256(ret.amount0, ret.amount1)
    }
}
