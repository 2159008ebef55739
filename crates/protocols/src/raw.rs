use crate::error::ProtocolError;
use alloy::primitives::{Address, U256};
use lpfolio_domain::{Chain, Position};

/// Fields returned by `positions(tokenId)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPosition {
    pub nonce: u128,
    pub operator: Address,
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    pub fee_growth_inside0_last_x128: U256,
    pub fee_growth_inside1_last_x128: U256,
    pub tokens_owed0: u128,
    pub tokens_owed1: u128,
}

impl RawPosition {
    /// Builds the client-facing position, without fees.
    #[must_use]
    pub fn into_position(self, token_id: U256, chain: Chain) -> Position {
        Position {
            token_id: to_domain_u256(token_id),
            chain,
            nonce: self.nonce,
            operator: self.operator.to_checksum(None),
            token0: self.token0.to_checksum(None),
            token1: self.token1.to_checksum(None),
            fee_tier: self.fee,
            tick_lower: self.tick_lower,
            tick_upper: self.tick_upper,
            liquidity: self.liquidity,
            fee_growth_inside0_last_x128: to_domain_u256(self.fee_growth_inside0_last_x128),
            fee_growth_inside1_last_x128: to_domain_u256(self.fee_growth_inside1_last_x128),
            tokens_owed0: self.tokens_owed0,
            tokens_owed1: self.tokens_owed1,
            uncollected_fees: None,
        }
    }
}

/// Amounts a simulated `collect` would transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectAmounts {
    pub amount0: u128,
    pub amount1: u128,
}

impl CollectAmounts {
    /// Narrows the contract's `uint256` outputs; `collect` never pays more
    /// than `uint128` per token.
    pub fn from_u256(amount0: U256, amount1: U256) -> Result<Self, ProtocolError> {
        let amount0 = u128::try_from(amount0)
            .map_err(|_| ProtocolError::Decode(format!("collect amount0 {amount0}")))?;
        let amount1 = u128::try_from(amount1)
            .map_err(|_| ProtocolError::Decode(format!("collect amount1 {amount1}")))?;
        Ok(Self { amount0, amount1 })
    }
}

/// Converts an alloy `U256` into the domain representation.
#[must_use]
pub fn to_domain_u256(value: U256) -> primitive_types::U256 {
    primitive_types::U256::from_big_endian(&value.to_be_bytes::<32>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_to_domain_u256() {
        assert_eq!(to_domain_u256(U256::ZERO), primitive_types::U256::zero());
        assert_eq!(
            to_domain_u256(U256::from(123_456_789u64)),
            primitive_types::U256::from(123_456_789u64)
        );
        assert_eq!(to_domain_u256(U256::MAX), primitive_types::U256::MAX);
    }

    #[test]
    fn test_collect_amounts_narrowing() {
        let amounts = CollectAmounts::from_u256(U256::from(u128::MAX), U256::from(5u8)).unwrap();
        assert_eq!(amounts.amount0, u128::MAX);
        assert_eq!(amounts.amount1, 5);

        let overflow = CollectAmounts::from_u256(U256::from(u128::MAX) + U256::from(1u8), U256::ZERO);
        assert!(matches!(overflow, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_into_position_checksums_addresses() {
        let raw = RawPosition {
            nonce: 3,
            operator: Address::ZERO,
            token0: address!("0x82af49447d8a07e3bd95bd0d56f35241523fbab1"),
            token1: address!("0xaf88d065e77c8cc2239327c5edb3a432268e5831"),
            fee: 3000,
            tick_lower: -60,
            tick_upper: 60,
            liquidity: 10,
            fee_growth_inside0_last_x128: U256::from(1u8),
            fee_growth_inside1_last_x128: U256::from(2u8),
            tokens_owed0: 0,
            tokens_owed1: 4,
        };

        let position = raw.into_position(U256::from(77u8), Chain::Arbitrum);
        assert_eq!(position.token_id, primitive_types::U256::from(77u8));
        assert_eq!(position.chain, Chain::Arbitrum);
        assert_eq!(position.token0, "0x82aF49447D8a07e3bd95BD0d56f35241523fBab1");
        assert_eq!(position.token1, "0xaf88d065e77c8cC2239327C5EDb3A432268e5831");
        assert_eq!(position.fee_tier, 3000);
        assert_eq!(position.tokens_owed1, 4);
        assert!(position.uncollected_fees.is_none());
    }
}
