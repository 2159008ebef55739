//! Liquidity-provider NFT positions as reported to clients.

use crate::chain::Chain;
use crate::serde_helpers::{u128_dec, u256_dec};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Maximum collectable amount (2^128 - 1); asks the position manager for all fees.
pub const FEE_AMOUNT_MAX: u128 = u128::MAX;

/// Fees a position would pay out if collected now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncollectedFees {
    #[serde(with = "u128_dec")]
    pub amount0: u128,
    #[serde(with = "u128_dec")]
    pub amount1: u128,
}

impl UncollectedFees {
    #[must_use]
    pub fn new(amount0: u128, amount1: u128) -> Self {
        Self { amount0, amount1 }
    }
}

/// On-chain state of one position token.
///
/// `uncollected_fees` is set exactly when `liquidity` is non-zero; the
/// aggregator is the only producer and upholds this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(with = "u256_dec")]
    pub token_id: U256,
    pub chain: Chain,
    #[serde(with = "u128_dec")]
    pub nonce: u128,
    pub operator: String,
    pub token0: String,
    pub token1: String,
    /// Pool fee in hundredths of a bip.
    pub fee_tier: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
    #[serde(with = "u128_dec")]
    pub liquidity: u128,
    #[serde(with = "u256_dec")]
    pub fee_growth_inside0_last_x128: U256,
    #[serde(with = "u256_dec")]
    pub fee_growth_inside1_last_x128: U256,
    #[serde(with = "u128_dec")]
    pub tokens_owed0: u128,
    #[serde(with = "u128_dec")]
    pub tokens_owed1: u128,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncollected_fees: Option<UncollectedFees>,
}

impl Position {
    /// Whether the position still holds liquidity.
    #[must_use]
    pub fn has_liquidity(&self) -> bool {
        self.liquidity != 0
    }

    /// Returns the position annotated with simulated fees.
    #[must_use]
    pub fn with_uncollected_fees(mut self, fees: UncollectedFees) -> Self {
        self.uncollected_fees = Some(fees);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(liquidity: u128) -> Position {
        Position {
            token_id: U256::from(4242u64),
            chain: Chain::Arbitrum,
            nonce: 0,
            operator: "0x0000000000000000000000000000000000000000".to_string(),
            token0: "0x82aF49447D8a07e3bd95BD0d56f35241523fBab1".to_string(),
            token1: "0xaf88d065e77c8cC2239327C5EDb3A432268e5831".to_string(),
            fee_tier: 500,
            tick_lower: -201_000,
            tick_upper: -199_000,
            liquidity,
            fee_growth_inside0_last_x128: U256::MAX,
            fee_growth_inside1_last_x128: U256::zero(),
            tokens_owed0: 7,
            tokens_owed1: 0,
            uncollected_fees: None,
        }
    }

    #[test]
    fn test_fee_amount_max_is_2_pow_128_minus_1() {
        assert_eq!(
            FEE_AMOUNT_MAX.to_string(),
            "340282366920938463463374607431768211455"
        );
    }

    #[test]
    fn test_wire_format_of_empty_position() {
        let value = serde_json::to_value(sample(0)).unwrap();
        assert_eq!(value["tokenId"], json!("4242"));
        assert_eq!(value["chain"], json!("Arbitrum"));
        assert_eq!(value["feeTier"], json!(500));
        assert_eq!(value["tickLower"], json!(-201_000));
        assert_eq!(value["liquidity"], json!("0"));
        assert_eq!(value["tokensOwed0"], json!("7"));
        assert_eq!(
            value["feeGrowthInside0LastX128"],
            json!(U256::MAX.to_string())
        );
        assert!(value.get("uncollectedFees").is_none());
    }

    #[test]
    fn test_wire_format_with_fees() {
        let position = sample(u128::MAX).with_uncollected_fees(UncollectedFees::new(u128::MAX, 1));
        assert!(position.has_liquidity());

        let value = serde_json::to_value(&position).unwrap();
        assert_eq!(value["liquidity"], json!(u128::MAX.to_string()));
        assert_eq!(
            value["uncollectedFees"],
            json!({ "amount0": u128::MAX.to_string(), "amount1": "1" })
        );

        let back: Position = serde_json::from_value(value).unwrap();
        assert_eq!(back, position);
    }
}
