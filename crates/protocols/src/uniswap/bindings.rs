pub use nonfungible_position_manager::*;

#[rustfmt::skip]
mod nonfungible_position_manager {
    alloy::sol!(
        #[allow(missing_docs)]
        #[sol(rpc)]
        #[derive(Debug, PartialEq, Eq)]
        interface INonfungiblePositionManager {
            struct CollectParams {
                uint256 tokenId;
                address recipient;
                uint128 amount0Max;
                uint128 amount1Max;
            }

            function balanceOf(address owner) external view returns (uint256 balance);

            function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256 tokenId);

            function positions(uint256 tokenId) external view returns (
                uint96 nonce,
                address operator,
                address token0,
                address token1,
                uint24 fee,
                int24 tickLower,
                int24 tickUpper,
                uint128 liquidity,
                uint256 feeGrowthInside0LastX128,
                uint256 feeGrowthInside1LastX128,
                uint128 tokensOwed0,
                uint128 tokensOwed1
            );

            function collect(CollectParams calldata params) external payable returns (uint256 amount0, uint256 amount1);
        }
    );
}
