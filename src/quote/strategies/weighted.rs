use alloy_primitives::{Address, U256};
use alloy_sol_types::{SolCall, SolValue, sol};
use async_trait::async_trait;

use super::{QuoteContext, QuoteStrategy};
use crate::error::SimError;

sol! {
    function getBalance(address token) external view returns (uint256);
    function getDenormalizedWeight(address token) external view returns (uint256);
    function getSwapFee() external view returns (uint256);
    function calcOutGivenIn(
        uint256 tokenBalanceIn,
        uint256 tokenWeightIn,
        uint256 tokenBalanceOut,
        uint256 tokenWeightOut,
        uint256 tokenAmountIn,
        uint256 swapFee
    ) external pure returns (uint256 tokenAmountOut);
}

/// Balancer V1 weighted pools. The five pool parameters are read
/// concurrently at the pinned block, then fed back into the pool's own
/// `calcOutGivenIn` so the pool's math is never reimplemented here.
pub struct WeightedPool;

impl WeightedPool {
    async fn read_u256(
        &self,
        ctx: &QuoteContext<'_>,
        pool: Address,
        data: Vec<u8>,
    ) -> Result<U256, SimError> {
        let raw = ctx.read(pool, data).await?;
        Ok(U256::abi_decode(&raw)?)
    }
}

#[async_trait]
impl QuoteStrategy for WeightedPool {
    async fn quote(&self, ctx: &QuoteContext<'_>) -> Result<U256, SimError> {
        let pool = ctx.pool()?;
        let (balance_in, weight_in, balance_out, weight_out, swap_fee) = tokio::try_join!(
            self.read_u256(ctx, pool, getBalanceCall { token: ctx.input_token }.abi_encode()),
            self.read_u256(
                ctx,
                pool,
                getDenormalizedWeightCall { token: ctx.input_token }.abi_encode()
            ),
            self.read_u256(ctx, pool, getBalanceCall { token: ctx.output_token }.abi_encode()),
            self.read_u256(
                ctx,
                pool,
                getDenormalizedWeightCall { token: ctx.output_token }.abi_encode()
            ),
            self.read_u256(ctx, pool, getSwapFeeCall {}.abi_encode()),
        )?;

        let call = calcOutGivenInCall {
            tokenBalanceIn: balance_in,
            tokenWeightIn: weight_in,
            tokenBalanceOut: balance_out,
            tokenWeightOut: weight_out,
            tokenAmountIn: ctx.amount_in,
            swapFee: swap_fee,
        };
        let raw = ctx.read(pool, call.abi_encode()).await?;
        Ok(calcOutGivenInCall::abi_decode_returns(&raw)?)
    }
}
