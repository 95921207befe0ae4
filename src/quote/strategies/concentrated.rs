use alloy_primitives::{U256, aliases::U160};
use alloy_sol_types::{SolCall, sol};
use async_trait::async_trait;

use super::{QuoteContext, QuoteStrategy};
use crate::error::SimError;

sol! {
    function fee() external view returns (uint24);

    struct QuoteExactInputSingleParams {
        address tokenIn;
        address tokenOut;
        uint256 amountIn;
        uint24 fee;
        uint160 sqrtPriceLimitX96;
    }

    function quoteExactInputSingle(QuoteExactInputSingleParams params)
        external
        returns (uint256 amountOut, uint160 sqrtPriceX96After, uint32 initializedTicksCrossed, uint256 gasEstimate);
}

/// UniswapV3: read the pool's fee tier, then ask the QuoterV2 periphery for
/// a single-hop exact-input quote with no price limit.
pub struct ConcentratedLiquidity;

#[async_trait]
impl QuoteStrategy for ConcentratedLiquidity {
    async fn quote(&self, ctx: &QuoteContext<'_>) -> Result<U256, SimError> {
        let pool = ctx.pool()?;
        let quoter = ctx.registry.v3_quoter(ctx.chain)?;

        let raw = ctx.read(pool, feeCall {}.abi_encode()).await?;
        let fee = feeCall::abi_decode_returns(&raw)?;

        let call = quoteExactInputSingleCall {
            params: QuoteExactInputSingleParams {
                tokenIn: ctx.input_token,
                tokenOut: ctx.output_token,
                amountIn: ctx.amount_in,
                fee,
                sqrtPriceLimitX96: U160::ZERO,
            },
        };
        let raw = ctx.read(quoter, call.abi_encode()).await?;
        let quoted = quoteExactInputSingleCall::abi_decode_returns(&raw)?;
        Ok(quoted.amountOut)
    }
}
