use alloy_primitives::U256;
use alloy_sol_types::{SolCall, sol};
use async_trait::async_trait;

use super::{QuoteContext, QuoteStrategy};
use crate::error::SimError;
use crate::quote::Venue;

sol! {
    function getSwapOutput(address input, address output, uint256 inputQuantity) external view returns (uint256 swapOutput);
    function tradeOutputBySourceAmount(address sourceToken, address targetToken, uint256 sourceAmount) external view returns (uint256);
    function viewOriginSwap(address origin, address target, uint256 originAmount) external view returns (uint256 targetAmount);
}

/// Pools that rate the (input, output, amount) triple themselves in a single
/// call; only the function name differs per venue. Covers mStable masset
/// swaps, Bancor V3 trading and Shell origin swaps.
pub struct PoolRate;

#[async_trait]
impl QuoteStrategy for PoolRate {
    async fn quote(&self, ctx: &QuoteContext<'_>) -> Result<U256, SimError> {
        let pool = ctx.pool()?;
        match ctx.venue {
            Venue::Mstable => {
                let data = getSwapOutputCall {
                    input: ctx.input_token,
                    output: ctx.output_token,
                    inputQuantity: ctx.amount_in,
                }
                .abi_encode();
                let raw = ctx.read(pool, data).await?;
                Ok(getSwapOutputCall::abi_decode_returns(&raw)?)
            }
            Venue::BancorV3 => {
                let data = tradeOutputBySourceAmountCall {
                    sourceToken: ctx.input_token,
                    targetToken: ctx.output_token,
                    sourceAmount: ctx.amount_in,
                }
                .abi_encode();
                let raw = ctx.read(pool, data).await?;
                Ok(tradeOutputBySourceAmountCall::abi_decode_returns(&raw)?)
            }
            _ => {
                let data = viewOriginSwapCall {
                    origin: ctx.input_token,
                    target: ctx.output_token,
                    originAmount: ctx.amount_in,
                }
                .abi_encode();
                let raw = ctx.read(pool, data).await?;
                Ok(viewOriginSwapCall::abi_decode_returns(&raw)?)
            }
        }
    }
}
