use alloy_primitives::{Address, U256};
use alloy_sol_types::{SolCall, sol};
use async_trait::async_trait;

use super::{QuoteContext, QuoteStrategy};
use crate::error::SimError;

sol! {
    function getTokenIndex(address tokenAddress) external view returns (uint8);
    function calculateSwap(uint8 tokenIndexFrom, uint8 tokenIndexTo, uint256 dx) external view returns (uint256);
}

/// Saddle-style stableswap pools. Token indices are resolved on the pool
/// itself; the pool reverts for unknown tokens, which surfaces here as
/// `TokenNotInPool` rather than a bare revert.
pub struct Stableswap;

impl Stableswap {
    async fn token_index(
        &self,
        ctx: &QuoteContext<'_>,
        pool: Address,
        token: Address,
    ) -> Result<u8, SimError> {
        let data = getTokenIndexCall { tokenAddress: token }.abi_encode();
        match ctx.read(pool, data).await {
            Ok(raw) => Ok(getTokenIndexCall::abi_decode_returns(&raw)?),
            Err(SimError::Rpc(e)) if e.is_execution_failure() => {
                Err(SimError::TokenNotInPool { token, pool })
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl QuoteStrategy for Stableswap {
    async fn quote(&self, ctx: &QuoteContext<'_>) -> Result<U256, SimError> {
        let pool = ctx.pool()?;
        let (index_from, index_to) = tokio::try_join!(
            self.token_index(ctx, pool, ctx.input_token),
            self.token_index(ctx, pool, ctx.output_token),
        )?;
        let call = calculateSwapCall {
            tokenIndexFrom: index_from,
            tokenIndexTo: index_to,
            dx: ctx.amount_in,
        };
        let raw = ctx.read(pool, call.abi_encode()).await?;
        Ok(calculateSwapCall::abi_decode_returns(&raw)?)
    }
}
