use alloy_primitives::U256;
use alloy_sol_types::{SolCall, sol};
use async_trait::async_trait;

use super::{QuoteContext, QuoteStrategy};
use crate::error::SimError;
use crate::rpc::RpcError;

sol! {
    function getAmountsOut(uint256 amountIn, address[] poolsPath, address[] path) external view returns (uint256[] amounts);
}

/// Kyber-style DMM routers: like the constant-product path but the hop's
/// pool is named explicitly alongside the token path.
pub struct DmmRouter;

#[async_trait]
impl QuoteStrategy for DmmRouter {
    async fn quote(&self, ctx: &QuoteContext<'_>) -> Result<U256, SimError> {
        let router = ctx.registry.router(ctx.chain, ctx.venue)?;
        let pool = ctx.pool()?;
        let call = getAmountsOutCall {
            amountIn: ctx.amount_in,
            poolsPath: vec![pool],
            path: vec![ctx.input_token, ctx.output_token],
        };
        let raw = ctx.read(router, call.abi_encode()).await?;
        let amounts = getAmountsOutCall::abi_decode_returns(&raw)?;
        amounts
            .last()
            .copied()
            .ok_or_else(|| RpcError::Malformed("getAmountsOut returned no amounts".into()).into())
    }
}
