use alloy_primitives::U256;
use alloy_sol_types::{SolCall, sol};
use async_trait::async_trait;

use super::{QuoteContext, QuoteStrategy};
use crate::error::SimError;
use crate::rpc::RpcError;

sol! {
    function getAmountsOut(uint256 amountIn, address[] path) external view returns (uint256[] amounts);
}

/// xy=k routers: single-hop `getAmountsOut`, last element of the returned
/// amounts vector. The router address comes from the per-(chain, venue)
/// registry table.
pub struct ConstantProductRouter;

#[async_trait]
impl QuoteStrategy for ConstantProductRouter {
    async fn quote(&self, ctx: &QuoteContext<'_>) -> Result<U256, SimError> {
        let router = ctx.registry.router(ctx.chain, ctx.venue)?;
        let call = getAmountsOutCall {
            amountIn: ctx.amount_in,
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
