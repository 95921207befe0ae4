use alloy_primitives::U256;
use alloy_sol_types::{SolCall, sol};
use async_trait::async_trait;

use super::{QuoteContext, QuoteStrategy};
use crate::error::SimError;

sol! {
    function get_coin_indices(address pool, address from, address to) external view returns (int128 i, int128 j, bool underlying);
    function get_dy(int128 i, int128 j, uint256 dx) external view returns (uint256);
    function get_dy_underlying(int128 i, int128 j, uint256 dx) external view returns (uint256);
}

/// Curve pools. Metapools do not expose their base pool, so coin indices
/// (and whether the swap runs over underlying coins) come from the chain's
/// meta registry before the pool itself is asked for `get_dy`.
pub struct Metapool;

#[async_trait]
impl QuoteStrategy for Metapool {
    async fn quote(&self, ctx: &QuoteContext<'_>) -> Result<U256, SimError> {
        let pool = ctx.pool()?;
        let meta_registry = ctx.registry.curve_meta_registry(ctx.chain)?;

        let data = get_coin_indicesCall {
            pool,
            from: ctx.input_token,
            to: ctx.output_token,
        }
        .abi_encode();
        let raw = ctx.read(meta_registry, data).await?;
        let indices = get_coin_indicesCall::abi_decode_returns(&raw)?;

        let amount_out = if indices.underlying {
            let data = get_dy_underlyingCall { i: indices.i, j: indices.j, dx: ctx.amount_in }
                .abi_encode();
            let raw = ctx.read(pool, data).await?;
            get_dy_underlyingCall::abi_decode_returns(&raw)?
        } else {
            let data = get_dyCall { i: indices.i, j: indices.j, dx: ctx.amount_in }.abi_encode();
            let raw = ctx.read(pool, data).await?;
            get_dyCall::abi_decode_returns(&raw)?
        };
        Ok(amount_out)
    }
}
