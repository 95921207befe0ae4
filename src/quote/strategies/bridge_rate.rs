use alloy_primitives::U256;
use alloy_sol_types::{SolCall, sol};
use async_trait::async_trait;

use super::{QuoteContext, QuoteStrategy};
use crate::error::SimError;

sol! {
    function conversionPath(address sourceToken, address targetToken) external view returns (address[] path);
    function rateByPath(address[] path, uint256 amount) external view returns (uint256);
}

/// Bancor: let the network contract discover the conversion path between
/// the two tokens, then rate the input amount along it.
pub struct BridgeRate;

#[async_trait]
impl QuoteStrategy for BridgeRate {
    async fn quote(&self, ctx: &QuoteContext<'_>) -> Result<U256, SimError> {
        let network = ctx.registry.bancor_network(ctx.chain)?;

        let data = conversionPathCall {
            sourceToken: ctx.input_token,
            targetToken: ctx.output_token,
        }
        .abi_encode();
        let raw = ctx.read(network, data).await?;
        let path = conversionPathCall::abi_decode_returns(&raw)?;

        let data = rateByPathCall { path, amount: ctx.amount_in }.abi_encode();
        let raw = ctx.read(network, data).await?;
        Ok(rateByPathCall::abi_decode_returns(&raw)?)
    }
}
