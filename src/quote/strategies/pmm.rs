use alloy_primitives::{Address, U256};
use alloy_sol_types::{SolCall, sol};
use async_trait::async_trait;
use tracing::debug;

use super::{QuoteContext, QuoteStrategy};
use crate::error::SimError;
use crate::quote::Venue;

sol! {
    function _BASE_TOKEN_() external view returns (address);
    function _QUOTE_TOKEN_() external view returns (address);

    // Classic-pool sell helper
    function querySellBaseToken(address dodo, uint256 amount) external view returns (uint256);
    function querySellQuoteToken(address dodo, uint256 amount) external view returns (uint256);
}

// The two querySell return shapes deployed across DODO V2 pools. Calldata is
// identical; only the return encoding differs.
mod v2 {
    use alloy_sol_types::sol;
    sol! {
        function querySellBase(address trader, uint256 payBaseAmount) external view returns (uint256 receiveQuoteAmount, uint256 mtFee);
        function querySellQuote(address trader, uint256 payQuoteAmount) external view returns (uint256 receiveBaseAmount, uint256 mtFee);
    }
}
mod v2_alt {
    use alloy_sol_types::sol;
    sol! {
        function querySellBase(address trader, uint256 payBaseAmount) external view returns (uint256 receiveQuoteAmount, uint256 mtFee, uint8 newRState, uint256 newBaseTarget);
        function querySellQuote(address trader, uint256 payQuoteAmount) external view returns (uint256 receiveBaseAmount, uint256 mtFee, uint8 newRState, uint256 newQuoteTarget);
    }
}

/// DODO proactive market makers. Classic pools are quoted through the
/// chain's sell helper; V2 pools answer `querySellBase`/`querySellQuote`
/// directly, with a second return-shape attempted when the first rejects.
/// Transport failures never trigger the fallback.
pub struct Pmm;

impl Pmm {
    /// Rejections a different pool revision could explain: the call executed
    /// and reverted, or the answer did not decode under the tried shape.
    fn is_shape_mismatch(err: &SimError) -> bool {
        matches!(err, SimError::Rpc(rpc) if rpc.is_execution_failure())
            || matches!(err, SimError::AbiDecode(_))
    }

    async fn sell_classic(
        &self,
        ctx: &QuoteContext<'_>,
        pool: Address,
        sell_base: bool,
    ) -> Result<U256, SimError> {
        let helper = ctx.registry.dodo_sell_helper(ctx.chain)?;
        if sell_base {
            let data = querySellBaseTokenCall { dodo: pool, amount: ctx.amount_in }.abi_encode();
            let raw = ctx.read(helper, data).await?;
            Ok(querySellBaseTokenCall::abi_decode_returns(&raw)?)
        } else {
            let data = querySellQuoteTokenCall { dodo: pool, amount: ctx.amount_in }.abi_encode();
            let raw = ctx.read(helper, data).await?;
            Ok(querySellQuoteTokenCall::abi_decode_returns(&raw)?)
        }
    }

    async fn sell_v2_primary(
        &self,
        ctx: &QuoteContext<'_>,
        pool: Address,
        sell_base: bool,
    ) -> Result<U256, SimError> {
        if sell_base {
            let data = v2::querySellBaseCall { trader: Address::ZERO, payBaseAmount: ctx.amount_in }
                .abi_encode();
            let raw = ctx.read(pool, data).await?;
            Ok(v2::querySellBaseCall::abi_decode_returns(&raw)?.receiveQuoteAmount)
        } else {
            let data =
                v2::querySellQuoteCall { trader: Address::ZERO, payQuoteAmount: ctx.amount_in }
                    .abi_encode();
            let raw = ctx.read(pool, data).await?;
            Ok(v2::querySellQuoteCall::abi_decode_returns(&raw)?.receiveBaseAmount)
        }
    }

    async fn sell_v2_alt(
        &self,
        ctx: &QuoteContext<'_>,
        pool: Address,
        sell_base: bool,
    ) -> Result<U256, SimError> {
        if sell_base {
            let data =
                v2_alt::querySellBaseCall { trader: Address::ZERO, payBaseAmount: ctx.amount_in }
                    .abi_encode();
            let raw = ctx.read(pool, data).await?;
            Ok(v2_alt::querySellBaseCall::abi_decode_returns(&raw)?.receiveQuoteAmount)
        } else {
            let data =
                v2_alt::querySellQuoteCall { trader: Address::ZERO, payQuoteAmount: ctx.amount_in }
                    .abi_encode();
            let raw = ctx.read(pool, data).await?;
            Ok(v2_alt::querySellQuoteCall::abi_decode_returns(&raw)?.receiveBaseAmount)
        }
    }

    async fn sell_v2(
        &self,
        ctx: &QuoteContext<'_>,
        pool: Address,
        sell_base: bool,
    ) -> Result<U256, SimError> {
        match self.sell_v2_primary(ctx, pool, sell_base).await {
            Ok(amount) => Ok(amount),
            Err(primary) if Self::is_shape_mismatch(&primary) => {
                debug!(%pool, "primary querySell shape rejected, trying alternate");
                match self.sell_v2_alt(ctx, pool, sell_base).await {
                    Ok(amount) => Ok(amount),
                    Err(alt) if Self::is_shape_mismatch(&alt) => {
                        Err(SimError::TokenNotInPool { token: ctx.input_token, pool })
                    }
                    Err(alt) => Err(alt),
                }
            }
            Err(primary) => Err(primary),
        }
    }
}

#[async_trait]
impl QuoteStrategy for Pmm {
    async fn quote(&self, ctx: &QuoteContext<'_>) -> Result<U256, SimError> {
        let pool = ctx.pool()?;
        let (base_raw, quote_raw) = tokio::try_join!(
            ctx.read(pool, _BASE_TOKEN_Call {}.abi_encode()),
            ctx.read(pool, _QUOTE_TOKEN_Call {}.abi_encode()),
        )?;
        let base = _BASE_TOKEN_Call::abi_decode_returns(&base_raw)?;
        let quote = _QUOTE_TOKEN_Call::abi_decode_returns(&quote_raw)?;

        let sell_base = if ctx.input_token == base {
            true
        } else if ctx.input_token == quote {
            false
        } else {
            return Err(SimError::TokenNotInPool { token: ctx.input_token, pool });
        };

        match ctx.venue {
            Venue::Dodo => self.sell_classic(ctx, pool, sell_base).await,
            _ => self.sell_v2(ctx, pool, sell_base).await,
        }
    }
}
