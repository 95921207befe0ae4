use alloy_primitives::{Address, U256, address};
use alloy_sol_types::{SolCall, sol};
use async_trait::async_trait;

use super::{QuoteContext, QuoteStrategy};
use crate::error::SimError;
use crate::registry::ChainId;

sol! {
    function getSwapAmount(uint256 bTokenIdxIn, uint256 bTokenIdxOut, uint256 bTokenInAmount) external view returns (uint256 swapAmount);
}

// Smoothy does not expose a token-index lookup, so the deployed pool layouts
// are fixed tables here.
const ETHEREUM_INDICES: [(Address, u64); 6] = [
    (address!("dac17f958d2ee523a2206206994597c13d831ec7"), 0), // USDT
    (address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"), 1), // USDC
    (address!("6b175474e89094c44da98b954eedeac495271d0f"), 2), // DAI
    (address!("0000000000085d4780b73119b644ae5ecd22b376"), 3), // TUSD
    (address!("57ab1ec28d129707052df4df418d58a2d46d5f51"), 4), // sUSD
    (address!("4fabb145d64652a948d72533023f6e7a623c7c53"), 5), // BUSD
];

const BSC_INDICES: [(Address, u64); 6] = [
    (address!("e9e7cea3dedca5984780bafc599bd69add087d56"), 0), // BUSD
    (address!("55d398326f99059ff775485246999027b3197955"), 1), // USDT
    (address!("8ac76a51cc950d9822d68b83fe1ad97b32cd580d"), 2), // USDC
    (address!("1af3f329e8be154074d8769d1ffa4ee058b1dbc3"), 3), // DAI
    (address!("b7f8cd00c5a06c0537e2abff0b58033d02e5e094"), 4), // PAX
    (address!("23396cf899ca06c4472205fc903bdb4de249d6fc"), 5), // UST
];

/// Smoothy stableswap. The pool is quoted by token index like the Saddle
/// family, but indices come from the static per-chain tables above instead
/// of an on-pool lookup.
pub struct IndexedStableswap;

impl IndexedStableswap {
    fn token_index(
        ctx: &QuoteContext<'_>,
        pool: Address,
        token: Address,
    ) -> Result<U256, SimError> {
        let table: &[(Address, u64)] = match ctx.chain {
            ChainId::Ethereum => &ETHEREUM_INDICES,
            ChainId::Bsc => &BSC_INDICES,
            _ => {
                return Err(SimError::UnsupportedChain {
                    chain: ctx.chain,
                    missing: "Smoothy token indices".to_string(),
                });
            }
        };
        table
            .iter()
            .find(|(addr, _)| *addr == token)
            .map(|(_, idx)| U256::from(*idx))
            .ok_or(SimError::TokenNotInPool { token, pool })
    }
}

#[async_trait]
impl QuoteStrategy for IndexedStableswap {
    async fn quote(&self, ctx: &QuoteContext<'_>) -> Result<U256, SimError> {
        let pool = ctx.pool()?;
        let call = getSwapAmountCall {
            bTokenIdxIn: Self::token_index(ctx, pool, ctx.input_token)?,
            bTokenIdxOut: Self::token_index(ctx, pool, ctx.output_token)?,
            bTokenInAmount: ctx.amount_in,
        };
        let raw = ctx.read(pool, call.abi_encode()).await?;
        Ok(getSwapAmountCall::abi_decode_returns(&raw)?)
    }
}
