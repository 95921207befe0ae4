use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, sol};
use async_trait::async_trait;

use super::{QuoteContext, QuoteStrategy};
use crate::error::SimError;
use crate::rpc::RpcError;

sol! {
    function getPoolId() external view returns (bytes32);

    struct BatchSwapStep {
        bytes32 poolId;
        uint256 assetInIndex;
        uint256 assetOutIndex;
        uint256 amount;
        bytes userData;
    }

    struct FundManagement {
        address sender;
        bool fromInternalBalance;
        address recipient;
        bool toInternalBalance;
    }

    function queryBatchSwap(
        uint8 kind,
        BatchSwapStep[] swaps,
        address[] assets,
        FundManagement funds
    ) external returns (int256[] assetDeltas);
}

const GIVEN_IN: u8 = 0;

/// Balancer V2: resolve the pool's vault id, then `queryBatchSwap` a single
/// GIVEN_IN hop. The vault reports per-asset deltas from its own viewpoint,
/// so the trader's output is the negated second entry.
pub struct BatchSwapVault;

#[async_trait]
impl QuoteStrategy for BatchSwapVault {
    async fn quote(&self, ctx: &QuoteContext<'_>) -> Result<U256, SimError> {
        let pool = ctx.pool()?;
        let vault = ctx.registry.balancer_vault(ctx.chain)?;

        let raw = ctx.read(pool, getPoolIdCall {}.abi_encode()).await?;
        let pool_id = getPoolIdCall::abi_decode_returns(&raw)?;

        let call = queryBatchSwapCall {
            kind: GIVEN_IN,
            swaps: vec![BatchSwapStep {
                poolId: pool_id,
                assetInIndex: U256::ZERO,
                assetOutIndex: U256::from(1),
                amount: ctx.amount_in,
                userData: Bytes::new(),
            }],
            assets: vec![ctx.input_token, ctx.output_token],
            funds: FundManagement {
                sender: Address::ZERO,
                fromInternalBalance: false,
                recipient: Address::ZERO,
                toInternalBalance: false,
            },
        };
        let raw = ctx.read(vault, call.abi_encode()).await?;
        let deltas = queryBatchSwapCall::abi_decode_returns(&raw)?;
        let out_delta = deltas
            .get(1)
            .copied()
            .ok_or_else(|| RpcError::Malformed("queryBatchSwap returned one delta".into()))?;
        out_delta
            .checked_neg()
            .and_then(|delta| U256::try_from(delta).ok())
            .ok_or_else(|| RpcError::Malformed(format!("vault output delta {out_delta}")).into())
    }
}
