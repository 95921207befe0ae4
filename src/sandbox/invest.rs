use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::accounting::{self, TokenDelta};
use super::erc20;
use super::executor::Sandbox;
use super::funding::ensure_funded;
use crate::error::SimError;
use crate::registry::{ChainId, NATIVE_TOKEN, Registry, is_native_token};

mod gauge {
    use alloy_sol_types::sol;
    sol! {
        function set_approve_deposit(address addr, bool can_deposit) external;
    }
}

mod nft {
    use alloy_sol_types::sol;
    sol! {
        function approve(address to, uint256 tokenId) external;
    }
}

/// Seed `amount` of `token` into the wallet straight from `holder`, for
/// positions no registry funding source covers (LP shares, gauge tokens).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtraFunding {
    pub token: Address,
    pub amount: U256,
    pub holder: Address,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InvestSimRequest {
    pub chain: ChainId,
    pub input_tokens: Vec<Address>,
    pub input_amounts: Vec<U256>,
    pub output_tokens: Vec<Address>,
    /// Calldata executed against the invest entrance.
    pub calldata: Bytes,
    #[serde(default)]
    pub value: Option<U256>,
    #[serde(default)]
    pub wallet: Option<Address>,
    #[serde(default)]
    pub entrance: Option<Address>,
    #[serde(default)]
    pub approve_proxy: Option<Address>,
    #[serde(default)]
    pub block: Option<u64>,
    /// Fork endpoint override; defaults to the registry's URL for the chain.
    #[serde(default)]
    pub rpc_url: Option<String>,
    /// Gauge granted a `set_approve_deposit` for `adapter` before the invest.
    #[serde(default)]
    pub gauge: Option<Address>,
    #[serde(default)]
    pub adapter: Option<Address>,
    /// Position manager holding `nft_token_ids`; each id is approved to
    /// `adapter` before the invest.
    #[serde(default)]
    pub nft_manager: Option<Address>,
    #[serde(default)]
    pub nft_token_ids: Vec<U256>,
    #[serde(default)]
    pub extra_funding: Vec<ExtraFunding>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InvestSimResult {
    pub inputs: Vec<TokenDelta>,
    /// Per input token, what the wallet paid; same order as `inputs`.
    pub spent: Vec<U256>,
    pub outputs: Vec<TokenDelta>,
    /// Per output token, what the wallet received; same order as `outputs`.
    pub gained: Vec<U256>,
    pub gas_used: u64,
    pub gas_limit: u64,
    pub gas_fee: U256,
    pub block: u64,
}

/// Simulates one invest (deposit/stake) operation in a fresh fork, with
/// arbitrary input and output token arity.
pub async fn simulate_invest(
    registry: Arc<Registry>,
    request: InvestSimRequest,
) -> Result<InvestSimResult, SimError> {
    let url = match &request.rpc_url {
        Some(url) => url.clone(),
        None => registry.rpc_url(request.chain),
    };
    tokio::task::spawn_blocking(move || run_invest(&registry, &url, &request))
        .await
        .map_err(|e| SimError::SimulationExecutionFailure(format!("simulation task: {e}")))?
}

fn run_invest(
    registry: &Registry,
    rpc_url: &str,
    request: &InvestSimRequest,
) -> Result<InvestSimResult, SimError> {
    if request.input_tokens.len() != request.input_amounts.len() {
        return Err(SimError::InvalidRequest(format!(
            "{} input tokens but {} amounts",
            request.input_tokens.len(),
            request.input_amounts.len()
        )));
    }
    if !request.nft_token_ids.is_empty()
        && (request.nft_manager.is_none() || request.adapter.is_none())
    {
        return Err(SimError::InvalidRequest(
            "nft approvals need both a manager and an adapter".to_string(),
        ));
    }
    let defaults = registry.defaults(request.chain)?;
    let wallet = request.wallet.unwrap_or(defaults.wallet);
    let approve_proxy = match request.approve_proxy {
        Some(proxy) => proxy,
        None => registry.approve_proxy(request.chain)?,
    };
    let entrance = request.entrance.or(defaults.invest_entrance).ok_or_else(|| {
        SimError::UnsupportedChain { chain: request.chain, missing: "invest entrance".to_string() }
    })?;

    let mut sandbox = Sandbox::fork(request.chain, rpc_url, request.block)?;
    sandbox.impersonate(wallet);
    run_invest_in(&mut sandbox, registry, request, wallet, approve_proxy, entrance)
}

/// Estimate, fund the native fee, then commit a zero-value call from the
/// wallet. All pre-invest preparation transactions go through here.
fn execute_funded(
    sandbox: &mut Sandbox,
    registry: &Registry,
    wallet: Address,
    to: Address,
    data: Bytes,
) -> Result<(), SimError> {
    let gas = sandbox.estimate_gas(wallet, to, data.clone(), U256::ZERO)?;
    ensure_funded(
        sandbox,
        registry,
        wallet,
        NATIVE_TOKEN,
        accounting::gas_fee(gas, sandbox.gas_price()),
    )?;
    sandbox.execute(wallet, to, data, U256::ZERO, Some(gas))?;
    Ok(())
}

fn run_invest_in(
    sandbox: &mut Sandbox,
    registry: &Registry,
    request: &InvestSimRequest,
    wallet: Address,
    approve_proxy: Address,
    entrance: Address,
) -> Result<InvestSimResult, SimError> {
    // Seed wallet positions from caller-named rich accounts before any
    // approval runs.
    for extra in &request.extra_funding {
        if extra.amount.is_zero() {
            continue;
        }
        sandbox.impersonate(extra.holder);
        if is_native_token(extra.token) {
            sandbox.send_zero_cost(extra.holder, wallet, Bytes::new(), extra.amount)?;
        } else {
            let data = erc20::transferCall { to: wallet, amount: extra.amount }.abi_encode();
            sandbox.send_zero_cost(extra.holder, extra.token, Bytes::from(data), U256::ZERO)?;
        }
    }

    // Gauge deposits need the gauge's blessing for the adapter first.
    if let (Some(gauge_addr), Some(adapter)) = (request.gauge, request.adapter) {
        let data = gauge::set_approve_depositCall { addr: adapter, can_deposit: true }.abi_encode();
        execute_funded(sandbox, registry, wallet, gauge_addr, Bytes::from(data))?;
    }

    // Approve each staked position to the adapter on its manager.
    if !request.nft_token_ids.is_empty() {
        let (manager, adapter) =
            request.nft_manager.zip(request.adapter).ok_or_else(|| {
                SimError::InvalidRequest(
                    "nft approvals need both a manager and an adapter".to_string(),
                )
            })?;
        for &token_id in &request.nft_token_ids {
            let data = nft::approveCall { to: adapter, tokenId: token_id }.abi_encode();
            execute_funded(sandbox, registry, wallet, manager, Bytes::from(data))?;
        }
    }

    // Reset-then-max allowance per input; tokens like USDT revert on a
    // nonzero-to-nonzero approve.
    let entrance_is_router = registry
        .defaults(request.chain)
        .ok()
        .and_then(|d| d.dex_router)
        .is_some_and(|router| router == entrance);
    for (&token, &amount) in request.input_tokens.iter().zip(request.input_amounts.iter()) {
        if amount.is_zero() || is_native_token(token) {
            continue;
        }
        for allowance in [U256::ZERO, U256::MAX] {
            let approve =
                erc20::approveCall { spender: approve_proxy, amount: allowance }.abi_encode();
            execute_funded(sandbox, registry, wallet, token, Bytes::from(approve))?;
        }
        // Router entrances take their inputs by direct transfer rather
        // than pulling through the allowance.
        if entrance_is_router {
            let transfer = erc20::transferCall { to: entrance, amount }.abi_encode();
            execute_funded(sandbox, registry, wallet, token, Bytes::from(transfer))?;
        }
    }

    // The estimate dry run transfers the value too, so cover it before
    // estimating; the fee budget tops up once the limit is known.
    let value = request.value.unwrap_or_default();
    ensure_funded(sandbox, registry, wallet, NATIVE_TOKEN, value)?;
    let gas_limit = sandbox.estimate_gas(wallet, entrance, request.calldata.clone(), value)?;
    let fee_budget = accounting::gas_fee(gas_limit, sandbox.gas_price());
    let required = accounting::native_requirement(value, fee_budget)?;
    ensure_funded(sandbox, registry, wallet, NATIVE_TOKEN, required)?;

    let inputs_before = accounting::snapshot(sandbox, wallet, &request.input_tokens)?;
    let outputs_before = accounting::snapshot(sandbox, wallet, &request.output_tokens)?;
    let execution =
        sandbox.execute(wallet, entrance, request.calldata.clone(), value, Some(gas_limit))?;
    let inputs_after = accounting::snapshot(sandbox, wallet, &request.input_tokens)?;
    let outputs_after = accounting::snapshot(sandbox, wallet, &request.output_tokens)?;

    let inputs = accounting::deltas(&request.input_tokens, &inputs_before, &inputs_after);
    let outputs = accounting::deltas(&request.output_tokens, &outputs_before, &outputs_after);
    let spent = inputs.iter().map(TokenDelta::spent).collect();
    let gained = outputs.iter().map(TokenDelta::gained).collect();
    let gas_fee = accounting::gas_fee(execution.gas_used, execution.effective_gas_price);
    info!(
        chain = %request.chain,
        block = sandbox.block(),
        gas_used = execution.gas_used,
        inputs = request.input_tokens.len(),
        outputs = request.output_tokens.len(),
        "invest simulated"
    );
    Ok(InvestSimResult {
        inputs,
        spent,
        outputs,
        gained,
        gas_used: execution.gas_used,
        gas_limit,
        gas_fee,
        block: sandbox.block(),
    })
}
