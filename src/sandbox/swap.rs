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

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwapSimRequest {
    pub chain: ChainId,
    pub input_token: Address,
    pub output_token: Address,
    pub amount_in: U256,
    /// Aggregator calldata executed against the exchange target.
    pub calldata: Bytes,
    /// Native value sent with the calldata; defaults to `amount_in` for a
    /// native input token, zero otherwise.
    #[serde(default)]
    pub value: Option<U256>,
    #[serde(default)]
    pub wallet: Option<Address>,
    /// Execution target override; defaults to the chain's dex router, or
    /// its bridge router when `bridge` is set.
    #[serde(default)]
    pub exchange: Option<Address>,
    #[serde(default)]
    pub approve_proxy: Option<Address>,
    #[serde(default)]
    pub block: Option<u64>,
    #[serde(default)]
    pub bridge: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwapSimResult {
    pub input: TokenDelta,
    pub output: TokenDelta,
    pub gas_used: u64,
    pub gas_limit: u64,
    pub gas_fee: U256,
    pub block: u64,
}

/// Simulates one swap in a fresh fork. The fork lives inside the blocking
/// task and is dropped on every exit path, including cancellation of the
/// awaiting future.
pub async fn simulate_swap(
    registry: Arc<Registry>,
    request: SwapSimRequest,
) -> Result<SwapSimResult, SimError> {
    let url = registry.rpc_url(request.chain);
    tokio::task::spawn_blocking(move || run_swap(&registry, &url, &request))
        .await
        .map_err(|e| SimError::SimulationExecutionFailure(format!("simulation task: {e}")))?
}

fn run_swap(
    registry: &Registry,
    rpc_url: &str,
    request: &SwapSimRequest,
) -> Result<SwapSimResult, SimError> {
    let defaults = registry.defaults(request.chain)?;
    let wallet = request.wallet.unwrap_or(defaults.wallet);
    let approve_proxy = match request.approve_proxy {
        Some(proxy) => proxy,
        None => registry.approve_proxy(request.chain)?,
    };
    let exchange = match request.exchange {
        Some(target) => target,
        None if request.bridge => registry.bridge_router(request.chain)?,
        None => registry.dex_router(request.chain)?,
    };

    let mut sandbox = Sandbox::fork(request.chain, rpc_url, request.block)?;
    sandbox.impersonate(wallet);
    run_swap_in(&mut sandbox, registry, request, wallet, approve_proxy, exchange)
}

fn run_swap_in(
    sandbox: &mut Sandbox,
    registry: &Registry,
    request: &SwapSimRequest,
    wallet: Address,
    approve_proxy: Address,
    exchange: Address,
) -> Result<SwapSimResult, SimError> {
    let value = request
        .value
        .unwrap_or_else(|| {
            if is_native_token(request.input_token) { request.amount_in } else { U256::ZERO }
        });

    ensure_funded(sandbox, registry, wallet, request.input_token, request.amount_in)?;

    // Non-native inputs are pulled by the aggregator through its approve
    // proxy, so grant it an unlimited allowance first.
    if !is_native_token(request.input_token) && request.amount_in > U256::ZERO {
        let approve =
            Bytes::from(erc20::approveCall { spender: approve_proxy, amount: U256::MAX }.abi_encode());
        let approve_gas =
            sandbox.estimate_gas(wallet, request.input_token, approve.clone(), U256::ZERO)?;
        let approve_fee = accounting::gas_fee(approve_gas, sandbox.gas_price());
        ensure_funded(sandbox, registry, wallet, NATIVE_TOKEN, approve_fee)?;
        sandbox.execute(wallet, request.input_token, approve, U256::ZERO, Some(approve_gas))?;
    }

    // Estimate against post-funding state, then top the wallet up to the
    // full value-plus-fee requirement before the send. The dry run moves
    // the value too, so it must be covered first.
    ensure_funded(sandbox, registry, wallet, NATIVE_TOKEN, value)?;
    let gas_limit = sandbox.estimate_gas(wallet, exchange, request.calldata.clone(), value)?;
    let fee_budget = accounting::gas_fee(gas_limit, sandbox.gas_price());
    let required = accounting::native_requirement(value, fee_budget)?;
    ensure_funded(sandbox, registry, wallet, NATIVE_TOKEN, required)?;

    let tokens = [request.input_token, request.output_token];
    let before = accounting::snapshot(sandbox, wallet, &tokens)?;
    let execution =
        sandbox.execute(wallet, exchange, request.calldata.clone(), value, Some(gas_limit))?;
    let after = accounting::snapshot(sandbox, wallet, &tokens)?;

    let gas_fee = accounting::gas_fee(execution.gas_used, execution.effective_gas_price);
    info!(
        chain = %request.chain,
        block = sandbox.block(),
        gas_used = execution.gas_used,
        "swap simulated"
    );
    Ok(SwapSimResult {
        input: TokenDelta::new(request.input_token, before[0], after[0]),
        output: TokenDelta::new(request.output_token, before[1], after[1]),
        gas_used: execution.gas_used,
        gas_limit,
        gas_fee,
        block: sandbox.block(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eth(n: u64) -> U256 {
        U256::from(n) * U256::from(10).pow(U256::from(18))
    }

    fn native_request(exchange: Address) -> SwapSimRequest {
        SwapSimRequest {
            chain: ChainId::Ethereum,
            input_token: NATIVE_TOKEN,
            output_token: NATIVE_TOKEN,
            amount_in: eth(1),
            calldata: Bytes::new(),
            value: None,
            wallet: None,
            exchange: Some(exchange),
            approve_proxy: None,
            block: None,
            bridge: false,
        }
    }

    #[test]
    fn test_native_swap_flow_accounts_value_and_fee() {
        let registry = Registry::mainnet();
        let exchange = Address::repeat_byte(0x77);
        let request = native_request(exchange);
        let wallet = registry.defaults(ChainId::Ethereum).unwrap().wallet;

        let mut sandbox = Sandbox::offline(ChainId::Ethereum);
        sandbox.seed_system_accounts();
        sandbox.seed_account(wallet, eth(100));
        sandbox.seed_account(exchange, U256::ZERO);
        sandbox.impersonate(wallet);

        let approve_proxy = registry.approve_proxy(ChainId::Ethereum).unwrap();
        let result =
            run_swap_in(&mut sandbox, &registry, &request, wallet, approve_proxy, exchange)
                .unwrap();

        assert_eq!(result.gas_used, 21_000);
        assert_eq!(result.gas_fee, accounting::gas_fee(21_000, sandbox.gas_price()));
        // Wallet paid the 1 native value plus the fee.
        assert_eq!(result.input.spent(), eth(1) + result.gas_fee);
        assert_eq!(result.output.gained(), U256::ZERO);
        assert_eq!(result.block, sandbox.block());
        assert!(result.gas_limit >= result.gas_used);
    }

    #[test]
    fn test_zero_balance_wallet_is_funded_for_value_and_fee() {
        let registry = Registry::mainnet();
        let exchange = Address::repeat_byte(0x77);
        let wallet = Address::repeat_byte(0x33);
        let holder = registry.funding_source(ChainId::Ethereum, NATIVE_TOKEN).unwrap().holder;

        let mut request = native_request(exchange);
        request.wallet = Some(wallet);

        let mut sandbox = Sandbox::offline(ChainId::Ethereum);
        sandbox.seed_system_accounts();
        sandbox.seed_account(wallet, U256::ZERO);
        sandbox.seed_account(holder, eth(100));
        sandbox.seed_account(exchange, U256::ZERO);
        sandbox.impersonate(wallet);

        let approve_proxy = registry.approve_proxy(ChainId::Ethereum).unwrap();
        let result =
            run_swap_in(&mut sandbox, &registry, &request, wallet, approve_proxy, exchange)
                .unwrap();

        // The penniless wallet got the value plus the full fee budget
        // before the send, all of it drawn from the funding source.
        assert_eq!(result.input.spent(), eth(1) + result.gas_fee);
        let fee_budget = accounting::gas_fee(result.gas_limit, sandbox.gas_price());
        assert_eq!(sandbox.native_balance(holder).unwrap(), eth(99) - fee_budget);
        assert_eq!(sandbox.native_balance(wallet).unwrap(), fee_budget - result.gas_fee);
    }

    #[test]
    fn test_missing_dex_router_fails_before_forking() {
        let registry = Registry::mainnet();
        let mut request = native_request(Address::repeat_byte(0x77));
        request.chain = ChainId::Bsc;
        request.exchange = None;
        // Unreachable URL: resolution must fail before any network access.
        match run_swap(&registry, "http://127.0.0.1:1", &request) {
            Err(SimError::UnsupportedChain { chain, .. }) => assert_eq!(chain, ChainId::Bsc),
            other => panic!("expected UnsupportedChain, got {other:?}"),
        }
    }

    #[test]
    fn test_bridge_flag_without_bridge_router_is_unsupported() {
        let registry = Registry::mainnet();
        let mut request = native_request(Address::repeat_byte(0x77));
        request.exchange = None;
        request.bridge = true;
        match run_swap(&registry, "http://127.0.0.1:1", &request) {
            Err(SimError::UnsupportedChain { missing, .. }) => {
                assert!(missing.contains("bridge"), "{missing}")
            }
            other => panic!("expected UnsupportedChain, got {other:?}"),
        }
    }
}
