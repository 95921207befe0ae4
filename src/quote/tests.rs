use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy_primitives::{Address, B256, Bytes, I256, U256, address};
use alloy_sol_types::{SolCall, SolValue, sol};
use async_trait::async_trait;
use lazy_static::lazy_static;

use super::*;
use crate::error::SimError;
use crate::registry::{ChainId, Registry};
use crate::rpc::{ChainReader, RpcError};

lazy_static! {
    static ref REGISTRY: Arc<Registry> = Registry::mainnet();
}

// Independent re-declarations of the venue interfaces, so the expected
// calldata in assertions is not produced by the code under test.
sol! {
    function getAmountsOut(uint256 amountIn, address[] path) external view returns (uint256[] amounts);
    function _BASE_TOKEN_() external view returns (address);
    function _QUOTE_TOKEN_() external view returns (address);
    function querySellBase(address trader, uint256 payBaseAmount) external view returns (uint256 receiveQuoteAmount, uint256 mtFee);
    function getPoolId() external view returns (bytes32);
    function getTokenIndex(address tokenAddress) external view returns (uint8);
    function calculateSwap(uint8 tokenIndexFrom, uint8 tokenIndexTo, uint256 dx) external view returns (uint256);
    function getSwapOutput(address input, address output, uint256 inputQuantity) external view returns (uint256);
    function getSwapAmount(uint256 bTokenIdxIn, uint256 bTokenIdxOut, uint256 bTokenInAmount) external view returns (uint256);
}

struct RecordedCall {
    to: Address,
    data: Bytes,
    block: Option<u64>,
}

/// Scripted reader: responses are queued per function selector, every call
/// and head query is recorded.
struct MockReader {
    head: u64,
    head_queries: AtomicUsize,
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<HashMap<[u8; 4], VecDeque<Result<Bytes, RpcError>>>>,
}

impl MockReader {
    fn new(head: u64) -> Self {
        MockReader {
            head,
            head_queries: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            responses: Mutex::new(HashMap::new()),
        }
    }

    fn script(&self, selector: [u8; 4], response: Result<Vec<u8>, RpcError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(selector)
            .or_default()
            .push_back(response.map(Bytes::from));
    }

    fn revert() -> RpcError {
        RpcError::Node { code: 3, message: "execution reverted".into(), data: None }
    }

    fn recorded(&self) -> Vec<(Address, Bytes, Option<u64>)> {
        self.calls.lock().unwrap().iter().map(|c| (c.to, c.data.clone(), c.block)).collect()
    }
}

#[async_trait]
impl ChainReader for MockReader {
    async fn call(&self, to: Address, data: Bytes, block: Option<u64>) -> Result<Bytes, RpcError> {
        self.calls.lock().unwrap().push(RecordedCall { to, data: data.clone(), block });
        let selector: [u8; 4] = data[..4].try_into().unwrap();
        self.responses
            .lock()
            .unwrap()
            .get_mut(&selector)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(RpcError::Malformed(format!("unscripted selector {:?}", &data[..4])))
            })
    }

    async fn get_balance(&self, _addr: Address, _block: Option<u64>) -> Result<U256, RpcError> {
        Ok(U256::ZERO)
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        self.head_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.head)
    }

    async fn block_timestamp(&self, _block: u64) -> Result<u64, RpcError> {
        Ok(1_700_000_000)
    }

    async fn gas_price(&self) -> Result<u128, RpcError> {
        Ok(30_000_000_000)
    }
}

fn usdc_to_weth(registry: &Registry) -> (Address, Address) {
    let usdc = registry.token(ChainId::Ethereum, "USDC").unwrap().address;
    let weth = registry.token(ChainId::Ethereum, "WETH").unwrap().address;
    (usdc, weth)
}

#[tokio::test]
async fn test_unpinned_quote_resolves_head_once_and_pins_every_read() {
    let quoter = Quoter::new(REGISTRY.clone());
    let (usdc, weth) = usdc_to_weth(&REGISTRY);

    let reader = MockReader::new(17_123_456);
    let amounts: Vec<U256> = vec![U256::from(1_000_000_000u64), U256::from(123u64)];
    reader.script(getAmountsOutCall::SELECTOR, Ok(amounts.abi_encode()));

    let request = QuoteRequest {
        chain: ChainId::Ethereum,
        venue: Venue::UniswapV2,
        input_token: usdc,
        output_token: weth,
        amount_in: U256::from(1_000_000_000u64),
        pool: None,
        block: None,
    };
    let result = quoter.quote_with(&reader, &request).await.unwrap();

    assert_eq!(reader.head_queries.load(Ordering::SeqCst), 1);
    assert_eq!(result.block, 17_123_456);
    for (_, _, block) in reader.recorded() {
        assert_eq!(block, Some(17_123_456));
    }
}

#[tokio::test]
async fn test_constant_product_calldata_and_last_element_output() {
    let quoter = Quoter::new(REGISTRY.clone());
    let (usdc, weth) = usdc_to_weth(&REGISTRY);
    let amount_in = U256::from(2_500_000_000u64);

    let reader = MockReader::new(17_000_000);
    let expected_out = U256::from(987_654_321u64);
    let amounts: Vec<U256> = vec![amount_in, expected_out];
    reader.script(getAmountsOutCall::SELECTOR, Ok(amounts.abi_encode()));

    let request = QuoteRequest {
        chain: ChainId::Ethereum,
        venue: Venue::UniswapV2,
        input_token: usdc,
        output_token: weth,
        amount_in,
        pool: None,
        block: Some(17_000_000),
    };
    let result = quoter.quote_with(&reader, &request).await.unwrap();

    assert_eq!(result.amount_out, expected_out);
    assert_eq!(result.venue_name, "UniswapV2");
    // No head query needed for a pinned request.
    assert_eq!(reader.head_queries.load(Ordering::SeqCst), 0);

    let calls = reader.recorded();
    assert_eq!(calls.len(), 1);
    let (to, data, _) = &calls[0];
    assert_eq!(*to, REGISTRY.router(ChainId::Ethereum, Venue::UniswapV2).unwrap());
    let expected = getAmountsOutCall { amountIn: amount_in, path: vec![usdc, weth] }.abi_encode();
    assert_eq!(data.as_ref(), expected.as_slice());
}

#[tokio::test]
async fn test_pinned_quote_is_idempotent() {
    let quoter = Quoter::new(REGISTRY.clone());
    let (usdc, weth) = usdc_to_weth(&REGISTRY);

    let request = QuoteRequest {
        chain: ChainId::Ethereum,
        venue: Venue::SushiSwap,
        input_token: usdc,
        output_token: weth,
        amount_in: U256::from(42u64),
        pool: None,
        block: Some(16_900_000),
    };

    let mut outputs = Vec::new();
    for _ in 0..2 {
        let reader = MockReader::new(17_000_000);
        let amounts: Vec<U256> = vec![U256::from(42u64), U256::from(7u64)];
        reader.script(getAmountsOutCall::SELECTOR, Ok(amounts.abi_encode()));
        outputs.push(quoter.quote_with(&reader, &request).await.unwrap());
    }
    assert_eq!(outputs[0].amount_out, outputs[1].amount_out);
    assert_eq!(outputs[0].block, outputs[1].block);
}

#[tokio::test]
async fn test_pool_required_venue_without_pool_is_rejected_before_any_read() {
    let quoter = Quoter::new(REGISTRY.clone());
    let (usdc, weth) = usdc_to_weth(&REGISTRY);

    let reader = MockReader::new(17_000_000);
    let request = QuoteRequest {
        chain: ChainId::Ethereum,
        venue: Venue::UniswapV3,
        input_token: usdc,
        output_token: weth,
        amount_in: U256::from(1u64),
        pool: None,
        block: None,
    };
    match quoter.quote_with(&reader, &request).await {
        Err(SimError::MissingPoolAddress(venue)) => assert_eq!(venue, Venue::UniswapV3),
        other => panic!("expected MissingPoolAddress, got {other:?}"),
    }
    assert!(reader.recorded().is_empty());
    assert_eq!(reader.head_queries.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_router_missing_on_chain_maps_to_unsupported_chain() {
    let quoter = Quoter::new(REGISTRY.clone());
    let (usdc, weth) = usdc_to_weth(&REGISTRY);

    let reader = MockReader::new(100);
    let request = QuoteRequest {
        chain: ChainId::Optimism,
        venue: Venue::UniswapV2,
        input_token: usdc,
        output_token: weth,
        amount_in: U256::from(1u64),
        pool: None,
        block: Some(100),
    };
    match quoter.quote_with(&reader, &request).await {
        Err(SimError::UnsupportedChain { chain, .. }) => assert_eq!(chain, ChainId::Optimism),
        other => panic!("expected UnsupportedChain, got {other:?}"),
    }
}

#[tokio::test]
async fn test_pmm_fallback_after_double_revert_is_token_not_in_pool() {
    let quoter = Quoter::new(REGISTRY.clone());
    let (usdc, weth) = usdc_to_weth(&REGISTRY);
    let pool = address!("3058EF90929cb8180174D74C507176ccA6835D73");

    let reader = MockReader::new(17_000_000);
    reader.script(_BASE_TOKEN_Call::SELECTOR, Ok(usdc.abi_encode()));
    reader.script(_QUOTE_TOKEN_Call::SELECTOR, Ok(weth.abi_encode()));
    // Both return shapes share the querySellBase selector.
    reader.script(querySellBaseCall::SELECTOR, Err(MockReader::revert()));
    reader.script(querySellBaseCall::SELECTOR, Err(MockReader::revert()));

    let request = QuoteRequest {
        chain: ChainId::Ethereum,
        venue: Venue::DodoV2,
        input_token: usdc,
        output_token: weth,
        amount_in: U256::from(5u64),
        pool: Some(pool),
        block: Some(17_000_000),
    };
    match quoter.quote_with(&reader, &request).await {
        Err(SimError::TokenNotInPool { token, pool: p }) => {
            assert_eq!(token, usdc);
            assert_eq!(p, pool);
        }
        other => panic!("expected TokenNotInPool, got {other:?}"),
    }
    // Two token reads plus both querySell attempts.
    assert_eq!(reader.recorded().len(), 4);
}

#[tokio::test]
async fn test_pmm_zero_result_does_not_trigger_fallback() {
    let quoter = Quoter::new(REGISTRY.clone());
    let (usdc, weth) = usdc_to_weth(&REGISTRY);
    let pool = address!("3058EF90929cb8180174D74C507176ccA6835D73");

    let reader = MockReader::new(17_000_000);
    reader.script(_BASE_TOKEN_Call::SELECTOR, Ok(usdc.abi_encode()));
    reader.script(_QUOTE_TOKEN_Call::SELECTOR, Ok(weth.abi_encode()));
    reader.script(querySellBaseCall::SELECTOR, Ok((U256::ZERO, U256::ZERO).abi_encode()));

    let request = QuoteRequest {
        chain: ChainId::Ethereum,
        venue: Venue::DodoV2,
        input_token: usdc,
        output_token: weth,
        amount_in: U256::from(5u64),
        pool: Some(pool),
        block: Some(17_000_000),
    };
    let result = quoter.quote_with(&reader, &request).await.unwrap();
    assert_eq!(result.amount_out, U256::ZERO);
    assert_eq!(reader.recorded().len(), 3);
}

#[tokio::test]
async fn test_pmm_non_execution_failure_propagates_without_fallback() {
    let quoter = Quoter::new(REGISTRY.clone());
    let (usdc, weth) = usdc_to_weth(&REGISTRY);
    let pool = address!("3058EF90929cb8180174D74C507176ccA6835D73");

    let reader = MockReader::new(17_000_000);
    reader.script(_BASE_TOKEN_Call::SELECTOR, Ok(usdc.abi_encode()));
    reader.script(_QUOTE_TOKEN_Call::SELECTOR, Ok(weth.abi_encode()));
    reader.script(querySellBaseCall::SELECTOR, Err(RpcError::Malformed("truncated body".into())));

    let request = QuoteRequest {
        chain: ChainId::Ethereum,
        venue: Venue::DodoV2,
        input_token: usdc,
        output_token: weth,
        amount_in: U256::from(5u64),
        pool: Some(pool),
        block: Some(17_000_000),
    };
    match quoter.quote_with(&reader, &request).await {
        Err(SimError::Rpc(RpcError::Malformed(_))) => {}
        other => panic!("expected the transport-level failure to propagate, got {other:?}"),
    }
    // No second querySell attempt.
    assert_eq!(reader.recorded().len(), 3);
}

#[tokio::test]
async fn test_pmm_input_outside_pool_fails_without_selling() {
    let quoter = Quoter::new(REGISTRY.clone());
    let (usdc, weth) = usdc_to_weth(&REGISTRY);
    let dai = REGISTRY.token(ChainId::Ethereum, "DAI").unwrap().address;
    let pool = address!("3058EF90929cb8180174D74C507176ccA6835D73");

    let reader = MockReader::new(17_000_000);
    reader.script(_BASE_TOKEN_Call::SELECTOR, Ok(usdc.abi_encode()));
    reader.script(_QUOTE_TOKEN_Call::SELECTOR, Ok(weth.abi_encode()));

    let request = QuoteRequest {
        chain: ChainId::Ethereum,
        venue: Venue::DodoV2,
        input_token: dai,
        output_token: weth,
        amount_in: U256::from(5u64),
        pool: Some(pool),
        block: Some(17_000_000),
    };
    match quoter.quote_with(&reader, &request).await {
        Err(SimError::TokenNotInPool { token, .. }) => assert_eq!(token, dai),
        other => panic!("expected TokenNotInPool, got {other:?}"),
    }
    assert_eq!(reader.recorded().len(), 2);
}

#[tokio::test]
async fn test_batch_vault_output_is_negated_second_delta() {
    let quoter = Quoter::new(REGISTRY.clone());
    let (usdc, weth) = usdc_to_weth(&REGISTRY);
    let pool = address!("32296969Ef14EB0c6d29669C550D4a0449130230");

    let reader = MockReader::new(17_000_000);
    reader.script(getPoolIdCall::SELECTOR, Ok(B256::repeat_byte(0xab).abi_encode()));
    let deltas: Vec<I256> =
        vec![I256::try_from(1_000i64).unwrap(), I256::try_from(-900i64).unwrap()];
    // queryBatchSwap selector, taken from the vault ABI.
    let query_batch_swap = [0xf8, 0x4d, 0x06, 0x6e];
    reader.script(query_batch_swap, Ok(deltas.abi_encode()));

    let request = QuoteRequest {
        chain: ChainId::Ethereum,
        venue: Venue::BalancerV2,
        input_token: usdc,
        output_token: weth,
        amount_in: U256::from(1_000u64),
        pool: Some(pool),
        block: Some(17_000_000),
    };
    let result = quoter.quote_with(&reader, &request).await.unwrap();
    assert_eq!(result.amount_out, U256::from(900u64));

    let calls = reader.recorded();
    assert_eq!(calls[1].0, REGISTRY.balancer_vault(ChainId::Ethereum).unwrap());
}

#[tokio::test]
async fn test_masset_pool_rates_the_pair_in_one_call() {
    let quoter = Quoter::new(REGISTRY.clone());
    let (usdc, weth) = usdc_to_weth(&REGISTRY);
    let pool = address!("e2f2a5C287993345a840Db3B0845fbC70f5935a5");

    let reader = MockReader::new(17_000_000);
    reader.script(getSwapOutputCall::SELECTOR, Ok(U256::from(455u64).abi_encode()));

    let request = QuoteRequest {
        chain: ChainId::Ethereum,
        venue: Venue::Mstable,
        input_token: usdc,
        output_token: weth,
        amount_in: U256::from(500u64),
        pool: Some(pool),
        block: Some(17_000_000),
    };
    let result = quoter.quote_with(&reader, &request).await.unwrap();
    assert_eq!(result.amount_out, U256::from(455u64));

    let calls = reader.recorded();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, pool);
    let expected =
        getSwapOutputCall { input: usdc, output: weth, inputQuantity: U256::from(500u64) }
            .abi_encode();
    assert_eq!(calls[0].1.as_ref(), expected.as_slice());
}

#[tokio::test]
async fn test_smoothy_quotes_through_static_token_indices() {
    let quoter = Quoter::new(REGISTRY.clone());
    let usdt = REGISTRY.token(ChainId::Ethereum, "USDT").unwrap().address;
    let usdc = REGISTRY.token(ChainId::Ethereum, "USDC").unwrap().address;
    let pool = address!("e5859f4EFc09027A9B718781DCb2C6910CAc6E91");

    let reader = MockReader::new(17_000_000);
    reader.script(getSwapAmountCall::SELECTOR, Ok(U256::from(777u64).abi_encode()));

    let request = QuoteRequest {
        chain: ChainId::Ethereum,
        venue: Venue::Smoothy,
        input_token: usdt,
        output_token: usdc,
        amount_in: U256::from(1_000u64),
        pool: Some(pool),
        block: Some(17_000_000),
    };
    let result = quoter.quote_with(&reader, &request).await.unwrap();
    assert_eq!(result.amount_out, U256::from(777u64));

    let calls = reader.recorded();
    assert_eq!(calls.len(), 1);
    // USDT is index 0 and USDC index 1 in the deployed Ethereum pool.
    let expected = getSwapAmountCall {
        bTokenIdxIn: U256::ZERO,
        bTokenIdxOut: U256::from(1u64),
        bTokenInAmount: U256::from(1_000u64),
    }
    .abi_encode();
    assert_eq!(calls[0].1.as_ref(), expected.as_slice());
}

#[tokio::test]
async fn test_smoothy_unlisted_token_fails_without_any_read() {
    let quoter = Quoter::new(REGISTRY.clone());
    let (usdc, weth) = usdc_to_weth(&REGISTRY);
    let pool = address!("e5859f4EFc09027A9B718781DCb2C6910CAc6E91");

    let reader = MockReader::new(17_000_000);
    let request = QuoteRequest {
        chain: ChainId::Ethereum,
        venue: Venue::Smoothy,
        input_token: usdc,
        output_token: weth,
        amount_in: U256::from(1u64),
        pool: Some(pool),
        block: Some(17_000_000),
    };
    match quoter.quote_with(&reader, &request).await {
        Err(SimError::TokenNotInPool { token, .. }) => assert_eq!(token, weth),
        other => panic!("expected TokenNotInPool, got {other:?}"),
    }
    assert!(reader.recorded().is_empty());
}

#[tokio::test]
async fn test_stableswap_unknown_token_maps_to_token_not_in_pool() {
    let quoter = Quoter::new(REGISTRY.clone());
    let (usdc, weth) = usdc_to_weth(&REGISTRY);
    let pool = address!("4f6A43Ad7cba042606dECaCA730d4CE0A57ac62e");

    let reader = MockReader::new(17_000_000);
    reader.script(
        getTokenIndexCall::SELECTOR,
        Ok(getTokenIndexCall::abi_encode_returns(&0u8)),
    );
    reader.script(getTokenIndexCall::SELECTOR, Err(MockReader::revert()));

    let request = QuoteRequest {
        chain: ChainId::Ethereum,
        venue: Venue::Saddle,
        input_token: usdc,
        output_token: weth,
        amount_in: U256::from(10u64),
        pool: Some(pool),
        block: Some(17_000_000),
    };
    match quoter.quote_with(&reader, &request).await {
        Err(SimError::TokenNotInPool { token, pool: p }) => {
            assert_eq!(token, weth);
            assert_eq!(p, pool);
        }
        other => panic!("expected TokenNotInPool, got {other:?}"),
    }
}

#[tokio::test]
async fn test_stableswap_quote_uses_resolved_indices() {
    let quoter = Quoter::new(REGISTRY.clone());
    let (usdc, weth) = usdc_to_weth(&REGISTRY);
    let pool = address!("4f6A43Ad7cba042606dECaCA730d4CE0A57ac62e");

    let reader = MockReader::new(17_000_000);
    reader.script(
        getTokenIndexCall::SELECTOR,
        Ok(getTokenIndexCall::abi_encode_returns(&1u8)),
    );
    reader.script(
        getTokenIndexCall::SELECTOR,
        Ok(getTokenIndexCall::abi_encode_returns(&2u8)),
    );
    reader.script(calculateSwapCall::SELECTOR, Ok(U256::from(333u64).abi_encode()));

    let request = QuoteRequest {
        chain: ChainId::Ethereum,
        venue: Venue::Synapse,
        input_token: usdc,
        output_token: weth,
        amount_in: U256::from(10u64),
        pool: Some(pool),
        block: Some(17_000_000),
    };
    let result = quoter.quote_with(&reader, &request).await.unwrap();
    assert_eq!(result.amount_out, U256::from(333u64));

    let calls = reader.recorded();
    let expected =
        calculateSwapCall { tokenIndexFrom: 1, tokenIndexTo: 2, dx: U256::from(10u64) }
            .abi_encode();
    assert_eq!(calls[2].1.as_ref(), expected.as_slice());
}
