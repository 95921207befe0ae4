use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use super::{
    ChainReader, RpcError, block_tag, bytes_from, quantity_u64, quantity_u128, quantity_u256,
    unwrap_envelope,
};

/// Async JSON-RPC client for quote-path reads.
#[derive(Clone, Debug)]
pub struct HttpRpc {
    url: String,
    client: reqwest::Client,
}

impl HttpRpc {
    pub fn new(url: impl Into<String>) -> Self {
        HttpRpc { url: url.into(), client: reqwest::Client::new() }
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let body = json!({ "jsonrpc": "2.0", "id": 1, "method": method, "params": params });
        debug!(method, "rpc request");
        let response: Value = self.client.post(&self.url).json(&body).send().await?.json().await?;
        unwrap_envelope(response)
    }
}

#[async_trait]
impl ChainReader for HttpRpc {
    async fn call(&self, to: Address, data: Bytes, block: Option<u64>) -> Result<Bytes, RpcError> {
        let params = json!([
            { "to": to, "data": format!("0x{}", hex::encode(&data)) },
            block_tag(block),
        ]);
        let result = self.request("eth_call", params).await?;
        bytes_from(&result)
    }

    async fn get_balance(&self, addr: Address, block: Option<u64>) -> Result<U256, RpcError> {
        let result = self.request("eth_getBalance", json!([addr, block_tag(block)])).await?;
        quantity_u256(&result)
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        let result = self.request("eth_blockNumber", json!([])).await?;
        quantity_u64(&result)
    }

    async fn block_timestamp(&self, block: u64) -> Result<u64, RpcError> {
        let result =
            self.request("eth_getBlockByNumber", json!([block_tag(Some(block)), false])).await?;
        let ts = result
            .get("timestamp")
            .ok_or_else(|| RpcError::Malformed(format!("block {block} has no timestamp")))?;
        quantity_u64(ts)
    }

    async fn gas_price(&self) -> Result<u128, RpcError> {
        let result = self.request("eth_gasPrice", json!([])).await?;
        quantity_u128(&result)
    }
}
