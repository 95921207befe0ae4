use alloy_primitives::{Address, B256, Bytes, U256};
use serde_json::{Value, json};

use super::{
    RpcError, block_tag, bytes_from, hex_str, quantity_u64, quantity_u128, quantity_u256,
    unwrap_envelope,
};

/// Synchronous twin of `HttpRpc`, used by the revm fork backend whose
/// `DatabaseRef` hooks are not async. Runs on `spawn_blocking` threads only.
#[derive(Clone, Debug)]
pub struct BlockingRpc {
    url: String,
    client: reqwest::blocking::Client,
}

impl BlockingRpc {
    pub fn new(url: impl Into<String>) -> Self {
        BlockingRpc { url: url.into(), client: reqwest::blocking::Client::new() }
    }

    fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let body = json!({ "jsonrpc": "2.0", "id": 1, "method": method, "params": params });
        let response: Value = self.client.post(&self.url).json(&body).send()?.json()?;
        unwrap_envelope(response)
    }

    pub fn get_balance(&self, addr: Address, block: Option<u64>) -> Result<U256, RpcError> {
        quantity_u256(&self.request("eth_getBalance", json!([addr, block_tag(block)]))?)
    }

    pub fn get_nonce(&self, addr: Address, block: Option<u64>) -> Result<u64, RpcError> {
        quantity_u64(&self.request("eth_getTransactionCount", json!([addr, block_tag(block)]))?)
    }

    pub fn get_code(&self, addr: Address, block: Option<u64>) -> Result<Bytes, RpcError> {
        bytes_from(&self.request("eth_getCode", json!([addr, block_tag(block)]))?)
    }

    pub fn get_storage_at(
        &self,
        addr: Address,
        slot: U256,
        block: Option<u64>,
    ) -> Result<U256, RpcError> {
        let params = json!([addr, format!("{slot:#x}"), block_tag(block)]);
        quantity_u256(&self.request("eth_getStorageAt", params)?)
    }

    pub fn get_block_hash(&self, block: u64) -> Result<B256, RpcError> {
        let result = self.request("eth_getBlockByNumber", json!([block_tag(Some(block)), false]))?;
        let hash = result
            .get("hash")
            .ok_or_else(|| RpcError::Malformed(format!("block {block} has no hash")))?;
        let raw = hex::decode(hex_str(hash)?.trim_start_matches("0x"))?;
        if raw.len() != 32 {
            return Err(RpcError::Malformed(format!("block hash of {} bytes", raw.len())));
        }
        Ok(B256::from_slice(&raw))
    }

    pub fn block_number(&self) -> Result<u64, RpcError> {
        quantity_u64(&self.request("eth_blockNumber", json!([]))?)
    }

    pub fn block_timestamp(&self, block: u64) -> Result<u64, RpcError> {
        let result = self.request("eth_getBlockByNumber", json!([block_tag(Some(block)), false]))?;
        let ts = result
            .get("timestamp")
            .ok_or_else(|| RpcError::Malformed(format!("block {block} has no timestamp")))?;
        quantity_u64(ts)
    }

    pub fn gas_price(&self) -> Result<u128, RpcError> {
        quantity_u128(&self.request("eth_gasPrice", json!([]))?)
    }
}
