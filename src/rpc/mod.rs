//! Pinned-block chain reads over plain JSON-RPC.

use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use serde_json::Value;

mod blocking;
mod client;

pub use blocking::BlockingRpc;
pub use client::HttpRpc;

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("rpc transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The node evaluated the request and rejected it (reverts land here,
    /// with the return data preserved in `data`).
    #[error("rpc node error {code}: {message}")]
    Node { code: i64, message: String, data: Option<String> },
    #[error("malformed rpc response: {0}")]
    Malformed(String),
    #[error("hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl RpcError {
    /// True for failures the node itself evaluated, i.e. an `eth_call` that
    /// executed and reverted. Transport and envelope problems are not
    /// execution failures and must never be treated as one.
    pub fn is_execution_failure(&self) -> bool {
        matches!(self, RpcError::Node { .. })
    }
}

/// Read-only chain access at an explicit block height. `block: None` means
/// the node's head; callers wanting consistency resolve the head once via
/// `block_number` and pin every later read to it.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn call(&self, to: Address, data: Bytes, block: Option<u64>) -> Result<Bytes, RpcError>;
    async fn get_balance(&self, addr: Address, block: Option<u64>) -> Result<U256, RpcError>;
    async fn block_number(&self) -> Result<u64, RpcError>;
    async fn block_timestamp(&self, block: u64) -> Result<u64, RpcError>;
    async fn gas_price(&self) -> Result<u128, RpcError>;
}

pub(crate) fn block_tag(block: Option<u64>) -> Value {
    match block {
        Some(n) => Value::String(format!("{n:#x}")),
        None => Value::String("latest".to_string()),
    }
}

/// Unwraps a JSON-RPC envelope, mapping its `error` member to `RpcError::Node`.
pub(crate) fn unwrap_envelope(body: Value) -> Result<Value, RpcError> {
    if let Some(err) = body.get("error") {
        let code = err.get("code").and_then(Value::as_i64).unwrap_or(0);
        let message =
            err.get("message").and_then(Value::as_str).unwrap_or("unknown error").to_string();
        let data = err.get("data").map(|d| d.to_string());
        return Err(RpcError::Node { code, message, data });
    }
    body.get("result")
        .cloned()
        .ok_or_else(|| RpcError::Malformed("missing result member".to_string()))
}

pub(crate) fn hex_str(value: &Value) -> Result<&str, RpcError> {
    value
        .as_str()
        .ok_or_else(|| RpcError::Malformed(format!("expected hex string, got {value}")))
}

pub(crate) fn bytes_from(value: &Value) -> Result<Bytes, RpcError> {
    let s = hex_str(value)?;
    Ok(Bytes::from(hex::decode(s.trim_start_matches("0x"))?))
}

pub(crate) fn quantity_u64(value: &Value) -> Result<u64, RpcError> {
    let s = hex_str(value)?;
    u64::from_str_radix(s.trim_start_matches("0x"), 16)
        .map_err(|e| RpcError::Malformed(format!("bad u64 quantity {s}: {e}")))
}

pub(crate) fn quantity_u128(value: &Value) -> Result<u128, RpcError> {
    let s = hex_str(value)?;
    u128::from_str_radix(s.trim_start_matches("0x"), 16)
        .map_err(|e| RpcError::Malformed(format!("bad u128 quantity {s}: {e}")))
}

pub(crate) fn quantity_u256(value: &Value) -> Result<U256, RpcError> {
    let s = hex_str(value)?;
    U256::from_str_radix(s.trim_start_matches("0x"), 16)
        .map_err(|e| RpcError::Malformed(format!("bad u256 quantity {s}: {e}")))
}
