use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use super::executor::Sandbox;
use crate::error::SimError;

/// Before/after balance pair for one token of the simulated wallet.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenDelta {
    pub token: Address,
    pub before: U256,
    pub after: U256,
}

impl TokenDelta {
    pub fn new(token: Address, before: U256, after: U256) -> Self {
        TokenDelta { token, before, after }
    }

    /// What the wallet paid out in this token. Saturating: a token the
    /// wallet gained reports zero spend, not an underflow.
    pub fn spent(&self) -> U256 {
        self.before.saturating_sub(self.after)
    }

    pub fn gained(&self) -> U256 {
        self.after.saturating_sub(self.before)
    }
}

/// Balances of `wallet` for `tokens`, in the same order. Taken once before
/// and once after execution; pairing the two gives the deltas.
pub fn snapshot(
    sandbox: &mut Sandbox,
    wallet: Address,
    tokens: &[Address],
) -> Result<Vec<U256>, SimError> {
    tokens.iter().map(|&token| sandbox.token_balance(token, wallet)).collect()
}

pub fn deltas(tokens: &[Address], before: &[U256], after: &[U256]) -> Vec<TokenDelta> {
    tokens
        .iter()
        .zip(before.iter().zip(after.iter()))
        .map(|(&token, (&b, &a))| TokenDelta::new(token, b, a))
        .collect()
}

/// The gas fee is reported separately from token deltas; it is not a swap
/// cost even when the input token is native.
pub fn gas_fee(gas_used: u64, effective_gas_price: u128) -> U256 {
    U256::from(gas_used) * U256::from(effective_gas_price)
}

/// Native coin a send needs up front: the attached value plus the projected
/// fee. An overflowing sum is a request problem, not a funding problem.
pub fn native_requirement(value: U256, fee_budget: U256) -> Result<U256, SimError> {
    value.checked_add(fee_budget).ok_or_else(|| {
        SimError::InvalidRequest(format!("value {value} plus fee budget {fee_budget} overflows"))
    })
}
