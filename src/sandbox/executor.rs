use std::collections::HashSet;

use alloy_primitives::{Address, Bytes, TxKind, U256};
use alloy_sol_types::SolCall;
use revm::context::TxEnv;
use revm::context_interface::result::ExecutionResult;
use revm::database::CacheDB;
use revm::{Context, ExecuteCommitEvm, ExecuteEvm, MainBuilder, MainContext};
use tracing::debug;

use super::erc20;
use super::fork::ForkDb;
use crate::error::SimError;
use crate::registry::{ChainId, is_native_token};
use crate::rpc::BlockingRpc;

const BLOCK_GAS_LIMIT: u64 = 30_000_000;

/// Gas budget for impersonated funding transfers. Zero-cost, so oversizing
/// it never distorts accounting.
const FUNDING_GAS_LIMIT: u64 = 1_000_000;

/// Outcome of a committed simulated transaction.
#[derive(Clone, Debug)]
pub struct Execution {
    pub gas_used: u64,
    pub effective_gas_price: u128,
    pub success: bool,
}

/// A disposable forked-state EVM pinned to one block. Owns the whole fork
/// lifecycle: constructed by `fork`, consumed by one simulation, released
/// on drop along every exit path.
pub struct Sandbox {
    db: CacheDB<ForkDb>,
    chain: ChainId,
    block: u64,
    timestamp: u64,
    gas_price: u128,
    impersonated: HashSet<Address>,
}

impl Sandbox {
    /// Forks `chain` at `block` (head when unpinned). The reference block's
    /// timestamp is carried into the fork so time-dependent contracts see
    /// consistent state, and the live gas price becomes the synthetic one.
    pub fn fork(chain: ChainId, rpc_url: &str, block: Option<u64>) -> Result<Sandbox, SimError> {
        let rpc = BlockingRpc::new(rpc_url);
        let head = rpc.block_number().map_err(|e| SimError::ForkFailure(e.to_string()))?;
        let block = match block {
            Some(height) if height > head => {
                return Err(SimError::ForkFailure(format!("block {height} is past head {head}")));
            }
            Some(height) => height,
            None => head,
        };
        let timestamp =
            rpc.block_timestamp(block).map_err(|e| SimError::ForkFailure(e.to_string()))?;
        let gas_price = rpc.gas_price().map_err(|e| SimError::ForkFailure(e.to_string()))?;
        debug!(%chain, block, gas_price, "forked");
        Ok(Sandbox {
            db: CacheDB::new(ForkDb::new(rpc, block)),
            chain,
            block,
            timestamp,
            gas_price,
            impersonated: HashSet::new(),
        })
    }

    pub fn chain(&self) -> ChainId {
        self.chain
    }

    pub fn block(&self) -> u64 {
        self.block
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn gas_price(&self) -> u128 {
        self.gas_price
    }

    /// Allows `address` to send transactions without a signature, the
    /// in-fork analogue of an unlocked account.
    pub fn impersonate(&mut self, address: Address) {
        self.impersonated.insert(address);
    }

    pub fn is_impersonated(&self, address: Address) -> bool {
        self.impersonated.contains(&address)
    }

    /// Read-only execution; state changes are discarded.
    pub fn call(
        &mut self,
        from: Address,
        to: Address,
        data: Bytes,
        value: U256,
    ) -> Result<Bytes, SimError> {
        let tx = self.tx_env(from, to, value, data, BLOCK_GAS_LIMIT, 0);
        match self.transact(tx, false)? {
            ExecutionResult::Success { output, .. } => Ok(output.into_data()),
            failed => Err(Self::failure("call", failed)),
        }
    }

    /// Dry-runs against current sandbox state at gas price zero. The margin
    /// covers the 63/64 forwarding rule and refunds, which make the dry-run
    /// consumption a floor rather than a usable limit.
    pub fn estimate_gas(
        &mut self,
        from: Address,
        to: Address,
        data: Bytes,
        value: U256,
    ) -> Result<u64, SimError> {
        let tx = self.tx_env(from, to, value, data, BLOCK_GAS_LIMIT, 0);
        match self.transact(tx, false) {
            Ok(ExecutionResult::Success { gas_used, .. }) => {
                Ok((gas_used + gas_used / 8).min(BLOCK_GAS_LIMIT))
            }
            Ok(failed) => Err(SimError::GasEstimationFailure(Self::describe(failed))),
            Err(SimError::SimulationExecutionFailure(msg)) => {
                Err(SimError::GasEstimationFailure(msg))
            }
            Err(other) => Err(other),
        }
    }

    /// Commits a transaction from an impersonated sender at the sandbox gas
    /// price, estimating the limit when none is given.
    pub fn execute(
        &mut self,
        from: Address,
        to: Address,
        data: Bytes,
        value: U256,
        gas_limit: Option<u64>,
    ) -> Result<Execution, SimError> {
        if !self.is_impersonated(from) {
            return Err(SimError::SimulationExecutionFailure(format!(
                "sender {from} is not impersonated"
            )));
        }
        let gas_limit = match gas_limit {
            Some(limit) => limit,
            None => self.estimate_gas(from, to, data.clone(), value)?,
        };
        let gas_price = self.gas_price;
        let tx = self.tx_env(from, to, value, data, gas_limit, gas_price);
        match self.transact(tx, true)? {
            ExecutionResult::Success { gas_used, .. } => {
                debug!(%from, %to, gas_used, "executed");
                Ok(Execution { gas_used, effective_gas_price: gas_price, success: true })
            }
            failed => Err(Self::failure("execution", failed)),
        }
    }

    /// Committed transfer at gas price zero, used for balance seeding so
    /// top-ups never need a top-up of their own.
    pub(crate) fn send_zero_cost(
        &mut self,
        from: Address,
        to: Address,
        data: Bytes,
        value: U256,
    ) -> Result<(), SimError> {
        if !self.is_impersonated(from) {
            return Err(SimError::SimulationExecutionFailure(format!(
                "funding sender {from} is not impersonated"
            )));
        }
        let tx = self.tx_env(from, to, value, data, FUNDING_GAS_LIMIT, 0);
        match self.transact(tx, true)? {
            ExecutionResult::Success { .. } => Ok(()),
            failed => Err(Self::failure("funding transfer", failed)),
        }
    }

    pub fn native_balance(&mut self, address: Address) -> Result<U256, SimError> {
        let info = revm::Database::basic(&mut self.db, address)?;
        Ok(info.map(|account| account.balance).unwrap_or_default())
    }

    pub fn erc20_balance(&mut self, token: Address, owner: Address) -> Result<U256, SimError> {
        let data = erc20::balanceOfCall { owner }.abi_encode();
        let raw = self.call(owner, token, Bytes::from(data), U256::ZERO)?;
        Ok(erc20::balanceOfCall::abi_decode_returns(&raw)?)
    }

    /// Balance of `token` for `owner`, routing the native sentinels to the
    /// account balance instead of an ERC-20 read.
    pub fn token_balance(&mut self, token: Address, owner: Address) -> Result<U256, SimError> {
        if is_native_token(token) {
            self.native_balance(owner)
        } else {
            self.erc20_balance(token, owner)
        }
    }

    fn tx_env(
        &self,
        from: Address,
        to: Address,
        value: U256,
        data: Bytes,
        gas_limit: u64,
        gas_price: u128,
    ) -> TxEnv {
        TxEnv {
            caller: from,
            gas_limit,
            gas_price,
            kind: TxKind::Call(to),
            value,
            data,
            nonce: 0,
            chain_id: Some(self.chain.id()),
            ..Default::default()
        }
    }

    fn transact(&mut self, tx: TxEnv, commit: bool) -> Result<ExecutionResult, SimError> {
        let chain_id = self.chain.id();
        let number = self.block;
        let timestamp = self.timestamp;
        let mut evm = Context::mainnet()
            .with_db(&mut self.db)
            .modify_cfg_chained(|cfg| {
                cfg.chain_id = chain_id;
                // Impersonation instead of signatures: senders have no key,
                // may be contracts, and carry foreign nonces.
                cfg.disable_nonce_check = true;
                cfg.disable_eip3607 = true;
            })
            .modify_block_chained(|block| {
                block.number = U256::from(number);
                block.timestamp = U256::from(timestamp);
                block.basefee = 0;
                block.gas_limit = BLOCK_GAS_LIMIT;
            })
            .build_mainnet();
        let result = if commit {
            evm.transact_commit(tx)
        } else {
            evm.transact(tx)
        };
        result.map_err(|e| SimError::SimulationExecutionFailure(e.to_string()))
    }

    fn describe(result: ExecutionResult) -> String {
        match result {
            ExecutionResult::Revert { gas_used, output } => {
                let reason = alloy_sol_types::decode_revert_reason(&output)
                    .unwrap_or_else(|| format!("0x{}", hex::encode(&output)));
                format!("reverted after {gas_used} gas: {reason}")
            }
            ExecutionResult::Halt { reason, gas_used } => {
                format!("halted after {gas_used} gas: {reason:?}")
            }
            ExecutionResult::Success { gas_used, .. } => {
                format!("succeeded with {gas_used} gas")
            }
        }
    }

    fn failure(stage: &str, result: ExecutionResult) -> SimError {
        SimError::SimulationExecutionFailure(format!("{stage} {}", Self::describe(result)))
    }
}

#[cfg(test)]
impl Sandbox {
    /// Sandbox over an unreachable endpoint; tests must seed every account
    /// a transaction touches so no read ever leaves the cache.
    pub(crate) fn offline(chain: ChainId) -> Sandbox {
        Sandbox {
            db: CacheDB::new(ForkDb::new(BlockingRpc::new("http://127.0.0.1:1"), 17_000_000)),
            chain,
            block: 17_000_000,
            timestamp: 1_700_000_000,
            gas_price: 30_000_000_000,
            impersonated: HashSet::new(),
        }
    }

    pub(crate) fn seed_account(&mut self, address: Address, balance: U256) {
        use revm::primitives::KECCAK_EMPTY;
        use revm::state::AccountInfo;
        self.db.insert_account_info(
            address,
            AccountInfo { balance, nonce: 0, code_hash: KECCAK_EMPTY, code: None },
        );
    }

    pub(crate) fn seed_contract(&mut self, address: Address, code: Bytes) {
        use revm::state::{AccountInfo, Bytecode};
        let bytecode = Bytecode::new_raw(code);
        self.db.insert_account_info(
            address,
            AccountInfo {
                balance: U256::ZERO,
                nonce: 0,
                code_hash: bytecode.hash_slow(),
                code: Some(bytecode),
            },
        );
    }

    /// Seeds the accounts every committed transaction loads implicitly.
    pub(crate) fn seed_system_accounts(&mut self) {
        self.seed_account(Address::ZERO, U256::ZERO);
    }
}
