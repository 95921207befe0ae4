use alloy_primitives::{Address, B256, U256};
use revm::DatabaseRef;
use revm::context::DBErrorMarker;
use revm::primitives::KECCAK_EMPTY;
use revm::state::{AccountInfo, Bytecode};

use crate::error::SimError;
use crate::rpc::{BlockingRpc, RpcError};

#[derive(Debug, thiserror::Error)]
#[error("fork backend: {0}")]
pub struct ForkDbError(#[from] RpcError);

impl DBErrorMarker for ForkDbError {}

impl From<ForkDbError> for SimError {
    fn from(err: ForkDbError) -> Self {
        SimError::Rpc(err.0)
    }
}

/// revm state backend that lazily pulls accounts, storage and block hashes
/// from a live node, every read pinned to the fork block. Sits under a
/// `CacheDB` so each slot is fetched at most once per simulation.
#[derive(Debug)]
pub struct ForkDb {
    rpc: BlockingRpc,
    block: u64,
}

impl ForkDb {
    pub fn new(rpc: BlockingRpc, block: u64) -> Self {
        ForkDb { rpc, block }
    }
}

impl DatabaseRef for ForkDb {
    type Error = ForkDbError;

    fn basic_ref(&self, address: Address) -> Result<Option<AccountInfo>, Self::Error> {
        let balance = self.rpc.get_balance(address, Some(self.block))?;
        let nonce = self.rpc.get_nonce(address, Some(self.block))?;
        let code = self.rpc.get_code(address, Some(self.block))?;
        let (code_hash, code) = if code.is_empty() {
            (KECCAK_EMPTY, None)
        } else {
            let bytecode = Bytecode::new_raw(code);
            (bytecode.hash_slow(), Some(bytecode))
        };
        Ok(Some(AccountInfo { balance, nonce, code_hash, code }))
    }

    fn code_by_hash_ref(&self, _code_hash: B256) -> Result<Bytecode, Self::Error> {
        // basic_ref always ships the code with the account, so revm never
        // has to resolve a hash on its own.
        Ok(Bytecode::default())
    }

    fn storage_ref(&self, address: Address, index: U256) -> Result<U256, Self::Error> {
        Ok(self.rpc.get_storage_at(address, index, Some(self.block))?)
    }

    fn block_hash_ref(&self, number: u64) -> Result<B256, Self::Error> {
        Ok(self.rpc.get_block_hash(number)?)
    }
}
