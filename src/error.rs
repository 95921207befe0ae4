use crate::quote::Venue;
use crate::registry::ChainId;
use crate::rpc::RpcError;
use alloy_primitives::{Address, U256};

/// Error taxonomy of the quote/simulation core.
///
/// Every variant is terminal for the request that produced it: failures are
/// either configuration gaps (missing registry mappings) or definitive
/// on-chain rejections, neither of which a retry would fix.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("chain {chain} has no {missing} entry")]
    UnsupportedChain { chain: ChainId, missing: String },
    #[error("unsupported venue: {0}")]
    UnsupportedVenue(String),
    #[error("pool address is required for {0}")]
    MissingPoolAddress(Venue),
    #[error("token {token} is not in pool {pool}")]
    TokenNotInPool { token: Address, pool: Address },
    #[error("no funding source for token {token} on chain {chain}")]
    UnsupportedToken { chain: ChainId, token: Address },
    #[error("funding source {holder} holds {available} of {token}, required {required}")]
    InsufficientFundingSource { holder: Address, token: Address, available: U256, required: U256 },
    #[error("fork failed: {0}")]
    ForkFailure(String),
    #[error("gas estimation failed: {0}")]
    GasEstimationFailure(String),
    #[error("simulation execution failed: {0}")]
    SimulationExecutionFailure(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error(transparent)]
    AbiDecode(#[from] alloy_sol_types::Error),
}
