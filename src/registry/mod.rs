//! Static per-chain tables: known tokens, venue routers, quote
//! infrastructure contracts and funding sources. Built once at startup
//! and shared by reference; no interior mutability.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::Address;

pub mod chain;
mod tables;
pub mod token;

pub use chain::ChainId;
pub use token::{NATIVE_TOKEN, TokenDescriptor, is_native_token};

use crate::error::SimError;
use crate::quote::Venue;

/// A wealthy account whose balance seeds simulation wallets with `token`.
#[derive(Clone, Debug)]
pub struct FundingSource {
    pub token: Address,
    pub holder: Address,
}

/// Per-chain defaults for the execution layer: the wallet simulations run
/// as, and the aggregator contracts calldata targets default to.
#[derive(Clone, Debug)]
pub struct SimDefaults {
    pub wallet: Address,
    pub dex_router: Option<Address>,
    pub approve_proxy: Option<Address>,
    pub bridge_router: Option<Address>,
    pub invest_entrance: Option<Address>,
}

/// Everything the registry knows about one chain.
#[derive(Clone, Debug)]
pub struct ChainTables {
    pub chain: ChainId,
    pub tokens: Vec<TokenDescriptor>,
    /// Router per routed venue (constant-product family plus the DMM router).
    pub swap_routers: HashMap<Venue, Address>,
    pub v3_quoter: Option<Address>,
    pub balancer_vault: Option<Address>,
    pub bancor_network: Option<Address>,
    pub dodo_sell_helper: Option<Address>,
    pub curve_meta_registry: Option<Address>,
    pub funding_sources: Vec<FundingSource>,
    pub defaults: SimDefaults,
}

#[derive(Clone, Debug)]
pub struct Registry {
    chains: HashMap<ChainId, ChainTables>,
}

impl Registry {
    /// The full mainnet table set. `.env` is loaded here so RPC overrides
    /// are visible without any embedding-side setup.
    pub fn mainnet() -> Arc<Registry> {
        dotenvy::dotenv().ok();
        let chains = [
            tables::ethereum(),
            tables::optimism(),
            tables::bsc(),
            tables::okc(),
            tables::polygon(),
            tables::fantom(),
            tables::arbitrum(),
            tables::avalanche(),
        ]
        .into_iter()
        .map(|t| (t.chain, t))
        .collect();
        Arc::new(Registry { chains })
    }

    pub fn tables(&self, chain: ChainId) -> Result<&ChainTables, SimError> {
        self.chains.get(&chain).ok_or_else(|| SimError::UnsupportedChain {
            chain,
            missing: "registry tables".to_string(),
        })
    }

    /// RPC endpoint for `chain`, `RPC_URL_<CHAIN>` overriding the default.
    pub fn rpc_url(&self, chain: ChainId) -> String {
        std::env::var(chain.rpc_env_key()).unwrap_or_else(|_| chain.default_rpc_url().to_string())
    }

    pub fn router(&self, chain: ChainId, venue: Venue) -> Result<Address, SimError> {
        self.tables(chain)?.swap_routers.get(&venue).copied().ok_or_else(|| {
            SimError::UnsupportedChain { chain, missing: format!("{venue} router") }
        })
    }

    pub fn v3_quoter(&self, chain: ChainId) -> Result<Address, SimError> {
        self.required(chain, self.tables(chain)?.v3_quoter, "UniswapV3 quoter")
    }

    pub fn balancer_vault(&self, chain: ChainId) -> Result<Address, SimError> {
        self.required(chain, self.tables(chain)?.balancer_vault, "Balancer vault")
    }

    pub fn bancor_network(&self, chain: ChainId) -> Result<Address, SimError> {
        self.required(chain, self.tables(chain)?.bancor_network, "Bancor network")
    }

    pub fn dodo_sell_helper(&self, chain: ChainId) -> Result<Address, SimError> {
        self.required(chain, self.tables(chain)?.dodo_sell_helper, "DODO sell helper")
    }

    pub fn curve_meta_registry(&self, chain: ChainId) -> Result<Address, SimError> {
        self.required(chain, self.tables(chain)?.curve_meta_registry, "Curve meta registry")
    }

    pub fn defaults(&self, chain: ChainId) -> Result<&SimDefaults, SimError> {
        Ok(&self.tables(chain)?.defaults)
    }

    pub fn dex_router(&self, chain: ChainId) -> Result<Address, SimError> {
        self.required(chain, self.defaults(chain)?.dex_router, "dex router")
    }

    pub fn approve_proxy(&self, chain: ChainId) -> Result<Address, SimError> {
        self.required(chain, self.defaults(chain)?.approve_proxy, "approve proxy")
    }

    pub fn bridge_router(&self, chain: ChainId) -> Result<Address, SimError> {
        self.required(chain, self.defaults(chain)?.bridge_router, "bridge router")
    }

    /// Funding source for `token`; both native sentinels resolve to the
    /// chain's native holder entry.
    pub fn funding_source(
        &self,
        chain: ChainId,
        token: Address,
    ) -> Result<&FundingSource, SimError> {
        let tables = self.tables(chain)?;
        let wanted_native = is_native_token(token);
        tables
            .funding_sources
            .iter()
            .find(|src| {
                if wanted_native { is_native_token(src.token) } else { src.token == token }
            })
            .ok_or(SimError::UnsupportedToken { chain, token })
    }

    pub fn token(&self, chain: ChainId, symbol: &str) -> Option<&TokenDescriptor> {
        self.chains.get(&chain)?.tokens.iter().find(|t| t.symbol == symbol)
    }

    fn required(
        &self,
        chain: ChainId,
        slot: Option<Address>,
        what: &str,
    ) -> Result<Address, SimError> {
        slot.ok_or_else(|| SimError::UnsupportedChain { chain, missing: what.to_string() })
    }
}
