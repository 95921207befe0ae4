use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Supported networks. Every entity keyed by chain must have a registry entry
/// for its `ChainId` or the operation fails with `UnsupportedChain`.
#[derive(
    Copy, Clone, Debug, Display, PartialEq, Eq, Hash, EnumString, EnumIter, Serialize, Deserialize,
)]
pub enum ChainId {
    Ethereum,
    Optimism,
    Bsc,
    Okc,
    Polygon,
    Fantom,
    Arbitrum,
    Avalanche,
}

impl ChainId {
    /// Numeric chain id as used on the wire (EIP-155).
    pub fn id(self) -> u64 {
        match self {
            ChainId::Ethereum => 1,
            ChainId::Optimism => 10,
            ChainId::Bsc => 56,
            ChainId::Okc => 66,
            ChainId::Polygon => 137,
            ChainId::Fantom => 250,
            ChainId::Arbitrum => 42161,
            ChainId::Avalanche => 43114,
        }
    }

    pub fn from_id(id: u64) -> Option<ChainId> {
        use strum::IntoEnumIterator;
        ChainId::iter().find(|chain| chain.id() == id)
    }

    /// Environment variable that overrides the default RPC endpoint.
    pub fn rpc_env_key(self) -> &'static str {
        match self {
            ChainId::Ethereum => "RPC_URL_ETHEREUM",
            ChainId::Optimism => "RPC_URL_OPTIMISM",
            ChainId::Bsc => "RPC_URL_BSC",
            ChainId::Okc => "RPC_URL_OKC",
            ChainId::Polygon => "RPC_URL_POLYGON",
            ChainId::Fantom => "RPC_URL_FANTOM",
            ChainId::Arbitrum => "RPC_URL_ARBITRUM",
            ChainId::Avalanche => "RPC_URL_AVALANCHE",
        }
    }

    pub fn default_rpc_url(self) -> &'static str {
        match self {
            ChainId::Ethereum => "https://eth.llamarpc.com",
            ChainId::Optimism => "https://mainnet.optimism.io",
            ChainId::Bsc => "https://bsc-dataseed.binance.org",
            ChainId::Okc => "https://exchainrpc.okex.org",
            ChainId::Polygon => "https://polygon-rpc.com",
            ChainId::Fantom => "https://rpc.ftm.tools",
            ChainId::Arbitrum => "https://arb1.arbitrum.io/rpc",
            ChainId::Avalanche => "https://api.avax.network/ext/bc/C/rpc",
        }
    }
}
