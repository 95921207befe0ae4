//! One strategy per quoting family. Strategies are stateless unit structs
//! dispatched through a fixed table keyed by `QuoteFamily`.

use alloy_primitives::U256;
use async_trait::async_trait;

use super::QuoteContext;
use super::venue::QuoteFamily;
use crate::error::SimError;

mod batch_vault;
mod bridge_rate;
mod concentrated;
mod constant_product;
mod dmm;
mod indexed_stableswap;
mod metapool;
mod pmm;
mod pool_rate;
mod stableswap;
mod weighted;

pub use batch_vault::BatchSwapVault;
pub use bridge_rate::BridgeRate;
pub use concentrated::ConcentratedLiquidity;
pub use constant_product::ConstantProductRouter;
pub use dmm::DmmRouter;
pub use indexed_stableswap::IndexedStableswap;
pub use metapool::Metapool;
pub use pmm::Pmm;
pub use pool_rate::PoolRate;
pub use stableswap::Stableswap;
pub use weighted::WeightedPool;

#[async_trait]
pub trait QuoteStrategy: Send + Sync {
    async fn quote(&self, ctx: &QuoteContext<'_>) -> Result<U256, SimError>;
}

impl QuoteFamily {
    pub fn strategy(self) -> &'static dyn QuoteStrategy {
        match self {
            QuoteFamily::ConstantProductRouter => &ConstantProductRouter,
            QuoteFamily::DmmRouter => &DmmRouter,
            QuoteFamily::ConcentratedLiquidity => &ConcentratedLiquidity,
            QuoteFamily::WeightedPool => &WeightedPool,
            QuoteFamily::BatchSwapVault => &BatchSwapVault,
            QuoteFamily::Stableswap => &Stableswap,
            QuoteFamily::Pmm => &Pmm,
            QuoteFamily::BridgeRate => &BridgeRate,
            QuoteFamily::Metapool => &Metapool,
            QuoteFamily::PoolRate => &PoolRate,
            QuoteFamily::IndexedStableswap => &IndexedStableswap,
        }
    }
}
