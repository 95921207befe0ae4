use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::SimError;

/// Everything dispatch needs to know about a venue. Adding a venue is an
/// entry here (plus a router table row for routed families); the quote
/// control flow never changes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VenueDescriptor {
    pub family: QuoteFamily,
    pub requires_pool: bool,
}

/// The quoting mechanisms venues map onto. One strategy per family.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum QuoteFamily {
    /// xy=k routers quoted through `getAmountsOut`.
    ConstantProductRouter,
    /// Kyber-style routers that take an explicit pool path.
    DmmRouter,
    /// UniswapV3 pools quoted through the QuoterV2 periphery.
    ConcentratedLiquidity,
    /// Balancer V1 weighted pools, output computed by the pool's own math.
    WeightedPool,
    /// Balancer V2 vault `queryBatchSwap`.
    BatchSwapVault,
    /// Saddle-style stableswap with on-pool token indices.
    Stableswap,
    /// DODO proactive market makers, classic and V2.
    Pmm,
    /// Bancor conversion-path rates.
    BridgeRate,
    /// Curve pools resolved through the meta registry.
    Metapool,
    /// Pools answering an exact-input rate query in a single call.
    PoolRate,
    /// Smoothy-style stableswap quoted through fixed token-index tables.
    IndexedStableswap,
}

#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum Venue {
    // Constant-product routers
    UniswapV2,
    SushiSwap,
    PancakeSwap,
    ShibaSwap,
    QuickSwap,
    ApeSwap,
    Fraxswap,
    BiSwap,
    MDex,
    BakerySwap,
    JetSwap,
    CherrySwap,
    JSwap,
    KSwap,
    Dfyn,
    BabySwap,
    KnightSwap,
    DefiSwap,
    LuaSwap,
    Convergence,
    RadioShack,
    AISwap,
    DefiBox,
    AutoShark,
    BenSwap,
    BurgeSwap,
    // Pool-routed DMM
    KyberDmm,
    // Everything else
    UniswapV3,
    BalancerV1,
    BalancerV2,
    Saddle,
    Synapse,
    Dodo,
    DodoV2,
    Bancor,
    Curve,
    CurveV2,
    Mstable,
    BancorV3,
    Smoothy,
    Shell,
}

impl Venue {
    /// Boundary-side parse mapping unknown names to `UnsupportedVenue`.
    pub fn parse(name: &str) -> Result<Venue, SimError> {
        name.parse().map_err(|_| SimError::UnsupportedVenue(name.to_string()))
    }

    pub fn descriptor(self) -> VenueDescriptor {
        use QuoteFamily::*;
        match self {
            Venue::UniswapV2
            | Venue::SushiSwap
            | Venue::PancakeSwap
            | Venue::ShibaSwap
            | Venue::QuickSwap
            | Venue::ApeSwap
            | Venue::Fraxswap
            | Venue::BiSwap
            | Venue::MDex
            | Venue::BakerySwap
            | Venue::JetSwap
            | Venue::CherrySwap
            | Venue::JSwap
            | Venue::KSwap
            | Venue::Dfyn
            | Venue::BabySwap
            | Venue::KnightSwap
            | Venue::DefiSwap
            | Venue::LuaSwap
            | Venue::Convergence
            | Venue::RadioShack
            | Venue::AISwap
            | Venue::DefiBox
            | Venue::AutoShark
            | Venue::BenSwap
            | Venue::BurgeSwap => {
                VenueDescriptor { family: ConstantProductRouter, requires_pool: false }
            }
            Venue::KyberDmm => VenueDescriptor { family: DmmRouter, requires_pool: true },
            Venue::UniswapV3 => {
                VenueDescriptor { family: ConcentratedLiquidity, requires_pool: true }
            }
            Venue::BalancerV1 => VenueDescriptor { family: WeightedPool, requires_pool: true },
            Venue::BalancerV2 => VenueDescriptor { family: BatchSwapVault, requires_pool: true },
            Venue::Saddle | Venue::Synapse => {
                VenueDescriptor { family: Stableswap, requires_pool: true }
            }
            Venue::Dodo | Venue::DodoV2 => VenueDescriptor { family: Pmm, requires_pool: true },
            Venue::Bancor => VenueDescriptor { family: BridgeRate, requires_pool: false },
            Venue::Curve | Venue::CurveV2 => {
                VenueDescriptor { family: Metapool, requires_pool: true }
            }
            Venue::Mstable | Venue::BancorV3 | Venue::Shell => {
                VenueDescriptor { family: PoolRate, requires_pool: true }
            }
            Venue::Smoothy => VenueDescriptor { family: IndexedStableswap, requires_pool: true },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_venue_has_a_descriptor() {
        // The match in descriptor() is exhaustive by construction; this pins
        // the pool policy for the families where it matters.
        for venue in Venue::iter() {
            let descriptor = venue.descriptor();
            match descriptor.family {
                QuoteFamily::ConstantProductRouter | QuoteFamily::BridgeRate => {
                    assert!(!descriptor.requires_pool, "{venue} should not require a pool")
                }
                _ => assert!(descriptor.requires_pool, "{venue} should require a pool"),
            }
        }
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        assert!(matches!(Venue::parse("UniswapV2"), Ok(Venue::UniswapV2)));
        assert!(matches!(Venue::parse("NoSuchDex"), Err(SimError::UnsupportedVenue(_))));
    }
}
