//! Static mainnet tables: tokens, routers, quote infrastructure and
//! wealthy funding accounts per chain. Chains absent from a table fail
//! lookups with `UnsupportedChain` instead of guessing.

use std::collections::HashMap;

use alloy_primitives::{Address, address};

use super::token::{NATIVE_TOKEN, TokenDescriptor};
use super::{ChainId, ChainTables, FundingSource, SimDefaults};
use crate::quote::Venue;

// Exchange-controlled accounts used as funding sources on Ethereum.
const BINANCE: Address = address!("28C6c06298d514Db089934071355E5743bf21d60");
const BINANCE7: Address = address!("BE0eB53F46cd790Cd13851d5EFf43D12404d33E8");
const BINANCE8: Address = address!("F977814e90dA44bFA03b6295A0616a897441aceC");
const MULTICHAIN_BRIDGE: Address = address!("8EB8a3b98659Cce290402893d0123abb75E3ab28");
const BINANCE_BSC: Address = address!("8894E0a0c962CB723c1976a4421c95949bE2D4E3");
const WEALTHY_OKC: Address = address!("4ce08FfC090f5c54013c62efe30D62E6578E738D");

// Same deployment address on every chain Sushi runs on.
const SUSHI_MULTICHAIN_ROUTER: Address = address!("1b02dA8Cb0d097eB8D57A175b88c7D8b47997506");

fn native(decimals: u8) -> TokenDescriptor {
    TokenDescriptor::new("NativeToken", NATIVE_TOKEN, decimals)
}

pub(super) fn ethereum() -> ChainTables {
    let tokens = vec![
        native(18),
        TokenDescriptor::new("USDC", address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"), 6),
        TokenDescriptor::new("WETH", address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"), 18),
        TokenDescriptor::new("DAI", address!("6B175474E89094C44Da98b954EedeAC495271d0F"), 18),
        TokenDescriptor::new("USDT", address!("dAC17F958D2ee523a2206206994597C13D831ec7"), 6),
        TokenDescriptor::new("UNI", address!("1f9840a85d5aF5bf1D1762F925BDADdC4201F984"), 18),
        TokenDescriptor::new("MATIC", address!("7D1AfA7B718fb893dB30A3aBc0Cfc608AaCfeBB0"), 18),
        TokenDescriptor::new("AAVE", address!("7Fc66500c84A76Ad7e9c93437bFc5Ac33E2DDaE9"), 18),
        TokenDescriptor::new("YFI", address!("0bc529c00C6401aEF6D220BE8C6Ea1667F6Ad93e"), 18),
    ];

    let swap_routers = HashMap::from([
        (Venue::UniswapV2, address!("7a250d5630B4cF539739dF2C5dAcb4c659F2488D")),
        (Venue::SushiSwap, address!("d9e1cE17f2641f24aE83637ab66a2cca9C378B9F")),
        (Venue::ShibaSwap, address!("03f7724180AA6b939894B5Ca4314783B0b36b329")),
        (Venue::DefiSwap, address!("CeB90E4C17d626BE0fACd78b79c9c87d7ca181b3")),
        (Venue::KyberDmm, address!("1c87257F5e8609940Bc751a07BB085Bb7f8cDBE6")),
    ]);

    let funding_sources = vec![
        FundingSource { token: NATIVE_TOKEN, holder: BINANCE7 },
        FundingSource {
            token: address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"), // USDC
            holder: BINANCE7,
        },
        FundingSource {
            token: address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"), // WETH
            holder: MULTICHAIN_BRIDGE,
        },
        FundingSource {
            token: address!("6B175474E89094C44Da98b954EedeAC495271d0F"), // DAI
            holder: BINANCE,
        },
        FundingSource {
            token: address!("dAC17F958D2ee523a2206206994597C13D831ec7"), // USDT
            holder: BINANCE,
        },
        FundingSource {
            token: address!("1f9840a85d5aF5bf1D1762F925BDADdC4201F984"), // UNI
            holder: BINANCE,
        },
        FundingSource {
            token: address!("7D1AfA7B718fb893dB30A3aBc0Cfc608AaCfeBB0"), // MATIC
            holder: BINANCE8,
        },
        FundingSource {
            token: address!("7Fc66500c84A76Ad7e9c93437bFc5Ac33E2DDaE9"), // AAVE
            holder: BINANCE,
        },
        FundingSource {
            token: address!("0bc529c00C6401aEF6D220BE8C6Ea1667F6Ad93e"), // YFI
            holder: BINANCE,
        },
    ];

    ChainTables {
        chain: ChainId::Ethereum,
        tokens,
        swap_routers,
        v3_quoter: Some(address!("61fFE014bA17989E743c5F6cB21bF9697530B21e")),
        balancer_vault: Some(address!("BA12222222228d8Ba445958a75a0704d566BF2C8")),
        bancor_network: Some(address!("2F9EC37d6CcFFf1caB21733BdaDEdE11c823cCB0")),
        dodo_sell_helper: Some(address!("533dA777aeDCE766CEAe696bf90f8541A4bA80Eb")),
        curve_meta_registry: Some(address!("F98B45FA17DE75FB1aD0e7aFD971b0ca00e379fC")),
        funding_sources,
        defaults: SimDefaults {
            wallet: BINANCE7,
            dex_router: Some(address!("7D0CcAa3Fac1e5A943c5168b6CEd828691b46B36")),
            approve_proxy: Some(address!("40aA958dd87FC8305b97f2BA922CDdCa374bcD7f")),
            bridge_router: None,
            invest_entrance: None,
        },
    }
}

pub(super) fn optimism() -> ChainTables {
    let weth = address!("4200000000000000000000000000000000000006");
    let native_holder = address!("428AB2BA90Eba0a4Be7aF34C9Ac451ab061AC010");
    ChainTables {
        chain: ChainId::Optimism,
        tokens: vec![
            native(18),
            TokenDescriptor::new("WETH", weth, 18),
            TokenDescriptor::new("USDC", address!("7F5c764cBc14f9669B88837ca1490cCa17c31607"), 6),
            TokenDescriptor::new("DAI", address!("DA10009cBd5D07dd0CeCc66161FC93D7c9000da1"), 18),
            TokenDescriptor::new("USDT", address!("94b008aA00579c1307B0EF2c499aD98a8ce58e58"), 6),
        ],
        swap_routers: HashMap::new(),
        v3_quoter: Some(address!("61fFE014bA17989E743c5F6cB21bF9697530B21e")),
        balancer_vault: None,
        bancor_network: None,
        dodo_sell_helper: None,
        curve_meta_registry: None,
        funding_sources: vec![
            FundingSource { token: NATIVE_TOKEN, holder: native_holder },
            FundingSource { token: weth, holder: native_holder },
            FundingSource {
                token: address!("7F5c764cBc14f9669B88837ca1490cCa17c31607"),
                holder: address!("a3f45e619cE3AAe2Fa5f8244439a66B203b78bCc"),
            },
            FundingSource {
                token: address!("DA10009cBd5D07dd0CeCc66161FC93D7c9000da1"),
                holder: address!("19537BADE509ea6C4BCc8101dC44c72042116Dda"),
            },
            FundingSource {
                token: address!("94b008aA00579c1307B0EF2c499aD98a8ce58e58"),
                holder: address!("EBb8EA128BbdFf9a1780A4902A9380022371d466"),
            },
        ],
        defaults: SimDefaults {
            wallet: native_holder,
            dex_router: None,
            approve_proxy: None,
            bridge_router: None,
            invest_entrance: None,
        },
    }
}

pub(super) fn bsc() -> ChainTables {
    let tokens = vec![
        native(18),
        TokenDescriptor::new("WBNB", address!("bb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c"), 18),
        TokenDescriptor::new("DAI", address!("1AF3F329e8BE154074D8769D1FFa4eE058B1DBc3"), 18),
        TokenDescriptor::new("USDC", address!("8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d"), 18),
        TokenDescriptor::new("USDT", address!("55d398326f99059fF775485246999027B3197955"), 18),
        TokenDescriptor::new("ETH", address!("2170Ed0880ac9A755fd29B2688956BD959F933F8"), 18),
        TokenDescriptor::new("BTCB", address!("7130d2A12B9BCbFAe4f2634d864A1Ee1Ce3Ead9c"), 18),
        TokenDescriptor::new("BUSD", address!("e9e7CEA3DedcA5984780Bafc599bD69ADd087D56"), 18),
    ];
    let swap_routers = HashMap::from([
        (Venue::PancakeSwap, address!("10ED43C718714eb63d5aA57B78B54704E256024E")),
        (Venue::BiSwap, address!("3a6d8cA21D1CF76F653A67577FA0D27453350dD8")),
        (Venue::ApeSwap, address!("cF0feBd3f17CEf5b47b0cD257aCf6025c5BFf3b7")),
        (Venue::MDex, address!("7DAe51BD3E3376B8c7c4900E9107f12Be3AF1bA8")),
        (Venue::BakerySwap, address!("CDe540d7eAFE93aC5fE6233Bee57E1270D3E330F")),
        (Venue::BabySwap, address!("325E343f1dE602396E256B67eFd1F61C3A6B38Bd")),
    ]);
    let mut funding_sources = vec![
        FundingSource { token: NATIVE_TOKEN, holder: BINANCE_BSC },
        FundingSource {
            token: address!("bb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c"), // WBNB
            holder: address!("ef7fb88F709aC6148C07D070BC71d252E8E13b92"),
        },
    ];
    for erc20 in [
        address!("1AF3F329e8BE154074D8769D1FFa4eE058B1DBc3"), // DAI
        address!("8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d"), // USDC
        address!("55d398326f99059fF775485246999027B3197955"), // USDT
        address!("2170Ed0880ac9A755fd29B2688956BD959F933F8"), // ETH
        address!("7130d2A12B9BCbFAe4f2634d864A1Ee1Ce3Ead9c"), // BTCB
        address!("e9e7CEA3DedcA5984780Bafc599bD69ADd087D56"), // BUSD
    ] {
        funding_sources.push(FundingSource { token: erc20, holder: BINANCE_BSC });
    }
    ChainTables {
        chain: ChainId::Bsc,
        tokens,
        swap_routers,
        v3_quoter: None,
        balancer_vault: None,
        bancor_network: None,
        dodo_sell_helper: None,
        curve_meta_registry: None,
        funding_sources,
        defaults: SimDefaults {
            wallet: BINANCE_BSC,
            dex_router: None,
            approve_proxy: None,
            bridge_router: None,
            invest_entrance: None,
        },
    }
}

pub(super) fn okc() -> ChainTables {
    let tokens = vec![
        native(18),
        TokenDescriptor::new("WOKT", address!("8F8526dbfd6E38E3D8307702cA8469Bae6C56C15"), 18),
        TokenDescriptor::new("DAI", address!("21cDE7E32a6CAF4742d00d44B07279e7596d26B9"), 18),
        TokenDescriptor::new("ETHK", address!("EF71CA2EE68F45B9Ad6F72fbdb33d707b872315C"), 18),
        TokenDescriptor::new("USDC", address!("c946DAf81b08146B1C7A8Da2A851Ddf2B3EAaf85"), 18),
        TokenDescriptor::new("USDT", address!("382bB369d343125BfB2117af9c149795C6C65C50"), 18),
        TokenDescriptor::new("OKB", address!("DF54B6c6195EA4d948D03bfD818D365cf175cFC2"), 18),
        TokenDescriptor::new("BTCK", address!("54e4622DC504176b3BB432dCCAf504569699a7fF"), 18),
    ];
    let swap_routers = HashMap::from([
        (Venue::CherrySwap, address!("865bfde337C8aFBffF144Ff4C29f9404EBb22b15")),
        (Venue::JSwap, address!("069A306A638ac9d3a68a6BD8BE898774C073DCb3")),
    ]);
    let mut funding_sources = vec![
        FundingSource { token: NATIVE_TOKEN, holder: WEALTHY_OKC },
        FundingSource {
            token: address!("8F8526dbfd6E38E3D8307702cA8469Bae6C56C15"), // WOKT
            holder: address!("38D6a76675645A15c8E01e8Cbc1CF4381Ba0273D"),
        },
    ];
    for erc20 in [
        address!("21cDE7E32a6CAF4742d00d44B07279e7596d26B9"), // DAI
        address!("EF71CA2EE68F45B9Ad6F72fbdb33d707b872315C"), // ETHK
        address!("c946DAf81b08146B1C7A8Da2A851Ddf2B3EAaf85"), // USDC
        address!("382bB369d343125BfB2117af9c149795C6C65C50"), // USDT
        address!("DF54B6c6195EA4d948D03bfD818D365cf175cFC2"), // OKB
        address!("54e4622DC504176b3BB432dCCAf504569699a7fF"), // BTCK
    ] {
        funding_sources.push(FundingSource { token: erc20, holder: WEALTHY_OKC });
    }
    ChainTables {
        chain: ChainId::Okc,
        tokens,
        swap_routers,
        v3_quoter: None,
        balancer_vault: None,
        bancor_network: None,
        dodo_sell_helper: None,
        curve_meta_registry: None,
        funding_sources,
        defaults: SimDefaults {
            wallet: WEALTHY_OKC,
            dex_router: None,
            approve_proxy: None,
            bridge_router: None,
            invest_entrance: None,
        },
    }
}

pub(super) fn polygon() -> ChainTables {
    let tokens = vec![
        native(18),
        TokenDescriptor::new("WMATIC", address!("0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"), 18),
        TokenDescriptor::new("DAI", address!("8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063"), 18),
        TokenDescriptor::new("USDC", address!("2791Bca1f2de4661ED88A30C99A7a9449Aa84174"), 6),
        TokenDescriptor::new("USDT", address!("c2132D05D31c914a87C6611C10748AEb04B58e8F"), 6),
    ];
    let swap_routers = HashMap::from([
        (Venue::QuickSwap, address!("a5E0829CaCEd8fFDD4De3c43696c57F7D7A678ff")),
        (Venue::Dfyn, address!("A102072A4C07F06EC3B4900FDC4C7B80b6c57429")),
        (Venue::ApeSwap, address!("C0788A3aD43d79aa53B09c2EaCc313A787d1d607")),
        (Venue::SushiSwap, SUSHI_MULTICHAIN_ROUTER),
    ]);
    ChainTables {
        chain: ChainId::Polygon,
        tokens,
        swap_routers,
        v3_quoter: Some(address!("61fFE014bA17989E743c5F6cB21bF9697530B21e")),
        balancer_vault: Some(address!("BA12222222228d8Ba445958a75a0704d566BF2C8")),
        bancor_network: None,
        dodo_sell_helper: None,
        curve_meta_registry: None,
        funding_sources: vec![
            FundingSource { token: NATIVE_TOKEN, holder: BINANCE8 },
            FundingSource {
                token: address!("0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"), // WMATIC
                holder: address!("8dF3aad3a84da6b69A4DA8aeC3eA40d9091B2Ac4"),
            },
            FundingSource {
                token: address!("8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063"), // DAI
                holder: address!("27F8D03b3a2196956ED754baDc28D73be8830A6e"),
            },
            FundingSource {
                token: address!("2791Bca1f2de4661ED88A30C99A7a9449Aa84174"), // USDC
                holder: BINANCE8,
            },
            FundingSource {
                token: address!("c2132D05D31c914a87C6611C10748AEb04B58e8F"), // USDT
                holder: address!("0D0707963952f2fBA59dD06f2b425ace40b492Fe"),
            },
        ],
        defaults: SimDefaults {
            wallet: BINANCE8,
            dex_router: None,
            approve_proxy: None,
            bridge_router: None,
            invest_entrance: None,
        },
    }
}

pub(super) fn fantom() -> ChainTables {
    let wftm = address!("21be370D5312f44cB42ce377BC9b8a0cEF1A4C83");
    ChainTables {
        chain: ChainId::Fantom,
        tokens: vec![
            native(18),
            TokenDescriptor::new("WFTM", wftm, 18),
            TokenDescriptor::new("USDC", address!("04068DA6C83AFCFA0e13ba15A6696662335D5B75"), 6),
            TokenDescriptor::new("DAI", address!("8D11eC38a3EB5E956B052f67Da8Bdc9bef8Abf3E"), 18),
        ],
        swap_routers: HashMap::from([(Venue::SushiSwap, SUSHI_MULTICHAIN_ROUTER)]),
        v3_quoter: None,
        balancer_vault: None,
        bancor_network: None,
        dodo_sell_helper: None,
        curve_meta_registry: None,
        funding_sources: vec![
            // The wrapped-native contract itself holds the deposited float.
            FundingSource { token: NATIVE_TOKEN, holder: wftm },
            FundingSource {
                token: wftm,
                holder: address!("c94A3Ff0bac12eeB9ff0CC4e08511E1FFaD6ba94"),
            },
            FundingSource {
                token: address!("04068DA6C83AFCFA0e13ba15A6696662335D5B75"), // USDC
                holder: address!("4188663a85C92EEa35b5AD3AA5cA7CeB237C6fe9"),
            },
            FundingSource {
                token: address!("8D11eC38a3EB5E956B052f67Da8Bdc9bef8Abf3E"), // DAI
                holder: address!("cbDB468a58473e66b557f799208a891B5Be39583"),
            },
        ],
        defaults: SimDefaults {
            wallet: address!("c94A3Ff0bac12eeB9ff0CC4e08511E1FFaD6ba94"),
            dex_router: None,
            approve_proxy: None,
            bridge_router: None,
            invest_entrance: None,
        },
    }
}

pub(super) fn arbitrum() -> ChainTables {
    let weth = address!("82aF49447D8a07e3bd95BD0d56f35241523fBab1");
    ChainTables {
        chain: ChainId::Arbitrum,
        tokens: vec![
            native(18),
            TokenDescriptor::new("WETH", weth, 18),
            TokenDescriptor::new("USDC", address!("FF970A61A04b1cA14834A43f5dE4533eBDDB5CC8"), 6),
            TokenDescriptor::new("DAI", address!("DA10009cBd5D07dd0CeCc66161FC93D7c9000da1"), 18),
            TokenDescriptor::new("USDT", address!("Fd086bC7CD5C481DCC9C85ebE478A1C0b69FCbb9"), 6),
            TokenDescriptor::new("LINK", address!("f97f4df75117a78c1A5a0DBb814Af92458539FB4"), 18),
        ],
        swap_routers: HashMap::from([(Venue::SushiSwap, SUSHI_MULTICHAIN_ROUTER)]),
        v3_quoter: Some(address!("61fFE014bA17989E743c5F6cB21bF9697530B21e")),
        balancer_vault: Some(address!("BA12222222228d8Ba445958a75a0704d566BF2C8")),
        bancor_network: None,
        dodo_sell_helper: None,
        curve_meta_registry: None,
        funding_sources: vec![
            // The wrapped-native contract itself holds the deposited float.
            FundingSource { token: NATIVE_TOKEN, holder: weth },
            FundingSource {
                token: weth,
                holder: address!("c2707568D31F3fB1Fc55B2F8b2ae5682eAa72041"),
            },
            FundingSource {
                token: address!("FF970A61A04b1cA14834A43f5dE4533eBDDB5CC8"), // USDC
                holder: address!("Ce2CC46682E9C6D5f174aF598fb4931a9c0bE68e"),
            },
            FundingSource {
                token: address!("DA10009cBd5D07dd0CeCc66161FC93D7c9000da1"), // DAI
                holder: address!("c5ed2333f8a2C351fCA35E5EBAdb2A82F5d254C3"),
            },
            FundingSource {
                token: address!("Fd086bC7CD5C481DCC9C85ebE478A1C0b69FCbb9"), // USDT
                holder: address!("f89d7b9c864f589bbF53a82105107622B35EaA40"),
            },
            FundingSource {
                token: address!("f97f4df75117a78c1A5a0DBb814Af92458539FB4"), // LINK
                holder: address!("1714400FF23dB4aF24F9fd64e7039e6597f18C2b"),
            },
        ],
        defaults: SimDefaults {
            wallet: address!("c2707568D31F3fB1Fc55B2F8b2ae5682eAa72041"),
            dex_router: None,
            approve_proxy: None,
            bridge_router: None,
            invest_entrance: None,
        },
    }
}

pub(super) fn avalanche() -> ChainTables {
    ChainTables {
        chain: ChainId::Avalanche,
        tokens: vec![
            native(18),
            TokenDescriptor::new("WAVAX", address!("B31f66AA3C1e785363F0875A1B74E27b85FD66c7"), 18),
            TokenDescriptor::new("DAI", address!("d586E7F844cEa2F87f50152665BCbc2C279D8d70"), 18),
            TokenDescriptor::new("USDC", address!("A7D7079b0FEaD91F3e65f86E8915Cb59c1a4C664"), 6),
        ],
        swap_routers: HashMap::from([(Venue::SushiSwap, SUSHI_MULTICHAIN_ROUTER)]),
        v3_quoter: None,
        balancer_vault: None,
        bancor_network: None,
        dodo_sell_helper: None,
        curve_meta_registry: None,
        funding_sources: vec![
            FundingSource {
                token: NATIVE_TOKEN,
                holder: address!("4aeFa39caEAdD662aE31ab0CE7c8C2c9c0a013E8"),
            },
            FundingSource {
                token: address!("B31f66AA3C1e785363F0875A1B74E27b85FD66c7"), // WAVAX
                holder: address!("BBff2A8ec8D702E61faAcCF7cf705968BB6a5baB"),
            },
            FundingSource {
                token: address!("d586E7F844cEa2F87f50152665BCbc2C279D8d70"), // DAI
                holder: address!("4188663a85C92EEa35b5AD3AA5cA7CeB237C6fe9"),
            },
            FundingSource {
                token: address!("A7D7079b0FEaD91F3e65f86E8915Cb59c1a4C664"), // USDC
                holder: address!("4aeFa39caEAdD662aE31ab0CE7c8C2c9c0a013E8"),
            },
        ],
        defaults: SimDefaults {
            wallet: address!("4aeFa39caEAdD662aE31ab0CE7c8C2c9c0a013E8"),
            dex_router: None,
            approve_proxy: None,
            bridge_router: None,
            invest_entrance: None,
        },
    }
}
