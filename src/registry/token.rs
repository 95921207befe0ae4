use alloy_primitives::{Address, address};

/// Sentinel address standing in for the chain's native coin in token
/// positions (funding amounts, balance snapshots, swap legs).
pub const NATIVE_TOKEN: Address = address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

/// The all-`e` sentinel and the zero address both denote the native coin.
pub fn is_native_token(token: Address) -> bool {
    token == NATIVE_TOKEN || token == Address::ZERO
}

/// A token known to the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenDescriptor {
    pub symbol: &'static str,
    pub address: Address,
    pub decimals: u8,
}

impl TokenDescriptor {
    pub const fn new(symbol: &'static str, address: Address, decimals: u8) -> Self {
        TokenDescriptor { symbol, address, decimals }
    }

    pub fn is_native(&self) -> bool {
        is_native_token(self.address)
    }
}
