use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use tracing::debug;

use super::erc20;
use super::executor::Sandbox;
use crate::error::SimError;
use crate::registry::{Registry, is_native_token};

/// Tops `wallet` up to at least `required` units of `token` from the
/// chain's registered funding source, transferring only the shortfall.
/// Zero requirement or an already-sufficient balance issues no transfer.
pub fn ensure_funded(
    sandbox: &mut Sandbox,
    registry: &Registry,
    wallet: Address,
    token: Address,
    required: U256,
) -> Result<(), SimError> {
    if required.is_zero() {
        return Ok(());
    }
    let current = sandbox.token_balance(token, wallet)?;
    if current >= required {
        return Ok(());
    }
    let shortfall = required - current;

    let source = registry.funding_source(sandbox.chain(), token)?;
    let holder = source.holder;
    let available = sandbox.token_balance(token, holder)?;
    if available < shortfall {
        return Err(SimError::InsufficientFundingSource {
            holder,
            token,
            available,
            required: shortfall,
        });
    }

    sandbox.impersonate(holder);
    if is_native_token(token) {
        sandbox.send_zero_cost(holder, wallet, Bytes::new(), shortfall)?;
    } else {
        let data = erc20::transferCall { to: wallet, amount: shortfall }.abi_encode();
        sandbox.send_zero_cost(holder, token, Bytes::from(data), U256::ZERO)?;
    }
    debug!(%token, %wallet, %shortfall, "funded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ChainId, NATIVE_TOKEN};

    const WALLET: Address = Address::repeat_byte(0x11);

    fn eth(n: u64) -> U256 {
        U256::from(n) * U256::from(10).pow(U256::from(18))
    }

    /// Offline sandbox seeded with the registry's native funding source so
    /// native funding paths run without any network.
    fn seeded(registry: &Registry, holder_balance: U256) -> (Sandbox, Address) {
        let holder = registry.funding_source(ChainId::Ethereum, NATIVE_TOKEN).unwrap().holder;
        let mut sandbox = Sandbox::offline(ChainId::Ethereum);
        sandbox.seed_system_accounts();
        sandbox.seed_account(WALLET, U256::ZERO);
        sandbox.seed_account(holder, holder_balance);
        (sandbox, holder)
    }

    #[test]
    fn test_zero_requirement_is_a_noop() {
        let registry = Registry::mainnet();
        // No accounts seeded: any read would hit the unreachable endpoint.
        let mut sandbox = Sandbox::offline(ChainId::Ethereum);
        ensure_funded(&mut sandbox, &registry, WALLET, NATIVE_TOKEN, U256::ZERO).unwrap();
    }

    #[test]
    fn test_satisfied_balance_issues_no_transfer() {
        let registry = Registry::mainnet();
        let (mut sandbox, holder) = seeded(&registry, eth(5));
        sandbox.seed_account(WALLET, eth(3));
        ensure_funded(&mut sandbox, &registry, WALLET, NATIVE_TOKEN, eth(2)).unwrap();
        assert_eq!(sandbox.native_balance(WALLET).unwrap(), eth(3));
        assert_eq!(sandbox.native_balance(holder).unwrap(), eth(5));
    }

    #[test]
    fn test_funds_only_the_shortfall() {
        let registry = Registry::mainnet();
        let (mut sandbox, holder) = seeded(&registry, eth(100));
        sandbox.seed_account(WALLET, eth(1));
        ensure_funded(&mut sandbox, &registry, WALLET, NATIVE_TOKEN, eth(4)).unwrap();
        assert_eq!(sandbox.native_balance(WALLET).unwrap(), eth(4));
        assert_eq!(sandbox.native_balance(holder).unwrap(), eth(97));
    }

    #[test]
    fn test_unknown_token_is_unsupported() {
        let registry = Registry::mainnet();
        let mut sandbox = Sandbox::offline(ChainId::Ethereum);
        sandbox.seed_system_accounts();
        let bogus = Address::repeat_byte(0x99);
        sandbox.seed_account(WALLET, U256::ZERO);
        // The wallet balance is read before the source lookup, so the token
        // must answer balanceOf: stub code returning one zero word.
        sandbox.seed_contract(bogus, Bytes::from_static(&[0x60, 0x20, 0x60, 0x00, 0xf3]));
        match ensure_funded(&mut sandbox, &registry, WALLET, bogus, U256::from(1u64)) {
            Err(SimError::UnsupportedToken { token, .. }) => assert_eq!(token, bogus),
            other => panic!("expected UnsupportedToken, got {other:?}"),
        }
    }

    #[test]
    fn test_poor_funding_source_is_reported_with_amounts() {
        let registry = Registry::mainnet();
        let (mut sandbox, holder) = seeded(&registry, eth(1));
        match ensure_funded(&mut sandbox, &registry, WALLET, NATIVE_TOKEN, eth(10)) {
            Err(SimError::InsufficientFundingSource { holder: h, available, required, .. }) => {
                assert_eq!(h, holder);
                assert_eq!(available, eth(1));
                assert_eq!(required, eth(10));
            }
            other => panic!("expected InsufficientFundingSource, got {other:?}"),
        }
    }
}
