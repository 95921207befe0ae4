//! Forked-state execution: a disposable revm sandbox over a pinned block,
//! wallet funding from wealthy accounts, balance accounting, and the
//! swap/invest simulation services built on top.

mod accounting;
mod erc20;
mod executor;
mod fork;
mod funding;
mod invest;
mod swap;

pub use accounting::{TokenDelta, deltas, gas_fee, snapshot};
pub use executor::{Execution, Sandbox};
pub use fork::{ForkDb, ForkDbError};
pub use funding::ensure_funded;
pub use invest::{ExtraFunding, InvestSimRequest, InvestSimResult, simulate_invest};
pub use swap::{SwapSimRequest, SwapSimResult, simulate_swap};
