// Four-Layer Architecture
pub mod registry; // Data Layer: static per-chain tables (tokens, routers, funding sources)
pub mod rpc;      // Access Layer: pinned-block JSON-RPC reads
pub mod quote;    // Quote Layer: venue dispatch and per-family quoting strategies
pub mod sandbox;  // Execution Layer: forked-state simulation, funding, accounting

pub mod error;

// Re-export key components from each layer
pub use error::SimError;
pub use registry::{
    ChainId, ChainTables, FundingSource, Registry, SimDefaults, TokenDescriptor,
    is_native_token, NATIVE_TOKEN,
};
pub use rpc::{ChainReader, HttpRpc, RpcError};
pub use quote::{
    QuoteFamily, QuoteRequest, QuoteResult, Quoter, Venue, VenueDescriptor,
};
pub use sandbox::{
    ensure_funded, simulate_invest, simulate_swap, Execution, ExtraFunding, InvestSimRequest,
    InvestSimResult, Sandbox, SwapSimRequest, SwapSimResult, TokenDelta,
};
