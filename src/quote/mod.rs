//! Venue dispatch: one entry point, a descriptor table, and one strategy
//! per quoting family. All reads for a request share a single pinned block.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use tracing::info;

pub mod strategies;
mod venue;

#[cfg(test)]
mod tests;

pub use strategies::QuoteStrategy;
pub use venue::{QuoteFamily, Venue, VenueDescriptor};

use crate::error::SimError;
use crate::registry::{ChainId, Registry};
use crate::rpc::{ChainReader, HttpRpc};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub chain: ChainId,
    pub venue: Venue,
    pub input_token: Address,
    pub output_token: Address,
    pub amount_in: U256,
    #[serde(default)]
    pub pool: Option<Address>,
    /// Quote height; `None` pins to the head resolved at entry.
    #[serde(default)]
    pub block: Option<u64>,
}

/// Amounts are native integer units of the respective token, unscaled.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuoteResult {
    pub input_token: Address,
    pub output_token: Address,
    pub amount_in: U256,
    pub amount_out: U256,
    pub block: u64,
    pub venue_name: String,
}

/// One quote request's resolved inputs, shared by every strategy read.
pub struct QuoteContext<'a> {
    pub registry: &'a Registry,
    pub reader: &'a dyn ChainReader,
    pub chain: ChainId,
    pub venue: Venue,
    pub input_token: Address,
    pub output_token: Address,
    pub amount_in: U256,
    pub pool: Option<Address>,
    pub block: u64,
}

impl QuoteContext<'_> {
    pub fn pool(&self) -> Result<Address, SimError> {
        self.pool.ok_or(SimError::MissingPoolAddress(self.venue))
    }

    /// `eth_call` at the context's pinned block.
    pub async fn read(&self, to: Address, data: Vec<u8>) -> Result<Bytes, SimError> {
        Ok(self.reader.call(to, Bytes::from(data), Some(self.block)).await?)
    }
}

pub struct Quoter {
    registry: Arc<Registry>,
}

impl Quoter {
    pub fn new(registry: Arc<Registry>) -> Self {
        Quoter { registry }
    }

    /// Quotes against the registry's RPC endpoint for the request's chain.
    pub async fn quote(&self, request: &QuoteRequest) -> Result<QuoteResult, SimError> {
        let reader = HttpRpc::new(self.registry.rpc_url(request.chain));
        self.quote_with(&reader, request).await
    }

    pub async fn quote_with(
        &self,
        reader: &dyn ChainReader,
        request: &QuoteRequest,
    ) -> Result<QuoteResult, SimError> {
        let descriptor = request.venue.descriptor();
        if descriptor.requires_pool && request.pool.is_none() {
            return Err(SimError::MissingPoolAddress(request.venue));
        }
        // Resolved once so every read of this request sees the same state.
        let block = match request.block {
            Some(height) => height,
            None => reader.block_number().await?,
        };
        let ctx = QuoteContext {
            registry: &self.registry,
            reader,
            chain: request.chain,
            venue: request.venue,
            input_token: request.input_token,
            output_token: request.output_token,
            amount_in: request.amount_in,
            pool: request.pool,
            block,
        };
        let amount_out = descriptor.family.strategy().quote(&ctx).await?;
        info!(
            chain = %request.chain,
            venue = %request.venue,
            block,
            %amount_out,
            "quote served"
        );
        Ok(QuoteResult {
            input_token: request.input_token,
            output_token: request.output_token,
            amount_in: request.amount_in,
            amount_out,
            block,
            venue_name: request.venue.to_string(),
        })
    }
}
