pub mod chainlink;
pub mod directory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ethers::types::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FeedError;

pub use chainlink::ChainlinkOracle;
pub use directory::FeedDirectory;

/// Latest round data for one feed, serialized verbatim into the response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedData {
    /// Proxy address of the aggregator the data was read from
    pub feed: String,
    /// On-chain feed description, e.g. "ETH / USD"
    pub description: String,
    pub decimals: u8,
    pub round_id: u128,
    /// Raw int256 answer, undecoded
    pub answer: String,
    /// Answer scaled by the feed's decimals
    pub price: Decimal,
    pub started_at: i64,
    pub updated_at: i64,
    pub answered_in_round: u128,
    pub fetched_at: DateTime<Utc>,
}

/// Seam over the two external collaborators: symbol resolution and the
/// on-chain read. Handlers only see this trait.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Resolve an asset-pair symbol (e.g. `ETH_USD`) to a feed proxy address.
    async fn resolve_feed_address(&self, symbol: &str) -> Result<Address, FeedError>;

    /// Fetch the latest round data from a resolved feed address.
    async fn get_feed_data(&self, address: Address) -> Result<FeedData, FeedError>;
}
