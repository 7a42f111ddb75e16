use serde::Deserialize;

/// Mainnet feed directory published by Chainlink's reference data project.
const DEFAULT_FEED_DIRECTORY_URL: &str =
    "https://reference-data-directory.vercel.app/feeds-mainnet.json";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub bind_address: String,
    pub eth_rpc_url: String,
    pub feed_directory_url: String,
    pub feed_symbol: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            eth_rpc_url: std::env::var("ETH_RPC_URL")
                .unwrap_or_else(|_| "https://ethereum-rpc.publicnode.com".to_string()),
            feed_directory_url: std::env::var("FEED_DIRECTORY_URL")
                .unwrap_or_else(|_| DEFAULT_FEED_DIRECTORY_URL.to_string()),
            feed_symbol: std::env::var("FEED_SYMBOL")
                .unwrap_or_else(|_| "ETH_USD".to_string()),
        }
    }
}
