use ethers::types::Address;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::FeedError;

/// One entry of the Chainlink reference-data directory. Only the fields we
/// match on are deserialized; the directory carries many more.
#[derive(Debug, Deserialize)]
pub struct DirectoryEntry {
    pub name: Option<String>,
    #[serde(rename = "proxyAddress")]
    pub proxy_address: Option<String>,
}

/// Resolves asset-pair symbols to feed proxy addresses via the published
/// Chainlink feed directory.
pub struct FeedDirectory {
    client: Client,
    url: String,
}

impl FeedDirectory {
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
        }
    }

    /// Resolve `symbol` to a feed address. A symbol that already parses as a
    /// 0x address resolves to itself without touching the directory.
    pub async fn resolve(&self, symbol: &str) -> Result<Address, FeedError> {
        if let Ok(address) = symbol.parse::<Address>() {
            debug!("Symbol {} is already an address", symbol);
            return Ok(address);
        }

        let entries: Vec<DirectoryEntry> = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        info!("📖 Feed directory loaded: {} entries", entries.len());

        let entry = find_entry(&entries, symbol)
            .ok_or_else(|| FeedError::UnknownSymbol(symbol.to_string()))?;

        let proxy = entry
            .proxy_address
            .as_deref()
            .ok_or_else(|| FeedError::UnknownSymbol(symbol.to_string()))?;

        proxy
            .parse::<Address>()
            .map_err(|_| FeedError::InvalidAddress(proxy.to_string()))
    }
}

/// Directory names look like `ETH / USD` while symbols look like `ETH_USD`.
/// An exact normalized-name match wins over any substring match, regardless
/// of directory order; the substring pass only runs when no entry matches
/// exactly, to catch decorated names.
fn find_entry<'a>(entries: &'a [DirectoryEntry], symbol: &str) -> Option<&'a DirectoryEntry> {
    let wanted = normalize_symbol(symbol);

    entries
        .iter()
        .find(|entry| {
            entry
                .name
                .as_deref()
                .map(|name| name.to_ascii_lowercase() == wanted)
                .unwrap_or(false)
        })
        .or_else(|| {
            entries.iter().find(|entry| {
                entry
                    .name
                    .as_deref()
                    .map(|name| name.to_ascii_lowercase().contains(&wanted))
                    .unwrap_or(false)
            })
        })
}

fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().replace('_', " / ").to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("ETH_USD"), "eth / usd");
        assert_eq!(normalize_symbol(" btc_usd "), "btc / usd");
        assert_eq!(normalize_symbol("LINK"), "link");
    }

    fn entry(name: &str, proxy: &str) -> DirectoryEntry {
        DirectoryEntry {
            name: Some(name.to_string()),
            proxy_address: Some(proxy.to_string()),
        }
    }

    #[test]
    fn test_exact_name_match() {
        let entries = vec![entry("BTC / USD", "0x111"), entry("eth / usd", "0x222")];
        let found = find_entry(&entries, "ETH_USD").unwrap();
        assert_eq!(found.proxy_address.as_deref(), Some("0x222"));
    }

    #[test]
    fn test_exact_match_wins_over_earlier_substring() {
        // "STETH / USD" contains "eth / usd" and sorts first in the
        // directory; the exact entry must still win.
        let entries = vec![entry("STETH / USD", "0x111"), entry("ETH / USD", "0x222")];
        let found = find_entry(&entries, "ETH_USD").unwrap();
        assert_eq!(found.proxy_address.as_deref(), Some("0x222"));
    }

    #[test]
    fn test_substring_fallback_for_decorated_names() {
        let entries = vec![entry("ETH / USD (Mainnet)", "0xe7h")];
        let found = find_entry(&entries, "ETH_USD").unwrap();
        assert_eq!(found.proxy_address.as_deref(), Some("0xe7h"));
    }

    #[test]
    fn test_no_match() {
        let entries = vec![entry("BTC / USD", "0x111")];
        assert!(find_entry(&entries, "ETH_USD").is_none());
        assert!(find_entry(&[], "ETH_USD").is_none());
    }

    #[tokio::test]
    async fn test_address_passthrough() {
        // Never hits the network for a symbol that is already an address
        let directory = FeedDirectory::new("http://invalid.invalid/feeds.json");
        let address = directory
            .resolve("0x5f4eC3Df9cbd43714FE2740f5E3616155c5b8419")
            .await
            .unwrap();
        assert_eq!(
            format!("{:?}", address),
            "0x5f4ec3df9cbd43714fe2740f5e3616155c5b8419"
        );
    }

    #[tokio::test]
    async fn test_unknown_symbol_without_directory() {
        let directory = FeedDirectory::new("http://invalid.invalid/feeds.json");
        let result = directory.resolve("NOT_A_FEED").await;
        assert!(matches!(result, Err(FeedError::DirectoryUnavailable(_))));
    }
}
