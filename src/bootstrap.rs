use std::sync::Arc;
use tracing::info;

use crate::{api::handler::AppState, config::Config, error::AppResult, oracle::ChainlinkOracle};

pub fn initialize_app_state(config: &Config) -> AppResult<AppState> {
    info!("Initializing application components ...");

    let oracle = Arc::new(ChainlinkOracle::new(
        &config.eth_rpc_url,
        &config.feed_directory_url,
    )?);
    info!("✅ Chainlink oracle initialized against {}", config.eth_rpc_url);

    Ok(AppState {
        oracle,
        feed_symbol: config.feed_symbol.clone(),
    })
}
