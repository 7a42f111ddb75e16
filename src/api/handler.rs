use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::models::{FeedGreeting, HealthResponse};
use crate::error::AppResult;
use crate::oracle::PriceOracle;

#[derive(Clone)]
pub struct AppState {
    pub oracle: Arc<dyn PriceOracle>,
    /// Asset-pair symbol every request resolves; never derived from the path.
    pub feed_symbol: String,
}

/// Feed lookup on the root route
/// GET /
pub async fn get_feeds_root(State(state): State<AppState>) -> AppResult<Json<FeedGreeting>> {
    fetch_feeds(&state, String::new()).await
}

/// Feed lookup on any sub-path; the captured tail is echoed back as `hello`
/// GET /*path
pub async fn get_feeds(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> AppResult<Json<FeedGreeting>> {
    fetch_feeds(&state, path).await
}

/// Resolve the configured symbol, then fetch the latest round data from the
/// resolved address. The fetch is only issued once resolution succeeds.
async fn fetch_feeds(state: &AppState, path: String) -> AppResult<Json<FeedGreeting>> {
    info!("Feed request for path '{}'", path);

    let address = state.oracle.resolve_feed_address(&state.feed_symbol).await?;
    let feeds = state.oracle.get_feed_data(address).await?;

    Ok(Json(FeedGreeting { hello: path, feeds }))
}

/// Liveness probe
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
    })
}
