use serde::{Deserialize, Serialize};

use crate::oracle::FeedData;

/// Response body for the feed routes: the captured path echoed back plus the
/// fetched feed data, untransformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedGreeting {
    pub hello: String,
    pub feeds: FeedData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}
