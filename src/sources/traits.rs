use async_trait::async_trait;

use crate::errors::SourceResult;
use crate::models::{DiscoverResponse, GuideChannel, LineupEntry};

/// Read access to a tuner's discovery, lineup and guide endpoints
#[async_trait]
pub trait GuideSource: Send + Sync {
    /// Fetch the device description, including the guide auth token
    async fn discover(&self) -> SourceResult<DiscoverResponse>;

    /// Fetch the tunable channel lineup
    async fn lineup(&self) -> SourceResult<Vec<LineupEntry>>;

    /// Fetch guide data.
    ///
    /// `start = None` returns the baseline guide; `Some(ts)` returns the window
    /// starting at `ts`. `Ok(None)` means the API answered with no data.
    async fn guide(&self, device_auth: &str, start: Option<i64>)
        -> SourceResult<Option<Vec<GuideChannel>>>;
}
