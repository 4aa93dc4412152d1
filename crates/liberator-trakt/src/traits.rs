use async_trait::async_trait;
use liberator_models::{HiddenBatch, HiddenSection, HistoryBatch, WatchlistBatch};
use crate::api::ApiResponse;
use crate::error::TraktError;

/// The Trakt endpoints an import touches.
///
/// Implementations report whatever status the remote answered with; deciding
/// whether a status is a failure is left to the caller.
#[async_trait]
pub trait TraktApi: Send + Sync {
    fn backend_name(&self) -> &str;

    /// `GET /users/settings`
    async fn user_settings(&self) -> Result<ApiResponse, TraktError>;

    /// `POST /sync/watchlist`
    async fn add_to_watchlist(&self, batch: &WatchlistBatch) -> Result<ApiResponse, TraktError>;

    /// `POST /sync/history`
    async fn add_to_history(&self, batch: &HistoryBatch) -> Result<ApiResponse, TraktError>;

    /// `POST /users/hidden/{section}`
    async fn add_hidden_items(
        &self,
        section: HiddenSection,
        batch: &HiddenBatch,
    ) -> Result<ApiResponse, TraktError>;
}
