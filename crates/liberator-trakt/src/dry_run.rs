use async_trait::async_trait;
use liberator_models::{
    HiddenBatch, HiddenPayload, HiddenSection, HistoryBatch, SyncCounts, SyncResponse, UserProfile,
    UserSettings, WatchlistBatch,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use crate::api::ApiResponse;
use crate::error::TraktError;
use crate::traits::TraktApi;

/// Backend that writes each request body to disk instead of sending it.
///
/// Each endpoint has its own file, prefixed with its place in an import
/// (`01-watchlist.json` to `04-hidden-recommendations.json`), so a skipped
/// watchlist leaves a gap instead of shifting the rest. Every submission is
/// answered as if Trakt had added all of it.
pub struct DryRunClient {
    output_dir: PathBuf,
    assume_vip: bool,
}

impl DryRunClient {
    pub fn new(output_dir: PathBuf, assume_vip: bool) -> Self {
        Self {
            output_dir,
            assume_vip,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    async fn write_payload<T: Serialize + ?Sized>(
        &self,
        order: u8,
        name: &str,
        payload: &T,
    ) -> Result<PathBuf, TraktError> {
        let path = self.output_dir.join(format!("{:02}-{}.json", order, name));
        let content = serde_json::to_vec_pretty(payload)?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| TraktError::DryRun { path: self.output_dir.clone(), source })?;
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| TraktError::DryRun { path: path.clone(), source })?;

        info!(path = %path.display(), "Dry run: wrote request body");
        Ok(path)
    }

    fn created(added: SyncCounts) -> Result<ApiResponse, TraktError> {
        let response = SyncResponse {
            added,
            ..SyncResponse::default()
        };
        Ok(ApiResponse::new(201, serde_json::to_string(&response)?))
    }
}

#[async_trait]
impl TraktApi for DryRunClient {
    fn backend_name(&self) -> &str {
        "dry-run"
    }

    async fn user_settings(&self) -> Result<ApiResponse, TraktError> {
        let settings = UserSettings {
            user: UserProfile {
                username: Some("dry-run".to_string()),
                vip: self.assume_vip,
            },
        };
        Ok(ApiResponse::new(200, serde_json::to_string(&settings)?))
    }

    async fn add_to_watchlist(&self, batch: &WatchlistBatch) -> Result<ApiResponse, TraktError> {
        self.write_payload(1, "watchlist", batch).await?;
        Self::created(SyncCounts {
            shows: batch.shows.len() as u64,
            movies: batch.movies.len() as u64,
            ..SyncCounts::default()
        })
    }

    async fn add_to_history(&self, batch: &HistoryBatch) -> Result<ApiResponse, TraktError> {
        self.write_payload(2, "history", batch).await?;
        Self::created(SyncCounts {
            movies: batch.movies.len() as u64,
            episodes: batch.episode_count() as u64,
            ..SyncCounts::default()
        })
    }

    async fn add_hidden_items(
        &self,
        section: HiddenSection,
        batch: &HiddenBatch,
    ) -> Result<ApiResponse, TraktError> {
        let payload = HiddenPayload {
            shows: &batch.shows,
            section,
        };
        let order = match section {
            HiddenSection::ProgressWatched => 3,
            HiddenSection::Recommendations => 4,
        };
        self.write_payload(order, &format!("hidden-{}", section), &payload).await?;
        Self::created(SyncCounts {
            shows: batch.shows.len() as u64,
            ..SyncCounts::default()
        })
    }
}
