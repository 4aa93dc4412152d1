use liberator_models::{HiddenBatch, HiddenPayload, HiddenSection, HistoryBatch, WatchlistBatch};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use crate::error::TraktError;

/// Status and body of a Trakt response, read to the end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx answer into [`TraktError::Status`]
    pub fn error_for_status(self, endpoint: &str) -> Result<Self, TraktError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TraktError::Status {
                endpoint: endpoint.to_string(),
                status: self.status,
                body: self.body,
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Everything an authenticated request needs
pub struct ApiContext<'a> {
    pub client: &'a Client,
    pub base_url: &'a str,
    pub access_token: &'a str,
    pub client_id: &'a str,
}

impl ApiContext<'_> {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("trakt-api-version", "2")
            .header("trakt-api-key", self.client_id)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
    }
}

async fn read_response(endpoint: &str, builder: RequestBuilder) -> Result<ApiResponse, TraktError> {
    let response = builder.send().await.map_err(|source| TraktError::Http {
        endpoint: endpoint.to_string(),
        source,
    })?;

    let status = response.status().as_u16();
    let body = response.text().await.map_err(|source| TraktError::Http {
        endpoint: endpoint.to_string(),
        source,
    })?;

    debug!(endpoint, status, body_len = body.len(), "Trakt response");
    Ok(ApiResponse { status, body })
}

async fn post_json<T: Serialize + ?Sized>(
    ctx: &ApiContext<'_>,
    path: &str,
    payload: &T,
) -> Result<ApiResponse, TraktError> {
    let body = serde_json::to_vec(payload)?;
    debug!(endpoint = path, bytes = body.len(), "Posting to Trakt");
    read_response(path, ctx.authorized(ctx.client.post(ctx.url(path))).body(body)).await
}

/// Fetch account settings (includes the VIP flag)
pub async fn get_user_settings(ctx: &ApiContext<'_>) -> Result<ApiResponse, TraktError> {
    let path = "/users/settings";
    read_response(path, ctx.authorized(ctx.client.get(ctx.url(path)))).await
}

/// Add shows and movies to the watchlist
pub async fn add_to_watchlist(ctx: &ApiContext<'_>, batch: &WatchlistBatch) -> Result<ApiResponse, TraktError> {
    post_json(ctx, "/sync/watchlist", batch).await
}

/// Add watched episodes (nested under shows and seasons) and movies to history
pub async fn add_to_history(ctx: &ApiContext<'_>, batch: &HistoryBatch) -> Result<ApiResponse, TraktError> {
    post_json(ctx, "/sync/history", batch).await
}

/// Hide shows from one list section
pub async fn add_hidden_items(
    ctx: &ApiContext<'_>,
    section: HiddenSection,
    batch: &HiddenBatch,
) -> Result<ApiResponse, TraktError> {
    let path = format!("/users/hidden/{}", section);
    let payload = HiddenPayload {
        shows: &batch.shows,
        section,
    };
    post_json(ctx, &path, &payload).await
}
