use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use liberator_config::CredentialStore;
use liberator_models::{HiddenBatch, HiddenSection, HistoryBatch, WatchlistBatch};
use reqwest::Client;
use tracing::info;
use crate::api::{self, ApiContext, ApiResponse};
use crate::auth;
use crate::error::TraktError;
use crate::traits::TraktApi;

/// HTTP backend talking to the real Trakt API
pub struct TraktClient {
    client: Client,
    api_url: String,
    client_id: String,
    client_secret: String,
    access_token: Option<String>,
}

impl TraktClient {
    pub fn new(api_url: &str, client_id: String, client_secret: String) -> Self {
        Self {
            client: auth::create_trakt_client(),
            api_url: api_url.trim_end_matches('/').to_string(),
            client_id,
            client_secret,
            access_token: None,
        }
    }

    /// Use a saved token when it is still good for a while, otherwise refresh
    /// or authorize this device. New tokens are written back to the store.
    pub async fn authenticate(&mut self, cred_store: &mut CredentialStore) -> Result<()> {
        if let Some(saved_token) = cred_store.get_trakt_access_token() {
            match cred_store.get_trakt_token_expires() {
                Some(expires_at) if expires_at > Utc::now() + Duration::minutes(5) => {
                    self.access_token = Some(saved_token.clone());
                    info!("Using saved Trakt access token (expires at {})", expires_at);
                    return Ok(());
                }
                Some(expires_at) => {
                    info!("Trakt access token expired or expiring soon (expires at {}), refreshing", expires_at);
                }
                None => {
                    info!("Saved Trakt token has no expiration info, refreshing");
                }
            }
        }

        let refresh_token = cred_store.get_trakt_refresh_token().map(|s| s.as_str());
        let token_info = auth::authenticate(
            &self.client,
            &self.api_url,
            &self.client_id,
            &self.client_secret,
            refresh_token,
        )
        .await?;

        self.access_token = Some(token_info.access_token.clone());

        cred_store.set_trakt_access_token(token_info.access_token);
        cred_store.set_trakt_refresh_token(token_info.refresh_token);
        cred_store.set_trakt_token_expires(token_info.expires_at);
        cred_store.save()?;

        info!("Authenticated to Trakt");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    fn context(&self) -> Result<ApiContext<'_>, TraktError> {
        let access_token = self.access_token.as_deref().ok_or(TraktError::NotAuthenticated)?;
        Ok(ApiContext {
            client: &self.client,
            base_url: &self.api_url,
            access_token,
            client_id: &self.client_id,
        })
    }
}

#[async_trait]
impl TraktApi for TraktClient {
    fn backend_name(&self) -> &str {
        "trakt"
    }

    async fn user_settings(&self) -> Result<ApiResponse, TraktError> {
        api::get_user_settings(&self.context()?).await
    }

    async fn add_to_watchlist(&self, batch: &WatchlistBatch) -> Result<ApiResponse, TraktError> {
        api::add_to_watchlist(&self.context()?, batch).await
    }

    async fn add_to_history(&self, batch: &HistoryBatch) -> Result<ApiResponse, TraktError> {
        api::add_to_history(&self.context()?, batch).await
    }

    async fn add_hidden_items(
        &self,
        section: HiddenSection,
        batch: &HiddenBatch,
    ) -> Result<ApiResponse, TraktError> {
        api::add_hidden_items(&self.context()?, section, batch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_requests_fail_before_authentication() {
        let client = TraktClient::new("https://api.trakt.tv/", "id".to_string(), "secret".to_string());
        assert!(!client.is_authenticated());
        assert!(matches!(client.user_settings().await, Err(TraktError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_saved_token_is_reused() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut store = CredentialStore::new(dir.path().join("credentials.toml"));
        store.set_trakt_access_token("saved".to_string());
        store.set_trakt_token_expires(Utc::now() + Duration::days(30));

        let mut client = TraktClient::new("https://api.trakt.tv", "id".to_string(), "secret".to_string());
        client.authenticate(&mut store).await.unwrap();

        assert!(client.is_authenticated());
        assert_eq!(client.access_token.as_deref(), Some("saved"));
    }
}
