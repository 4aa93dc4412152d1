use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

/// Create the HTTP client used for every Trakt request
pub fn create_trakt_client() -> Client {
    Client::builder()
        .user_agent(concat!("liberator-import/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Debug, Deserialize)]
struct DeviceCodeResponse {
    device_code: String,
    user_code: String,
    verification_url: String,
    expires_in: u64,
    interval: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
}

#[derive(Debug)]
pub struct TokenInfo {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<TokenResponse> for TokenInfo {
    fn from(response: TokenResponse) -> Self {
        // Two minutes of slack so a token never expires mid-import
        let expires_at = Utc::now() + Duration::seconds(response.expires_in - 120);
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at,
        }
    }
}

/// Obtain a token: refresh when possible, otherwise run the device flow
pub async fn authenticate(
    client: &Client,
    api_url: &str,
    client_id: &str,
    client_secret: &str,
    refresh_token: Option<&str>,
) -> Result<TokenInfo> {
    if let Some(refresh_token) = refresh_token {
        match refresh_access_token(client, api_url, client_id, client_secret, refresh_token).await {
            Ok(token_info) => return Ok(token_info),
            Err(e) => {
                info!("Trakt token refresh failed ({}), starting device authorization", e);
            }
        }
    }

    authorize_device(client, api_url, client_id, client_secret).await
}

async fn refresh_access_token(
    client: &Client,
    api_url: &str,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Result<TokenInfo> {
    let payload = serde_json::json!({
        "refresh_token": refresh_token,
        "client_id": client_id,
        "client_secret": client_secret,
        "redirect_uri": "urn:ietf:wg:oauth:2.0:oob",
        "grant_type": "refresh_token"
    });

    let response = client
        .post(format!("{}/oauth/token", api_url))
        .header("Content-Type", "application/json")
        .json(&payload)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(anyhow!("Token refresh failed: {}", response.status()));
    }

    let token_response: TokenResponse = response.json().await?;
    Ok(token_response.into())
}

async fn authorize_device(
    client: &Client,
    api_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<TokenInfo> {
    let response = client
        .post(format!("{}/oauth/device/code", api_url))
        .header("Content-Type", "application/json")
        .json(&serde_json::json!({ "client_id": client_id }))
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(anyhow!("Failed to request device code: {} - {}", status, error_text));
    }

    let device: DeviceCodeResponse = response.json().await?;

    println!("\nTo authorize liberator-import, visit: {}", device.verification_url);
    println!("and enter the code: {}\n", device.user_code);

    let mut interval = std::time::Duration::from_secs(device.interval.max(1));
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(device.expires_in);

    while std::time::Instant::now() < deadline {
        tokio::time::sleep(interval).await;

        let response = client
            .post(format!("{}/oauth/device/token", api_url))
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({
                "code": device.device_code,
                "client_id": client_id,
                "client_secret": client_secret,
            }))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let token_response: TokenResponse = response.json().await?;
                info!("Trakt device authorization approved");
                return Ok(token_response.into());
            }
            // Pending: the user has not entered the code yet
            StatusCode::BAD_REQUEST => debug!("Waiting for device authorization"),
            StatusCode::TOO_MANY_REQUESTS => {
                interval += std::time::Duration::from_secs(1);
                debug!(interval_secs = interval.as_secs(), "Slowing down device polling");
            }
            StatusCode::NOT_FOUND => return Err(anyhow!("Invalid device code")),
            StatusCode::CONFLICT => return Err(anyhow!("Device code already used")),
            StatusCode::GONE => return Err(anyhow!("Device code expired, please try again")),
            StatusCode::IM_A_TEAPOT => return Err(anyhow!("Authorization was denied")),
            status => return Err(anyhow!("Unexpected response while polling for token: {}", status)),
        }
    }

    Err(anyhow!("Device code expired before authorization completed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_expiry_keeps_slack() {
        let info: TokenInfo = TokenResponse {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_in: 7_776_000,
        }
        .into();

        let remaining = info.expires_at - Utc::now();
        assert!(remaining < Duration::seconds(7_776_000 - 119));
        assert!(remaining > Duration::seconds(7_776_000 - 130));
    }
}
