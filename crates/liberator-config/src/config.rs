use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TRAKT_API_URL: &str = "https://api.trakt.tv";

/// Trakt allows one POST/PUT/DELETE per second per user
pub const DEFAULT_REQUEST_INTERVAL_MS: u64 = 1000;

/// Environment variable pointing at the export directory
pub const EXPORT_PATH_ENV: &str = "LIBERATOR_EXPORT_PATH";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub trakt: TraktConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraktConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Directory holding `shows.json` and `movies.json`
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
    /// Minimum spacing between the start of two Trakt requests
    #[serde(default = "default_request_interval_ms")]
    pub request_interval_ms: u64,
}

fn default_api_url() -> String {
    DEFAULT_TRAKT_API_URL.to_string()
}

fn default_request_interval_ms() -> u64 {
    DEFAULT_REQUEST_INTERVAL_MS
}

impl Default for TraktConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            api_url: default_api_url(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            export_dir: None,
            request_interval_ms: default_request_interval_ms(),
        }
    }
}

impl ImportConfig {
    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, falling back to defaults when it does not exist yet
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.is_trakt_configured() {
            return Err(anyhow::anyhow!(
                "Trakt client_id and client_secret are not configured"
            ));
        }
        if !self.trakt.api_url.starts_with("http://") && !self.trakt.api_url.starts_with("https://") {
            return Err(anyhow::anyhow!("Invalid Trakt api_url: {}", self.trakt.api_url));
        }
        Ok(())
    }

    pub fn is_trakt_configured(&self) -> bool {
        !self.trakt.client_id.is_empty()
            && self.trakt.client_id != "YOUR_CLIENT_ID"
            && !self.trakt.client_secret.is_empty()
            && self.trakt.client_secret != "YOUR_CLIENT_SECRET"
    }

    /// Pick the export directory: explicit argument, then `LIBERATOR_EXPORT_PATH`,
    /// then the config file
    pub fn resolve_export_dir(&self, explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit
            .or_else(|| std::env::var(EXPORT_PATH_ENV).ok().filter(|v| !v.is_empty()).map(PathBuf::from))
            .or_else(|| self.import.export_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn configured() -> Config {
        Config {
            trakt: TraktConfig {
                client_id: "real_id".to_string(),
                client_secret: "real_secret".to_string(),
                ..TraktConfig::default()
            },
            import: ImportConfig {
                export_dir: Some(PathBuf::from("/data/export")),
                request_interval_ms: 1500,
            },
        }
    }

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();
        configured().save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.trakt.client_id, "real_id");
        assert_eq!(loaded.trakt.api_url, DEFAULT_TRAKT_API_URL);
        assert_eq!(loaded.import.export_dir, Some(PathBuf::from("/data/export")));
        assert_eq!(loaded.import.request_interval(), Duration::from_millis(1500));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str("[trakt]\nclient_id = \"abc\"\n").unwrap();
        assert_eq!(config.trakt.client_id, "abc");
        assert_eq!(config.import.request_interval_ms, DEFAULT_REQUEST_INTERVAL_MS);
        assert!(config.import.export_dir.is_none());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.trakt.client_id = "YOUR_CLIENT_ID".to_string();
        config.trakt.client_secret = "YOUR_CLIENT_SECRET".to_string();
        assert!(!config.is_trakt_configured());

        let mut config = configured();
        assert!(config.validate().is_ok());

        config.trakt.api_url = "api.trakt.tv".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_export_dir_wins() {
        let config = configured();
        let resolved = config.resolve_export_dir(Some(PathBuf::from("/tmp/explicit")));
        assert_eq!(resolved, Some(PathBuf::from("/tmp/explicit")));
    }
}
