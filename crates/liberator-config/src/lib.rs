pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{Config, ImportConfig, TraktConfig, DEFAULT_REQUEST_INTERVAL_MS, DEFAULT_TRAKT_API_URL, EXPORT_PATH_ENV};
pub use credentials::CredentialStore;
pub use paths::{PathManager, home_override};
