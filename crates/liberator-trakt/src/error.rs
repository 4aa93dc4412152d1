use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraktError {
    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("not authenticated with Trakt")]
    NotAuthenticated,

    #[error("failed to write dry-run output {}: {source}", path.display())]
    DryRun {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}
