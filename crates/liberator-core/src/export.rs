use liberator_models::{Movie, Show};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const SHOWS_FILE: &str = "shows.json";
pub const MOVIES_FILE: &str = "movies.json";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a valid export document: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Both export documents, decoded
#[derive(Debug, Clone, Default)]
pub struct ExportData {
    pub shows: Vec<Show>,
    pub movies: Vec<Movie>,
}

async fn read_document<T: DeserializeOwned>(path: PathBuf) -> Result<Vec<T>, ExportError> {
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| ExportError::Io { path: path.clone(), source })?;

    serde_json::from_str(&content).map_err(|source| ExportError::Parse { path, source })
}

/// Load `shows.json` and `movies.json` from an export directory
pub async fn load_export(dir: &Path) -> Result<ExportData, ExportError> {
    let shows: Vec<Show> = read_document(dir.join(SHOWS_FILE)).await?;
    let movies: Vec<Movie> = read_document(dir.join(MOVIES_FILE)).await?;

    info!(
        dir = %dir.display(),
        shows = shows.len(),
        movies = movies.len(),
        "Loaded export"
    );

    Ok(ExportData { shows, movies })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SHOWS: &str = r#"[
        {"id": {"tvdb": 305288, "imdb": "tt4574334"}, "title": "Stranger Things", "status": "in_progress",
         "seasons": [{"number": 1, "episodes": [{"number": 1, "is_watched": true, "watched_at": "2022-05-27 12:00:00"}]}]}
    ]"#;

    #[tokio::test]
    async fn test_load_export() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SHOWS_FILE), SHOWS).unwrap();
        std::fs::write(
            dir.path().join(MOVIES_FILE),
            r#"[{"id": {"imdb": "tt0133093"}, "is_watched": false}]"#,
        )
        .unwrap();

        let export = load_export(dir.path()).await.unwrap();
        assert_eq!(export.shows.len(), 1);
        assert_eq!(export.shows[0].title.as_deref(), Some("Stranger Things"));
        assert_eq!(export.movies.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SHOWS_FILE), SHOWS).unwrap();

        match load_export(dir.path()).await {
            Err(ExportError::Io { path, .. }) => assert!(path.ends_with(MOVIES_FILE)),
            other => panic!("expected an io error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wrong_shape_is_parse_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SHOWS_FILE), r#"{"shows": []}"#).unwrap();
        std::fs::write(dir.path().join(MOVIES_FILE), "[]").unwrap();

        match load_export(dir.path()).await {
            Err(ExportError::Parse { path, .. }) => assert!(path.ends_with(SHOWS_FILE)),
            other => panic!("expected a parse error, got {:?}", other),
        }
    }
}
