use serde::{Deserialize, Serialize};
use crate::status::ShowStatus;

/// Cross-reference ids as they appear in the export.
///
/// The exporter writes `"-1"` for an imdb id it could not find.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportIds {
    #[serde(default)]
    pub tvdb: Option<i64>,
    #[serde(default)]
    pub imdb: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Show {
    pub id: ExportIds,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: ShowStatus,
    #[serde(default)]
    pub seasons: Vec<Season>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Season {
    pub number: u32,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Episode {
    pub number: u32,
    #[serde(default)]
    pub is_watched: bool,
    /// Kept verbatim; only meaningful when `is_watched` is set
    #[serde(default)]
    pub watched_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: ExportIds,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub is_watched: bool,
    #[serde(default)]
    pub watched_at: Option<String>,
}

impl Show {
    pub fn watched_episode_count(&self) -> usize {
        self.seasons
            .iter()
            .flat_map(|season| season.episodes.iter())
            .filter(|episode| episode.is_watched)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_deserializes_export_shape() {
        let raw = r#"{
            "uuid": "8d0f",
            "id": {"tvdb": 81189, "imdb": "tt0903747"},
            "title": "Breaking Bad",
            "status": "stopped",
            "seasons": [
                {"number": 1, "episodes": [
                    {"number": 1, "is_watched": true, "watched_at": "2020-01-01 20:00:00"},
                    {"number": 2, "is_watched": false, "watched_at": null}
                ]}
            ]
        }"#;

        let show: Show = serde_json::from_str(raw).unwrap();
        assert_eq!(show.id.tvdb, Some(81189));
        assert_eq!(show.status, ShowStatus::Stopped);
        assert_eq!(show.seasons[0].episodes.len(), 2);
        assert_eq!(show.watched_episode_count(), 1);
    }

    #[test]
    fn test_movie_defaults_missing_fields() {
        let movie: Movie = serde_json::from_str(r#"{"id": {"imdb": "-1"}}"#).unwrap();
        assert_eq!(movie.id.imdb.as_deref(), Some("-1"));
        assert!(!movie.is_watched);
        assert_eq!(movie.watched_at, None);
    }
}
