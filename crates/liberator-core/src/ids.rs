use liberator_models::{ExportIds, IdValue, RemoteIds, TextId};

/// What the exporter writes when it has no imdb id for a title
const MISSING_TEXT_ID: &str = "-1";

pub fn normalize_text_id(raw: Option<&str>) -> TextId {
    match raw {
        Some(MISSING_TEXT_ID) | None => IdValue::Unknown,
        Some(value) => IdValue::Known(value.to_string()),
    }
}

/// Trakt id block for a show; slug, tmdb and trakt are never in the export
pub fn normalize_show_ids(ids: &ExportIds) -> RemoteIds {
    RemoteIds {
        tvdb: Some(ids.tvdb.into()),
        imdb: normalize_text_id(ids.imdb.as_deref()),
        slug: IdValue::Unknown,
        tmdb: IdValue::Unknown,
        trakt: IdValue::Unknown,
    }
}

/// Trakt id block for a movie (no tvdb field)
pub fn normalize_movie_ids(ids: &ExportIds) -> RemoteIds {
    RemoteIds {
        tvdb: None,
        imdb: normalize_text_id(ids.imdb.as_deref()),
        slug: IdValue::Unknown,
        tmdb: IdValue::Unknown,
        trakt: IdValue::Unknown,
    }
}
