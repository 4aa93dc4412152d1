use serde::Serialize;
use crate::media_ids::RemoteIds;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WatchlistShow {
    pub ids: RemoteIds,
}

/// Watchlist entry for a movie.
///
/// `watched_at` rides along whether or not the movie was watched.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WatchlistMovie {
    pub watched_at: Option<String>,
    pub ids: RemoteIds,
}
