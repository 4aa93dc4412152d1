//! Projections from export records to Trakt request shapes.
//!
//! Every function here is a pure filter+map over the full record set, so the
//! same export always produces the same batches.

use liberator_models::{
    HiddenBatch, HiddenShow, HistoryBatch, HistoryEpisode, HistoryMovie, HistorySeason, HistoryShow,
    Movie, Season, Show, ShowStatus, SyncBatch, WatchlistBatch, WatchlistMovie, WatchlistShow,
};
use crate::ids::{normalize_movie_ids, normalize_show_ids};

/// Shows that were never started
pub fn watchlist_shows(shows: &[Show]) -> Vec<WatchlistShow> {
    shows
        .iter()
        .filter(|show| show.status == ShowStatus::NotStartedYet)
        .map(|show| WatchlistShow {
            ids: normalize_show_ids(&show.id),
        })
        .collect()
}

/// Every movie, watched or not
pub fn watchlist_movies(movies: &[Movie]) -> Vec<WatchlistMovie> {
    movies
        .iter()
        .map(|movie| WatchlistMovie {
            watched_at: movie.watched_at.clone(),
            ids: normalize_movie_ids(&movie.id),
        })
        .collect()
}

fn history_season(season: &Season) -> HistorySeason {
    HistorySeason {
        number: season.number,
        episodes: season
            .episodes
            .iter()
            .filter(|episode| episode.is_watched)
            .map(|episode| HistoryEpisode {
                watched_at: episode.watched_at.clone(),
                number: episode.number,
            })
            .collect(),
    }
}

/// Every show with every season; only watched episodes are listed
pub fn history_shows(shows: &[Show]) -> Vec<HistoryShow> {
    shows
        .iter()
        .map(|show| HistoryShow {
            ids: normalize_show_ids(&show.id),
            seasons: show.seasons.iter().map(history_season).collect(),
        })
        .collect()
}

pub fn history_movies(movies: &[Movie]) -> Vec<HistoryMovie> {
    movies
        .iter()
        .filter(|movie| movie.is_watched)
        .map(|movie| HistoryMovie {
            watched_at: movie.watched_at.clone(),
            ids: normalize_movie_ids(&movie.id),
        })
        .collect()
}

/// Shows the user stopped watching
pub fn hidden_shows(shows: &[Show]) -> Vec<HiddenShow> {
    shows
        .iter()
        .filter(|show| show.status == ShowStatus::Stopped)
        .map(|show| HiddenShow {
            ids: normalize_show_ids(&show.id),
        })
        .collect()
}

pub fn watchlist_batch(shows: &[Show], movies: &[Movie]) -> WatchlistBatch {
    SyncBatch {
        shows: watchlist_shows(shows),
        movies: watchlist_movies(movies),
    }
}

pub fn history_batch(shows: &[Show], movies: &[Movie]) -> HistoryBatch {
    SyncBatch {
        shows: history_shows(shows),
        movies: history_movies(movies),
    }
}

pub fn hidden_batch(shows: &[Show]) -> HiddenBatch {
    HiddenBatch {
        shows: hidden_shows(shows),
    }
}
