use serde::Serialize;
use crate::hidden::HiddenShow;
use crate::watch_history::{HistoryMovie, HistoryShow};
use crate::watchlist::{WatchlistMovie, WatchlistShow};

/// One bulk request worth of shows and movies
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SyncBatch<S, M> {
    pub shows: Vec<S>,
    pub movies: Vec<M>,
}

pub type WatchlistBatch = SyncBatch<WatchlistShow, WatchlistMovie>;
pub type HistoryBatch = SyncBatch<HistoryShow, HistoryMovie>;

impl<S, M> SyncBatch<S, M> {
    pub fn item_count(&self) -> usize {
        self.shows.len() + self.movies.len()
    }
}

impl HistoryBatch {
    /// Number of watched episodes across all shows
    pub fn episode_count(&self) -> usize {
        self.shows.iter().map(HistoryShow::episode_count).sum()
    }
}

/// Stopped shows; submitted once per hidden section
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HiddenBatch {
    pub shows: Vec<HiddenShow>,
}

impl HiddenBatch {
    pub fn item_count(&self) -> usize {
        self.shows.len()
    }
}
