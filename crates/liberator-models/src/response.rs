use serde::{Deserialize, Serialize};

/// Counts Trakt returns for a bulk add request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncCounts {
    #[serde(default)]
    pub movies: u64,
    #[serde(default)]
    pub shows: u64,
    #[serde(default)]
    pub seasons: u64,
    #[serde(default)]
    pub episodes: u64,
}

impl SyncCounts {
    pub fn total(&self) -> u64 {
        self.movies + self.shows + self.seasons + self.episodes
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NotFound {
    #[serde(default)]
    pub movies: Vec<serde_json::Value>,
    #[serde(default)]
    pub shows: Vec<serde_json::Value>,
    #[serde(default)]
    pub seasons: Vec<serde_json::Value>,
    #[serde(default)]
    pub episodes: Vec<serde_json::Value>,
}

impl NotFound {
    pub fn total(&self) -> usize {
        self.movies.len() + self.shows.len() + self.seasons.len() + self.episodes.len()
    }
}

/// Body of a watchlist, history or hidden-items response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SyncResponse {
    #[serde(default)]
    pub added: SyncCounts,
    #[serde(default)]
    pub existing: SyncCounts,
    #[serde(default)]
    pub not_found: NotFound,
}
