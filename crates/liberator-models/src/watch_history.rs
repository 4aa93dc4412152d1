use serde::Serialize;
use crate::media_ids::RemoteIds;

/// A show in a history request, with every season of the export.
///
/// Seasons without watched episodes stay in the list with an empty
/// `episodes` array.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryShow {
    pub ids: RemoteIds,
    pub seasons: Vec<HistorySeason>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistorySeason {
    pub number: u32,
    pub episodes: Vec<HistoryEpisode>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryEpisode {
    pub watched_at: Option<String>,
    pub number: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryMovie {
    pub watched_at: Option<String>,
    pub ids: RemoteIds,
}

impl HistoryShow {
    pub fn episode_count(&self) -> usize {
        self.seasons.iter().map(|season| season.episodes.len()).sum()
    }
}
