use serde::{Deserialize, Serialize};

/// Lifecycle status the exporter assigns to a show
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ShowStatus {
    /// Added but never started; goes to the watchlist
    NotStartedYet,
    InProgress,
    /// Abandoned; hidden from progress and recommendations
    Stopped,
    #[default]
    #[serde(other)]
    Other,
}
