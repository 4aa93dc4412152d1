pub mod batch;
pub mod hidden;
pub mod media;
pub mod media_ids;
pub mod profile;
pub mod response;
pub mod status;
pub mod watch_history;
pub mod watchlist;

pub use batch::{HiddenBatch, HistoryBatch, SyncBatch, WatchlistBatch};
pub use hidden::{HiddenPayload, HiddenSection, HiddenShow};
pub use media::{Episode, ExportIds, Movie, Season, Show};
pub use media_ids::{IdValue, NumericId, RemoteIds, TextId};
pub use profile::{UserProfile, UserSettings};
pub use response::{NotFound, SyncCounts, SyncResponse};
pub use status::ShowStatus;
pub use watch_history::{HistoryEpisode, HistoryMovie, HistorySeason, HistoryShow};
pub use watchlist::{WatchlistMovie, WatchlistShow};
