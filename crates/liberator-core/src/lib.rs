pub mod capacity;
pub mod export;
pub mod ids;
pub mod sync;
pub mod transform;

pub use capacity::{CapacityDecision, CapacityReport, FREE_WATCHLIST_LIMIT, VIP_WATCHLIST_LIMIT};
pub use export::{load_export, ExportData, ExportError};
pub use sync::{
    LoggingObserver, StepOutcome, StepRecord, SyncError, SyncObserver, SyncOrchestrator, SyncReport,
    SyncStep, CONTINUE_PROMPT,
};
