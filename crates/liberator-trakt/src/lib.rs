pub mod api;
pub mod auth;
pub mod client;
pub mod dry_run;
pub mod error;
pub mod throttle;
pub mod traits;

pub use api::ApiResponse;
pub use auth::{authenticate as trakt_authenticate, TokenInfo};
pub use client::TraktClient;
pub use dry_run::DryRunClient;
pub use error::TraktError;
pub use throttle::{RateLimitedClient, RequestGate};
pub use traits::TraktApi;
