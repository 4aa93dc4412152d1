use serde::Serialize;

/// Watchlist cap on a free Trakt account
pub const FREE_WATCHLIST_LIMIT: usize = 100;

/// Watchlist cap on a VIP Trakt account
pub const VIP_WATCHLIST_LIMIT: usize = 10_000;

pub fn watchlist_limit(vip: bool) -> usize {
    if vip {
        VIP_WATCHLIST_LIMIT
    } else {
        FREE_WATCHLIST_LIMIT
    }
}

/// Why a watchlist submission was held back
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacityReport {
    pub shows: usize,
    pub movies: usize,
    pub total: usize,
    pub limit: usize,
    pub vip: bool,
}

impl CapacityReport {
    pub fn tier(&self) -> &'static str {
        if self.vip {
            "VIP"
        } else {
            "FREE"
        }
    }

    /// Only free accounts can raise their limit
    pub fn upgrade_hint(&self) -> Option<String> {
        if self.vip {
            None
        } else {
            Some(format!(
                "Trakt VIP members get a {} item limit. Upgrade at https://trakt.tv/vip",
                VIP_WATCHLIST_LIMIT
            ))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapacityDecision {
    Proceed,
    Blocked(CapacityReport),
}

/// Check a pending watchlist submission against the account's cap.
///
/// A batch exactly at the limit is allowed.
pub fn decide(vip: bool, pending_shows: usize, pending_movies: usize) -> CapacityDecision {
    let limit = watchlist_limit(vip);
    let total = pending_shows + pending_movies;

    if total > limit {
        CapacityDecision::Blocked(CapacityReport {
            shows: pending_shows,
            movies: pending_movies,
            total,
            limit,
            vip,
        })
    } else {
        CapacityDecision::Proceed
    }
}
