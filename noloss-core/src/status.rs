//! Pool lifecycle classification
//!
//! Transitions happen on-chain; this only reads the current snapshot and
//! decides which computations apply and which action to offer next.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pool::PoolSnapshot;

/// Discrete lifecycle state of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolStatus {
    /// Betting is open
    Live,
    /// Betting closed, nobody has asked the oracle yet
    AwaitingResolution,
    /// Oracle request made, liveness window still running
    ResolutionPending,
    /// Liveness window elapsed, anyone can settle
    Settleable,
    /// Outcome recorded (terminal)
    Resolved,
}

/// Action a client should offer for a pool in a given status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolAction {
    PlaceBet,
    RequestResolution,
    SettleResolution,
    Claim,
}

impl PoolStatus {
    pub fn next_action(&self) -> Option<PoolAction> {
        match self {
            PoolStatus::Live => Some(PoolAction::PlaceBet),
            PoolStatus::AwaitingResolution => Some(PoolAction::RequestResolution),
            PoolStatus::ResolutionPending => None,
            PoolStatus::Settleable => Some(PoolAction::SettleResolution),
            PoolStatus::Resolved => Some(PoolAction::Claim),
        }
    }

    /// Short label for lists and dashboards
    pub fn label(&self) -> &'static str {
        match self {
            PoolStatus::Live => "Live",
            PoolStatus::AwaitingResolution => "Closed",
            PoolStatus::ResolutionPending => "Resolution pending",
            PoolStatus::Settleable => "Ready to settle",
            PoolStatus::Resolved => "Resolved",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PoolStatus::Live => "live",
            PoolStatus::AwaitingResolution => "awaiting_resolution",
            PoolStatus::ResolutionPending => "resolution_pending",
            PoolStatus::Settleable => "settleable",
            PoolStatus::Resolved => "resolved",
        }
    }
}

impl fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PoolStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "live" => Ok(PoolStatus::Live),
            "awaiting_resolution" | "closed" => Ok(PoolStatus::AwaitingResolution),
            "resolution_pending" | "pending" => Ok(PoolStatus::ResolutionPending),
            "settleable" => Ok(PoolStatus::Settleable),
            "resolved" => Ok(PoolStatus::Resolved),
            _ => Err(format!("Unknown pool status: {}", s)),
        }
    }
}

/// Classify a pool at instant `now`
pub fn classify(pool: &PoolSnapshot, now: i64, liveness_window_secs: i64) -> PoolStatus {
    if pool.resolved {
        PoolStatus::Resolved
    } else if now < pool.end_time {
        PoolStatus::Live
    } else if !pool.request_submitted {
        PoolStatus::AwaitingResolution
    } else if pool.can_settle(now, liveness_window_secs) {
        PoolStatus::Settleable
    } else {
        PoolStatus::ResolutionPending
    }
}
