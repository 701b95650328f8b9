//! Pool, bet and metrics snapshots read from the `MarketController` contract
//!
//! These are read-only projections of on-chain state. They are rebuilt from
//! fresh chain reads every time and never mutated by the client.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::time::seconds_left;

/// Side of a binary pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Yes,
    No,
}

impl Side {
    /// Contract encoding: `true` is YES
    pub fn as_bool(&self) -> bool {
        matches!(self, Side::Yes)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Yes => "YES",
            Side::No => "NO",
        }
    }
}

impl From<bool> for Side {
    fn from(value: bool) -> Self {
        if value {
            Side::Yes
        } else {
            Side::No
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yes" | "y" | "true" => Ok(Side::Yes),
            "no" | "n" | "false" => Ok(Side::No),
            _ => Err(format!("Unknown side: {}", s)),
        }
    }
}

/// One prediction pool as stored by the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSnapshot {
    /// Pool identifier (1-based on the contract)
    pub id: u64,

    /// Address of the pool creator
    pub creator: String,

    /// Market question
    pub question: String,

    /// Unix timestamp when betting closes
    pub end_time: i64,

    pub total_shares: u128,

    /// All principal in the pool, including the creator's seed
    pub total_principal: u128,

    /// Creator's own seed stake, refunded with the creator reward
    pub creator_principal: u128,

    pub yes_principal: u128,
    pub no_principal: u128,

    /// Time-weighted stake totals per side
    pub total_yes_weight: u128,
    pub total_no_weight: u128,

    pub resolved: bool,

    /// Winning side, meaningful only once `resolved` is set
    pub outcome: Side,

    /// Total yield recorded by the contract at settlement
    pub final_total_yield: u128,

    /// Whether an oracle resolution request has been made
    pub request_submitted: bool,

    /// Unix timestamp of the resolution request
    pub request_time: i64,
}

impl PoolSnapshot {
    /// Betting is still open
    pub fn is_live(&self, now: i64) -> bool {
        !self.resolved && now < self.end_time
    }

    pub fn time_left_seconds(&self, now: i64) -> i64 {
        seconds_left(self.end_time, now)
    }

    /// A resolution request is in flight
    pub fn is_resolution_pending(&self) -> bool {
        self.request_submitted && !self.resolved
    }

    /// The liveness window after the request has elapsed
    pub fn can_settle(&self, now: i64, liveness_window_secs: i64) -> bool {
        self.is_resolution_pending()
            && now > self.request_time.saturating_add(liveness_window_secs)
    }

    /// Total weight staked on `side`
    pub fn side_weight(&self, side: Side) -> u128 {
        match side {
            Side::Yes => self.total_yes_weight,
            Side::No => self.total_no_weight,
        }
    }

    /// Bettor principal adds up to the total once the creator seed is removed
    pub fn principal_is_consistent(&self) -> bool {
        self.yes_principal
            .checked_add(self.no_principal)
            .and_then(|sides| sides.checked_add(self.creator_principal))
            == Some(self.total_principal)
    }

    /// Case-insensitive address comparison against the creator
    pub fn is_creator(&self, address: &str) -> bool {
        self.creator.eq_ignore_ascii_case(address)
    }
}

/// One bettor's position in one pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBet {
    pub principal: u128,
    /// Time-weighted contribution, larger for earlier bets
    pub weight: u128,
    pub side: Side,
    pub claimed: bool,
}

impl UserBet {
    pub fn has_bet(&self) -> bool {
        self.principal > 0
    }
}

/// Yield already realized on-chain as of the last read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolMetrics {
    pub current_total_yield: u128,
    pub estimated_winner_prize: u128,
    pub estimated_creator_fee: u128,
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_side_conversions() {
        assert_eq!(Side::from(true), Side::Yes);
        assert_eq!(Side::from(false), Side::No);
        assert!(Side::Yes.as_bool());
        assert_eq!("YES".parse::<Side>().unwrap(), Side::Yes);
        assert_eq!("no".parse::<Side>().unwrap(), Side::No);
        assert!("maybe".parse::<Side>().is_err());
        assert_eq!(serde_json::to_string(&Side::Yes).unwrap(), "\"yes\"");
    }

    #[test]
    fn test_derived_flags() {
        let pool = pool(1_000);
        assert!(pool.is_live(999));
        assert!(!pool.is_live(1_000));
        assert_eq!(pool.time_left_seconds(400), 600);
        assert_eq!(pool.time_left_seconds(2_000), 0);

        let resolved = resolved_pool(Side::Yes);
        assert!(!resolved.is_live(-10));
    }

    #[test]
    fn test_can_settle_window() {
        let pool = PoolSnapshot {
            request_submitted: true,
            request_time: 2_000,
            ..pool(1_000)
        };
        assert!(pool.is_resolution_pending());
        assert!(!pool.can_settle(2_030, 30));
        assert!(pool.can_settle(2_031, 30));

        let settled = PoolSnapshot {
            resolved: true,
            ..pool
        };
        assert!(!settled.is_resolution_pending());
        assert!(!settled.can_settle(9_999, 30));
    }

    #[test]
    fn test_principal_consistency() {
        assert!(pool(0).principal_is_consistent());
        let skewed = PoolSnapshot {
            yes_principal: 0,
            ..pool(0)
        };
        assert!(!skewed.principal_is_consistent());
    }

    #[test]
    fn test_is_creator_ignores_case() {
        let pool = pool(0);
        assert!(pool.is_creator("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"));
        assert!(!pool.is_creator("0x0000000000000000000000000000000000000001"));
    }

    #[test]
    fn test_has_bet() {
        assert!(bet(Side::Yes, 1, 1).has_bet());
        assert!(!bet(Side::Yes, 0, 0).has_bet());
    }
}
