//! Response type definitions
//!
//! Raw wire responses and the tagged enums they are decided into. The
//! branching the workflow does (needs-link vs linked, needs-start vs
//! claimable vs accruing) is resolved here, at the deserialization boundary,
//! so downstream code matches on variants instead of probing optional
//! fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response from the sign-in endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInResponse {
    /// Bearer token for the rest of the account pass
    pub access_token: String,
}

/// Raw body of the node status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNodeStatus {
    /// Present on well-formed responses; absence is a protocol error
    pub is_linked: Option<bool>,
    /// Node id, present when linked
    pub id: Option<String>,
    /// Lifetime reward, present when linked
    pub total_reward: Option<f64>,
    /// Reward accrued today, present when linked
    pub today_reward: Option<f64>,
    /// Mining hash rate, present when linked
    pub hash_rate: Option<f64>,
}

/// Interpreted node link state
#[derive(Debug, Clone, PartialEq)]
pub enum NodeStatus {
    /// Node is linked to this account
    Linked {
        /// Server-side node id
        node_id: String,
        /// Lifetime reward
        total_reward: f64,
        /// Reward accrued today
        today_reward: f64,
        /// Mining hash rate
        hash_rate: f64,
    },
    /// Node must be linked before mining
    NeedsLink,
}

impl NodeStatus {
    /// Decide the link state from a raw status body.
    ///
    /// A body without `is_linked` is malformed; HTTP 409 is mapped to
    /// [`NodeStatus::NeedsLink`] by the client before this is reached.
    pub fn from_raw(raw: RawNodeStatus) -> crate::Result<Self> {
        match raw.is_linked {
            Some(true) => Ok(Self::Linked {
                node_id: raw.id.unwrap_or_default(),
                total_reward: raw.total_reward.unwrap_or(0.0),
                today_reward: raw.today_reward.unwrap_or(0.0),
                hash_rate: raw.hash_rate.unwrap_or(0.0),
            }),
            Some(false) => Ok(Self::NeedsLink),
            None => Err(crate::Error::invalid_response(
                "node status body missing is_linked",
            )),
        }
    }
}

/// Response from the node link endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkNodeResponse {
    /// Lifetime reward after linking
    pub total_reward: Option<f64>,
}

/// One mission record from the mission list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    /// Fixed mission identifier
    pub id: String,
    /// Claim timestamp; `None` means unclaimed
    pub claimed_at: Option<DateTime<Utc>>,
}

impl Mission {
    /// Whether this mission has already been claimed
    pub fn is_claimed(&self) -> bool {
        self.claimed_at.is_some()
    }
}

/// Response from the mission claim endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionClaimResponse {
    /// Claim timestamp confirming the claim went through
    pub claimed_at: Option<DateTime<Utc>>,
}

/// Raw body of the reward estimate endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRewardEstimate {
    /// Whether the current cycle can be claimed
    pub claimable: Option<bool>,
    /// Whether the cycle has accrued its full value
    pub filled: Option<bool>,
    /// Accrued value so far
    pub value: Option<f64>,
    /// Seconds elapsed in the current cycle
    pub time_elapsed_sec: Option<f64>,
}

/// Interpreted reward cycle state
#[derive(Debug, Clone, PartialEq)]
pub enum RewardEstimate {
    /// No cycle running; start one
    NeedsStart,
    /// Cycle complete; claim now
    Ready {
        /// Claimable value
        value: f64,
    },
    /// Cycle running but not yet full; wait
    Accruing {
        /// Value accrued so far
        value: f64,
        /// Seconds elapsed in the cycle
        elapsed_secs: u64,
    },
    /// Nothing claimable and nothing to start
    Idle,
}

impl RewardEstimate {
    /// Decide the cycle state from a raw estimate body.
    ///
    /// The needs-start case never reaches here: the server signals it with
    /// an HTTP 400 carrying a specific message, which the client maps to
    /// [`RewardEstimate::NeedsStart`] directly.
    pub fn from_raw(raw: RawRewardEstimate) -> Self {
        match (raw.claimable.unwrap_or(false), raw.filled.unwrap_or(false)) {
            (true, true) => Self::Ready {
                value: raw.value.unwrap_or(0.0),
            },
            (true, false) => Self::Accruing {
                value: raw.value.unwrap_or(0.0),
                elapsed_secs: raw.time_elapsed_sec.unwrap_or(0.0) as u64,
            },
            (false, _) => Self::Idle,
        }
    }
}

/// Response from the reward start/claim endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleResponse {
    /// When the newly started (or next) cycle ends and becomes claimable
    pub cycle_ended_at: DateTime<Utc>,
}
