//! Request body definitions
//!
//! JSON bodies sent to the remote API. Field names match the wire format
//! exactly, so these derive `Serialize` with no renames.

use serde::{Deserialize, Serialize};

/// Body for the sign-in endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    /// Referral code attached to every sign-in
    pub referral_code: String,
}

impl SignInRequest {
    /// Create a sign-in request with the given referral code
    pub fn new(referral_code: impl Into<String>) -> Self {
        Self {
            referral_code: referral_code.into(),
        }
    }
}

/// Body for the node status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeStatusRequest {
    /// Account id as a string, the format the endpoint expects
    pub unique_id: String,
}

impl NodeStatusRequest {
    /// Create a status request for the given account id
    pub fn new(unique_id: i64) -> Self {
        Self {
            unique_id: unique_id.to_string(),
        }
    }
}

/// Body for the node link endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkNodeRequest {
    /// Numeric account id; unlike the other endpoints, link takes a number
    pub unique_id: i64,
    /// Node type, always "telegram" for miniapp accounts
    pub node_type: String,
    /// Display name for the node
    pub name: String,
    /// The raw credential token, echoed back for verification
    pub tg_data: String,
}

impl LinkNodeRequest {
    /// Create a link request for the given account
    pub fn new(unique_id: i64, name: impl Into<String>, tg_data: impl Into<String>) -> Self {
        Self {
            unique_id,
            node_type: "telegram".to_string(),
            name: name.into(),
            tg_data: tg_data.into(),
        }
    }
}

/// Body for the mission claim endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionClaimRequest {
    /// Fixed mission identifier
    pub mission_id: String,
}

impl MissionClaimRequest {
    /// Create a claim request for the given mission id
    pub fn new(mission_id: impl Into<String>) -> Self {
        Self {
            mission_id: mission_id.into(),
        }
    }
}

/// Body shared by the reward estimate/start/claim endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardRequest {
    /// Account id as a string
    pub unique_id: String,
}

impl RewardRequest {
    /// Create a reward request for the given account id
    pub fn new(unique_id: i64) -> Self {
        Self {
            unique_id: unique_id.to_string(),
        }
    }
}
