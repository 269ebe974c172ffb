//! Type definitions
//!
//! Contains account credential types and the wire request/response types for
//! the remote API, including the tagged enums that response interpretation
//! is decided into at the deserialization boundary.

pub mod account;
pub mod request;
pub mod response;

pub use account::{Credential, UserIdentity};
pub use request::{LinkNodeRequest, MissionClaimRequest, NodeStatusRequest, RewardRequest, SignInRequest};
pub use response::{
    CycleResponse, LinkNodeResponse, Mission, MissionClaimResponse, NodeStatus, RewardEstimate,
    SignInResponse,
};
