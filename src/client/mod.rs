//! Remote API client module
//!
//! Typed operations against the MeshChain miniapp API, each composed with
//! the retry executor. The [`MeshApi`] trait is the seam the workflow is
//! written against, so tests can drive the orchestrator with a mock.

pub mod api;

pub use api::{ApiClient, MeshApi, MINING_NOT_STARTED};
