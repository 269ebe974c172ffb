//! MeshChain multi-account automation client
//!
//! Automates the MeshChain miniapp REST API for a list of accounts:
//! sign-in, node linking, mission claiming and the mining start/claim
//! cycle. Accounts are processed strictly sequentially, each optionally
//! routed through its own proxy.
//!
//! # Architecture
//!
//! - [`retry`]: bounded fixed-delay retry wrapper every API call runs under
//! - [`proxy`]: positional proxy list and per-account transport construction
//! - [`client`]: typed API operations behind the [`client::MeshApi`] seam
//! - [`workflow`]: the per-account lifecycle, pure over any `MeshApi`
//! - [`scheduler`]: the sequential pass loop with inter-account delay and
//!   pass cooldown
//!
//! # Usage
//!
//! ```bash
//! meshchain-bot --data-file data.txt --proxy-file proxy.txt
//! ```
//!
//! # Examples
//!
//! ```rust
//! use meshchain_bot::{ApiClient, Settings};
//!
//! # fn example() -> meshchain_bot::Result<()> {
//! let settings = Settings::default();
//! let client = ApiClient::new(&settings, None)?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod proxy;
pub mod retry;
pub mod scheduler;
pub mod types;
pub mod workflow;

pub use client::{ApiClient, MeshApi};
pub use config::Settings;
pub use error::{Error, Result};
pub use scheduler::Scheduler;
