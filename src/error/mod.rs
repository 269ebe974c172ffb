//! Error handling module
//!
//! Provides the error types used throughout the application.

pub mod types;

pub use types::{Error, Result};
