//! Configuration module
//!
//! Provides settings structures and loading logic for the automation client.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::Settings;
