//! Configuration assembly
//!
//! Builds the final [`Settings`] from its sources in fixed precedence:
//! defaults, then an optional TOML file, then `MESH_*` environment
//! overrides. CLI flags are applied by the binary on top of the result.

use crate::{Result, config::Settings};
use std::path::Path;
use tracing::{debug, info, warn};

/// Assembles and validates [`Settings`] from defaults, file and environment
#[derive(Debug, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the final settings.
    ///
    /// A config path that does not exist is not fatal; the file layer is
    /// skipped with a warning so a fresh checkout runs on defaults. The
    /// merged result is validated before it is returned.
    pub fn load(&self, config_file: Option<&Path>) -> Result<Settings> {
        let settings = match config_file {
            Some(path) if path.exists() => {
                info!("Reading configuration from {:?}", path);
                Settings::from_file(path)?
            }
            Some(path) => {
                warn!("Configuration file {:?} not found, using defaults", path);
                Settings::default()
            }
            None => Settings::default(),
        };

        let settings = settings.merge_with_env()?;
        settings.validate()?;
        debug!("Resolved configuration: {:?}", settings);

        Ok(settings)
    }
}
