//! Configuration settings structure
//!
//! Defines the main settings structure and loading logic for the automation
//! client. Every fixed delay and endpoint the workflow uses lives here so
//! nothing in the core modules depends on implicit globals.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration settings for the automation client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Remote API configuration
    pub api: ApiSettings,
    /// Retry bounds for API operations
    pub retry: RetrySettings,
    /// Scheduler pacing
    pub schedule: ScheduleSettings,
    /// Input file locations
    pub files: FileSettings,
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the MeshChain miniapp API
    pub base_url: String,
    /// Referral code sent with every sign-in
    pub referral_code: String,
    /// Origin/Referer the miniapp frontend would send
    pub origin: String,
    /// User agent for all outbound requests
    pub user_agent: String,
    /// IP-echo endpoint used for proxy diagnostics
    pub ip_echo_url: String,
    /// UTC offset (hours) used when displaying claim times
    pub display_utc_offset_hours: i32,
}

/// Retry bounds for API operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Attempts for ordinary operations
    pub attempts: u32,
    /// Delay between ordinary attempts, seconds
    pub delay_secs: u64,
    /// Attempts for node status/link, which the server rejects more often
    pub status_attempts: u32,
    /// Delay between status/link attempts, seconds
    pub status_delay_secs: u64,
}

/// Scheduler pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Delay between accounts within one pass, seconds
    pub account_delay_secs: u64,
    /// Cooldown between full passes, minutes
    pub pass_cooldown_mins: u64,
}

/// Input file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    /// Newline-delimited credential tokens, one per account
    pub credentials: PathBuf,
    /// Newline-delimited proxy URIs, positionally matched to accounts
    pub proxies: PathBuf,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.meshchain.ai/meshmain".to_string(),
            referral_code: "T_376905749".to_string(),
            origin: "https://miniapp.meshchain.ai".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36"
                .to_string(),
            ip_echo_url: "https://api.ipify.org?format=json".to_string(),
            display_utc_offset_hours: 7,
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay_secs: 5,
            status_attempts: 5,
            status_delay_secs: 30,
        }
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            account_delay_secs: 5,
            pass_cooldown_mins: 120,
        }
    }
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            credentials: PathBuf::from("data.txt"),
            proxies: PathBuf::from("proxy.txt"),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            retry: RetrySettings::default(),
            schedule: ScheduleSettings::default(),
            files: FileSettings::default(),
        }
    }
}

impl ScheduleSettings {
    /// Delay between accounts as a [`Duration`]
    pub fn account_delay(&self) -> Duration {
        Duration::from_secs(self.account_delay_secs)
    }

    /// Cooldown between passes as a [`Duration`]
    pub fn pass_cooldown(&self) -> Duration {
        Duration::from_secs(self.pass_cooldown_mins * 60)
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)
            .map_err(|e| crate::Error::config(format!("Invalid config file: {}", e)))?;
        Ok(settings)
    }

    /// Apply environment variable overrides on top of existing settings
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        if let Ok(base_url) = std::env::var("MESH_BASE_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(referral) = std::env::var("MESH_REFERRAL_CODE") {
            self.api.referral_code = referral;
        }

        if let Ok(delay) = std::env::var("MESH_ACCOUNT_DELAY_SECS") {
            self.schedule.account_delay_secs = delay
                .parse()
                .map_err(|e| crate::Error::config(format!("Invalid account delay: {}", e)))?;
        }

        if let Ok(cooldown) = std::env::var("MESH_PASS_COOLDOWN_MINS") {
            self.schedule.pass_cooldown_mins = cooldown
                .parse()
                .map_err(|e| crate::Error::config(format!("Invalid pass cooldown: {}", e)))?;
        }

        if let Ok(path) = std::env::var("MESH_DATA_FILE") {
            self.files.credentials = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("MESH_PROXY_FILE") {
            self.files.proxies = PathBuf::from(path);
        }

        Ok(self)
    }

    /// Validate the final configuration
    pub fn validate(&self) -> crate::Result<()> {
        url::Url::parse(&self.api.base_url)
            .map_err(|e| crate::Error::config(format!("Invalid base URL: {}", e)))?;

        if self.retry.attempts == 0 || self.retry.attempts > 5 {
            return Err(crate::Error::config(
                "retry.attempts must be between 1 and 5",
            ));
        }

        if self.retry.status_attempts == 0 || self.retry.status_attempts > 5 {
            return Err(crate::Error::config(
                "retry.status_attempts must be between 1 and 5",
            ));
        }

        if self.retry.delay_secs > 30 || self.retry.status_delay_secs > 30 {
            return Err(crate::Error::config(
                "retry delays must not exceed 30 seconds",
            ));
        }

        if !(-12..=14).contains(&self.api.display_utc_offset_hours) {
            return Err(crate::Error::config(
                "display_utc_offset_hours must be a valid UTC offset",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.api.base_url, "https://api.meshchain.ai/meshmain");
        assert_eq!(settings.retry.attempts, 3);
        assert_eq!(settings.retry.status_attempts, 5);
        assert_eq!(settings.schedule.account_delay_secs, 5);
        assert_eq!(settings.schedule.pass_cooldown_mins, 120);
        assert_eq!(settings.api.display_utc_offset_hours, 7);
    }

    #[test]
    fn test_schedule_durations() {
        let settings = Settings::default();
        assert_eq!(settings.schedule.account_delay(), Duration::from_secs(5));
        assert_eq!(
            settings.schedule.pass_cooldown(),
            Duration::from_secs(120 * 60)
        );
    }

    #[test]
    fn test_validate_defaults() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_retry_bounds() {
        let mut settings = Settings::default();
        settings.retry.attempts = 0;
        assert!(settings.validate().is_err());

        settings.retry.attempts = 6;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut settings = Settings::default();
        settings.api.base_url = "not a url".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_excessive_delay() {
        let mut settings = Settings::default();
        settings.retry.delay_secs = 31;
        assert!(settings.validate().is_err());
    }
}
