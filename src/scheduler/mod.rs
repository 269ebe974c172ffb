//! Sequential account scheduler
//!
//! Runs every configured account through the workflow one at a time, with a
//! short delay between accounts and a long cooldown between passes. A
//! failing account never stops the pass; the error is logged and the next
//! account is attempted. Nothing is persisted between passes, so a restart
//! simply begins again at the first account with a fresh sign-in.

use chrono::{FixedOffset, Local};
use tracing::{error, info, warn};

use crate::{
    Result,
    client::ApiClient,
    config::Settings,
    proxy::{ProxyList, probe_external_ip},
    types::Credential,
    workflow::process_account,
};

/// Drives all accounts through passes of the per-account workflow
#[derive(Debug)]
pub struct Scheduler {
    settings: Settings,
    credentials: Vec<Credential>,
    proxies: ProxyList,
    display_offset: FixedOffset,
}

impl Scheduler {
    /// Create a scheduler over the given accounts and proxy list.
    pub fn new(
        settings: Settings,
        credentials: Vec<Credential>,
        proxies: ProxyList,
    ) -> Result<Self> {
        let display_offset = FixedOffset::east_opt(settings.api.display_utc_offset_hours * 3600)
            .ok_or_else(|| crate::Error::config("invalid display UTC offset"))?;

        Ok(Self {
            settings,
            credentials,
            proxies,
            display_offset,
        })
    }

    /// Number of configured accounts
    pub fn account_count(&self) -> usize {
        self.credentials.len()
    }

    /// Run one pass over every account, in order.
    ///
    /// Per-account failures are caught here so the pass always completes.
    pub async fn run_pass(&self) {
        for (index, credential) in self.credentials.iter().enumerate() {
            let proxy = self.proxies.resolve(index);
            let proxy_ip = self.describe_proxy(proxy).await;

            info!(
                "========== Account {} | {} | ip: {} ==========",
                index + 1,
                credential.user().first_name,
                proxy_ip
            );

            match ApiClient::new(&self.settings, proxy) {
                Ok(client) => {
                    if let Err(e) = process_account(&client, credential, self.display_offset).await
                    {
                        error!("Account {} failed this pass: {}", index + 1, e);
                        warn!("Skipping to the next account...");
                    }
                }
                Err(e) => {
                    error!("Could not build transport for account {}: {}", index + 1, e);
                }
            }

            tokio::time::sleep(self.settings.schedule.account_delay()).await;
        }
    }

    /// Run passes forever, sleeping the configured cooldown between them.
    pub async fn run_forever(&self) {
        for pass in 1u64.. {
            info!("Starting pass {} over {} accounts", pass, self.credentials.len());
            self.run_pass().await;

            let cooldown = self.settings.schedule.pass_cooldown();
            let wake_at = Local::now()
                + chrono::Duration::from_std(cooldown).unwrap_or_else(|_| chrono::Duration::zero());
            info!(
                "Pass {} complete. Sleeping {} minutes (next pass at {})",
                pass,
                self.settings.schedule.pass_cooldown_mins,
                wake_at.format("%H:%M:%S")
            );
            tokio::time::sleep(cooldown).await;
        }
    }

    /// Resolve the proxy's external IP for the account banner.
    async fn describe_proxy(&self, proxy: Option<&str>) -> String {
        let Some(proxy) = proxy else {
            return "No proxy".to_string();
        };

        match probe_external_ip(proxy, &self.settings.api.ip_echo_url).await {
            Ok(ip) => ip,
            Err(e) => {
                // Diagnostic only; the account still runs through the proxy
                warn!("Error checking proxy IP: {}", e);
                "unknown".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(id: i64) -> Credential {
        let user = format!(
            "%7B%22id%22%3A{}%2C%22username%22%3A%22user{}%22%2C%22first_name%22%3A%22U{}%22%7D",
            id, id, id
        );
        Credential::parse(format!("user={}", user)).unwrap()
    }

    #[test]
    fn test_scheduler_construction() {
        let scheduler = Scheduler::new(
            Settings::default(),
            vec![credential(1), credential(2)],
            ProxyList::default(),
        )
        .unwrap();

        assert_eq!(scheduler.account_count(), 2);
        assert_eq!(scheduler.display_offset.local_minus_utc(), 7 * 3600);
    }

    #[test]
    fn test_scheduler_rejects_invalid_offset() {
        let mut settings = Settings::default();
        settings.api.display_utc_offset_hours = 99;

        assert!(Scheduler::new(settings, vec![], ProxyList::default()).is_err());
    }

    #[tokio::test]
    async fn test_empty_pass_completes() {
        let mut settings = Settings::default();
        settings.schedule.account_delay_secs = 0;

        let scheduler = Scheduler::new(settings, vec![], ProxyList::default()).unwrap();
        scheduler.run_pass().await;
    }
}
