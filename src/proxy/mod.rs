//! Outbound transport selection
//!
//! Proxies are read from a newline-delimited file and matched to accounts
//! by position: the proxy on line *i* applies to account *i*, and accounts
//! past the end of the list connect directly. A small diagnostic helper can
//! ask an IP-echo service what address a proxy egresses from; the result is
//! only ever logged.

use crate::Result;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Positionally indexed proxy list
#[derive(Debug, Clone, Default)]
pub struct ProxyList {
    entries: Vec<String>,
}

impl ProxyList {
    /// Build a proxy list from raw entries (used by tests)
    pub fn from_entries(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Load proxies from a newline-delimited file.
    ///
    /// A missing file is not an error: the bot runs every account direct
    /// and says so once. Carriage returns are stripped, blank lines and
    /// `#` comments skipped.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("{:?} not found, running without proxies", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let entries: Vec<String> = content
            .replace('\r', "")
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();

        info!("Loaded {} proxies from {:?}", entries.len(), path);
        Ok(Self { entries })
    }

    /// The proxy for the account at `index`, if one exists
    pub fn resolve(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Number of proxy entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build an HTTP client for one account, routed through `proxy` when given.
pub fn build_http_client(user_agent: &str, proxy: Option<&str>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(user_agent);

    if let Some(proxy_url) = proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| crate::Error::proxy(format!("invalid proxy {}: {}", proxy_url, e)))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| crate::Error::proxy(format!("failed to build HTTP client: {}", e)))
}

#[derive(Debug, Deserialize)]
struct IpEchoResponse {
    ip: String,
}

/// Ask the IP-echo service what address `proxy` egresses from.
///
/// Purely diagnostic; callers log the result or the failure and move on.
pub async fn probe_external_ip(proxy: &str, echo_url: &str) -> Result<String> {
    let client = build_http_client("meshchain-bot", Some(proxy))?;

    let response = client.get(echo_url).send().await?;
    if !response.status().is_success() {
        return Err(crate::Error::proxy(format!(
            "IP probe returned status {}",
            response.status()
        )));
    }

    let body: IpEchoResponse = response.json().await?;
    Ok(body.ip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_proxy_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "http://10.0.0.1:8080\r\n\r\n# comment\nsocks5://10.0.0.2:1080\n"
        )
        .unwrap();

        let proxies = ProxyList::load(file.path()).unwrap();
        assert_eq!(proxies.len(), 2);
        assert_eq!(proxies.resolve(0), Some("http://10.0.0.1:8080"));
        assert_eq!(proxies.resolve(1), Some("socks5://10.0.0.2:1080"));
    }

    #[test]
    fn test_missing_file_yields_empty_list() {
        let proxies = ProxyList::load(Path::new("/nonexistent/proxy.txt")).unwrap();
        assert!(proxies.is_empty());
        assert_eq!(proxies.resolve(0), None);
    }

    #[test]
    fn test_short_list_leaves_later_accounts_direct() {
        let proxies = ProxyList::from_entries(vec!["http://10.0.0.1:8080".to_string()]);
        assert_eq!(proxies.resolve(0), Some("http://10.0.0.1:8080"));
        assert_eq!(proxies.resolve(1), None);
        assert_eq!(proxies.resolve(5), None);
    }

    #[tokio::test]
    async fn test_build_client_direct() {
        assert!(build_http_client("test-agent", None).is_ok());
    }

    #[tokio::test]
    async fn test_build_client_with_proxy() {
        assert!(build_http_client("test-agent", Some("http://10.0.0.1:8080")).is_ok());
    }

    #[tokio::test]
    async fn test_build_client_rejects_invalid_proxy() {
        let err = build_http_client("test-agent", Some("not a proxy")).unwrap_err();
        assert!(matches!(err, crate::Error::Proxy(_)));
    }
}
