//! API session client
//!
//! [`ApiClient`] wraps one `reqwest::Client` (direct or proxied, chosen per
//! account) and the explicit [`ApiSettings`] it was constructed from; there
//! is no implicit global configuration. Every operation runs under a
//! [`RetryPolicy`]: ordinary calls get the short policy, node status/link
//! get the long one because the server sheds load on those endpoints with
//! 5xx responses.
//!
//! Status-code reinterpretation happens here, next to the wire:
//! - 409 on node status is not an error, it means the node needs linking
//! - 400 on reward estimate with [`MINING_NOT_STARTED`] means no cycle is
//!   running yet
//! - 5xx maps to a transient error that the retry delay absorbs
//!
//! All other failures surface the server-supplied `message` field when the
//! body carries one.

use async_trait::async_trait;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderName, HeaderValue, ORIGIN, REFERER,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{
    Result,
    config::Settings,
    retry::{RetryPolicy, retry},
    types::{
        Credential, CycleResponse, LinkNodeRequest, LinkNodeResponse, Mission,
        MissionClaimRequest, MissionClaimResponse, NodeStatus, NodeStatusRequest, RewardEstimate,
        RewardRequest, SignInRequest, SignInResponse,
        response::{RawNodeStatus, RawRewardEstimate},
    },
};

/// Server message that signals a not-yet-started mining cycle on HTTP 400
pub const MINING_NOT_STARTED: &str = "The mining process is not started";

/// Client-hint and fetch-metadata headers the miniapp frontend sends on
/// every request; values match the Chrome build the user agent claims
const BROWSER_HEADERS: [(&str, &str); 6] = [
    (
        "sec-ch-ua",
        r#""Not/A)Brand";v="99", "Google Chrome";v="115", "Chromium";v="115""#,
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Windows\""),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-site"),
];

/// Error body shape the server uses for failures
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Authentication scheme for one request
#[derive(Debug, Clone, Copy)]
enum Auth<'a> {
    /// Miniapp credential scheme, used only by sign-in
    Tma(&'a str),
    /// Bearer access token, used by everything else
    Bearer(&'a str),
}

impl Auth<'_> {
    fn header_value(&self) -> String {
        match self {
            Auth::Tma(token) => format!("tma {}", token),
            Auth::Bearer(token) => format!("Bearer {}", token),
        }
    }
}

/// Typed operations against the remote service.
///
/// The workflow orchestrator is generic over this trait; production code
/// uses [`ApiClient`], tests substitute a recording mock.
#[async_trait]
pub trait MeshApi: Send + Sync {
    /// Exchange a credential for a session access token
    async fn sign_in(&self, credential: &Credential) -> Result<SignInResponse>;

    /// Query the node link state for an account
    async fn node_status(&self, token: &str, unique_id: i64) -> Result<NodeStatus>;

    /// Link the account's node, echoing the raw credential back
    async fn link_node(&self, token: &str, credential: &Credential) -> Result<LinkNodeResponse>;

    /// List mission records for the account
    async fn list_missions(&self, token: &str) -> Result<Vec<Mission>>;

    /// Claim one mission by its fixed id
    async fn claim_mission(&self, token: &str, mission_id: &str) -> Result<MissionClaimResponse>;

    /// Query the reward cycle state
    async fn estimate_rewards(&self, token: &str, unique_id: i64) -> Result<RewardEstimate>;

    /// Start a new mining cycle
    async fn start_mining(&self, token: &str, unique_id: i64) -> Result<CycleResponse>;

    /// Claim the finished cycle and roll into the next one
    async fn claim_rewards(&self, token: &str, unique_id: i64) -> Result<CycleResponse>;
}

/// HTTP client for the MeshChain miniapp API
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Underlying HTTP client, already routed through this account's proxy
    http: reqwest::Client,
    /// Base URL without trailing slash
    base_url: String,
    /// Referral code sent on sign-in
    referral_code: String,
    /// Static headers mimicking the miniapp frontend
    headers: HeaderMap,
    /// Policy for ordinary operations
    default_policy: RetryPolicy,
    /// Longer policy for node status/link
    status_policy: RetryPolicy,
}

impl ApiClient {
    /// Create a client for one account from settings and an optional proxy.
    pub fn new(settings: &Settings, proxy: Option<&str>) -> Result<Self> {
        let http = crate::proxy::build_http_client(&settings.api.user_agent, proxy)?;
        Ok(Self::with_http_client(settings, http))
    }

    /// Create a client around an existing HTTP client (used by tests)
    pub fn with_http_client(settings: &Settings, http: reqwest::Client) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("vi-VN,vi;q=0.9,fr-FR;q=0.8,fr;q=0.7,en-US;q=0.6,en;q=0.5"),
        );
        for (name, value) in BROWSER_HEADERS {
            headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
        }
        if let Ok(origin) = HeaderValue::from_str(&settings.api.origin) {
            headers.insert(ORIGIN, origin);
        }
        if let Ok(referer) = HeaderValue::from_str(&format!("{}/", settings.api.origin)) {
            headers.insert(REFERER, referer);
        }

        Self {
            http,
            base_url: settings.api.base_url.trim_end_matches('/').to_string(),
            referral_code: settings.api.referral_code.clone(),
            headers,
            default_policy: RetryPolicy::new(settings.retry.attempts, settings.retry.delay_secs),
            status_policy: RetryPolicy::new(
                settings.retry.status_attempts,
                settings.retry.status_delay_secs,
            ),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into the crate error taxonomy,
    /// preferring the server's `message` field over the status text.
    async fn decode_failure(response: reqwest::Response) -> crate::Error {
        let status = response.status();

        if status.is_server_error() {
            return crate::Error::ServerBusy {
                status: status.as_u16(),
            };
        }

        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });

        crate::Error::api(status.as_u16(), message)
    }

    async fn post_json<B, T>(&self, path: &str, auth: Auth<'_>, body: &B) -> Result<T>
    where
        B: serde::Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.endpoint(path))
            .headers(self.headers.clone())
            .header("Authorization", auth.header_value())
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::decode_failure(response).await);
        }

        Ok(response.json::<T>().await?)
    }

    async fn get_json<T>(&self, path: &str, auth: Auth<'_>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http
            .get(self.endpoint(path))
            .headers(self.headers.clone())
            .header("Authorization", auth.header_value())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::decode_failure(response).await);
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl MeshApi for ApiClient {
    async fn sign_in(&self, credential: &Credential) -> Result<SignInResponse> {
        let body = SignInRequest::new(self.referral_code.as_str());
        let body = &body;

        retry(self.default_policy, "sign-in", || async move {
            self.post_json(
                "/auth/telegram-miniapp-signin",
                Auth::Tma(credential.raw()),
                body,
            )
            .await
            .map_err(|e| crate::Error::sign_in(e.to_string()))
        })
        .await
    }

    async fn node_status(&self, token: &str, unique_id: i64) -> Result<NodeStatus> {
        let body = NodeStatusRequest::new(unique_id);
        let body = &body;

        retry(self.status_policy, "node status", || async move {
            let result: Result<RawNodeStatus> = self
                .post_json("/nodes/status", Auth::Bearer(token), body)
                .await;

            match result {
                Ok(raw) => NodeStatus::from_raw(raw),
                // 409 is not a failure: the node simply is not linked yet
                Err(crate::Error::Api { status: 409, .. }) => Ok(NodeStatus::NeedsLink),
                Err(e) => Err(e),
            }
        })
        .await
    }

    async fn link_node(&self, token: &str, credential: &Credential) -> Result<LinkNodeResponse> {
        let body = LinkNodeRequest::new(
            credential.unique_id(),
            credential.user().username.as_str(),
            credential.raw(),
        );
        let body = &body;

        retry(self.status_policy, "node link", || async move {
            self.post_json("/nodes/link", Auth::Bearer(token), body)
                .await
        })
        .await
    }

    async fn list_missions(&self, token: &str) -> Result<Vec<Mission>> {
        retry(self.default_policy, "mission list", || async move {
            self.get_json("/mission", Auth::Bearer(token)).await
        })
        .await
    }

    async fn claim_mission(&self, token: &str, mission_id: &str) -> Result<MissionClaimResponse> {
        let body = MissionClaimRequest::new(mission_id);
        let body = &body;

        retry(self.default_policy, "mission claim", || async move {
            self.post_json("/mission/claim", Auth::Bearer(token), body)
                .await
        })
        .await
    }

    async fn estimate_rewards(&self, token: &str, unique_id: i64) -> Result<RewardEstimate> {
        let body = RewardRequest::new(unique_id);
        let body = &body;

        retry(self.default_policy, "reward estimate", || async move {
            let result: Result<RawRewardEstimate> = self
                .post_json("/rewards/estimate", Auth::Bearer(token), body)
                .await;

            match result {
                Ok(raw) => Ok(RewardEstimate::from_raw(raw)),
                Err(crate::Error::Api {
                    status: 400,
                    ref message,
                }) if message == MINING_NOT_STARTED => Ok(RewardEstimate::NeedsStart),
                Err(e) => Err(e),
            }
        })
        .await
    }

    async fn start_mining(&self, token: &str, unique_id: i64) -> Result<CycleResponse> {
        let body = RewardRequest::new(unique_id);
        let body = &body;

        retry(self.default_policy, "mining start", || async move {
            self.post_json("/rewards/start", Auth::Bearer(token), body)
                .await
        })
        .await
    }

    async fn claim_rewards(&self, token: &str, unique_id: i64) -> Result<CycleResponse> {
        let body = RewardRequest::new(unique_id);
        let body = &body;

        retry(self.default_policy, "reward claim", || async move {
            self.post_json("/rewards/claim", Auth::Bearer(token), body)
                .await
        })
        .await
    }
}
