//! Per-account workflow
//!
//! Drives one account through a full pass: sign-in, node status/link, the
//! fixed mission sweep, then the mining cycle branch. The function is pure
//! over a [`MeshApi`] implementation and one parsed credential, so the
//! scheduler can run it sequentially today and a pool could fan it out
//! tomorrow without touching the per-account logic.
//!
//! Failure scoping: an error in sign-in, status, link, mission listing or
//! the estimate branch abandons the account for this pass (the caller
//! catches it). A failed claim of an individual mission only logs a
//! warning; missions are independent.

use chrono::{DateTime, FixedOffset, Utc};
use tracing::{debug, info, warn};

use crate::{
    Result,
    client::MeshApi,
    types::{Credential, NodeStatus, RewardEstimate},
};

/// The four missions every account is swept for, in claim order
pub const MISSION_IDS: [&str; 4] = [
    "ACCOUNT_VERIFICATION",
    "JOIN_OUR_TELEGRAM_CHANNEL",
    "JOIN_OUR_DISCORD_CHANNEL",
    "FOLLOW_BOUNCETON_ON_X",
];

/// Render a cycle timestamp in the configured display timezone
pub fn format_claim_time(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    timestamp
        .with_timezone(&offset)
        .format("%H:%M:%S %d/%m/%Y")
        .to_string()
}

/// Run one account through the full lifecycle.
pub async fn process_account<A>(
    api: &A,
    credential: &Credential,
    display_offset: FixedOffset,
) -> Result<()>
where
    A: MeshApi + ?Sized,
{
    let unique_id = credential.unique_id();

    info!("Signing in account {}...", unique_id);
    let session = api.sign_in(credential).await?;
    let token = session.access_token.as_str();
    info!("Signed in");

    match api.node_status(token, unique_id).await? {
        NodeStatus::NeedsLink => {
            info!("Node not linked, linking...");
            let linked = api.link_node(token, credential).await?;
            info!(
                "Node linked. Total reward: {}",
                linked.total_reward.unwrap_or(0.0)
            );
        }
        NodeStatus::Linked {
            node_id,
            total_reward,
            today_reward,
            hash_rate,
        } => {
            info!("Node already linked");
            info!("Node ID: {}", node_id);
            info!("Total reward: {}", total_reward);
            info!("Today's reward: {}", today_reward);
            info!("Hash rate: {}", hash_rate);
        }
    }

    info!("Checking missions...");
    let missions = api.list_missions(token).await?;

    for mission_id in MISSION_IDS {
        match missions.iter().find(|m| m.id == mission_id) {
            Some(mission) if !mission.is_claimed() => {
                info!("Mission {} unclaimed, claiming...", mission_id);
                match api.claim_mission(token, mission_id).await {
                    Ok(result) if result.claimed_at.is_some() => {
                        info!("Claimed {}", mission_id);
                    }
                    Ok(_) => {
                        warn!("Claim of {} returned no timestamp", mission_id);
                    }
                    Err(e) => {
                        // Missions are independent; keep sweeping
                        warn!("Could not claim {}: {}", mission_id, e);
                    }
                }
            }
            Some(_) => {
                debug!("Mission {} already claimed", mission_id);
            }
            None => {}
        }
    }

    info!("Checking mining status...");
    match api.estimate_rewards(token, unique_id).await? {
        RewardEstimate::NeedsStart => {
            info!("Mining not started, starting...");
            let started = api.start_mining(token, unique_id).await?;
            info!(
                "Mining started. Next claim at {}",
                format_claim_time(started.cycle_ended_at, display_offset)
            );
        }
        RewardEstimate::Ready { value } => {
            info!("{} points claimable!", value);
            let next = api.claim_rewards(token, unique_id).await?;
            info!(
                "Rewards claimed. Next claim at {}",
                format_claim_time(next.cycle_ended_at, display_offset)
            );
        }
        RewardEstimate::Accruing {
            value,
            elapsed_secs,
        } => {
            let elapsed_mins = (elapsed_secs as f64 / 60.0).round() as u64;
            warn!(
                "Cycle not claimable yet ({} points, {} min elapsed)",
                value, elapsed_mins
            );
        }
        RewardEstimate::Idle => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        CycleResponse, LinkNodeResponse, Mission, MissionClaimResponse, SignInResponse,
    };
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    fn sample_credential() -> Credential {
        Credential::parse(
            "user=%7B%22id%22%3A42%2C%22username%22%3A%22miner%22%2C%22first_name%22%3A%22Kim%22%7D",
        )
        .unwrap()
    }

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(7 * 3600).unwrap()
    }

    fn cycle_end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
    }

    /// Scripted API that records the operation sequence
    struct ScriptedApi {
        calls: Mutex<Vec<String>>,
        status: NodeStatus,
        missions: Vec<Mission>,
        estimate: RewardEstimate,
        fail_sign_in: bool,
        failing_missions: Vec<&'static str>,
    }

    impl ScriptedApi {
        fn new(status: NodeStatus, missions: Vec<Mission>, estimate: RewardEstimate) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                status,
                missions,
                estimate,
                fail_sign_in: false,
                failing_missions: Vec::new(),
            }
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn mission(id: &str, claimed: bool) -> Mission {
        Mission {
            id: id.to_string(),
            claimed_at: claimed.then(|| Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
        }
    }

    #[async_trait]
    impl MeshApi for ScriptedApi {
        async fn sign_in(&self, _credential: &Credential) -> crate::Result<SignInResponse> {
            self.record("sign_in");
            if self.fail_sign_in {
                return Err(crate::Error::sign_in("invalid credential"));
            }
            Ok(SignInResponse {
                access_token: "token-123".to_string(),
            })
        }

        async fn node_status(&self, _token: &str, _unique_id: i64) -> crate::Result<NodeStatus> {
            self.record("node_status");
            Ok(self.status.clone())
        }

        async fn link_node(
            &self,
            _token: &str,
            _credential: &Credential,
        ) -> crate::Result<LinkNodeResponse> {
            self.record("link_node");
            Ok(LinkNodeResponse {
                total_reward: Some(7.5),
            })
        }

        async fn list_missions(&self, _token: &str) -> crate::Result<Vec<Mission>> {
            self.record("list_missions");
            Ok(self.missions.clone())
        }

        async fn claim_mission(
            &self,
            _token: &str,
            mission_id: &str,
        ) -> crate::Result<MissionClaimResponse> {
            self.record(format!("claim_mission:{}", mission_id));
            if self.failing_missions.contains(&mission_id) {
                return Err(crate::Error::api(400, "already claimed"));
            }
            Ok(MissionClaimResponse {
                claimed_at: Some(Utc::now()),
            })
        }

        async fn estimate_rewards(
            &self,
            _token: &str,
            _unique_id: i64,
        ) -> crate::Result<RewardEstimate> {
            self.record("estimate_rewards");
            Ok(self.estimate.clone())
        }

        async fn start_mining(&self, _token: &str, _unique_id: i64) -> crate::Result<CycleResponse> {
            self.record("start_mining");
            Ok(CycleResponse {
                cycle_ended_at: cycle_end(),
            })
        }

        async fn claim_rewards(
            &self,
            _token: &str,
            _unique_id: i64,
        ) -> crate::Result<CycleResponse> {
            self.record("claim_rewards");
            Ok(CycleResponse {
                cycle_ended_at: cycle_end(),
            })
        }
    }

    #[tokio::test]
    async fn test_needs_link_all_missions_claimed_needs_start() {
        let api = ScriptedApi::new(
            NodeStatus::NeedsLink,
            MISSION_IDS.iter().map(|id| mission(id, true)).collect(),
            RewardEstimate::NeedsStart,
        );

        process_account(&api, &sample_credential(), offset())
            .await
            .unwrap();

        assert_eq!(
            api.calls(),
            vec![
                "sign_in",
                "node_status",
                "link_node",
                "list_missions",
                "estimate_rewards",
                "start_mining",
            ]
        );
    }

    #[tokio::test]
    async fn test_linked_node_skips_link_call() {
        let api = ScriptedApi::new(
            NodeStatus::Linked {
                node_id: "node-1".to_string(),
                total_reward: 100.0,
                today_reward: 2.0,
                hash_rate: 12.0,
            },
            vec![],
            RewardEstimate::Idle,
        );

        process_account(&api, &sample_credential(), offset())
            .await
            .unwrap();

        let calls = api.calls();
        assert!(!calls.contains(&"link_node".to_string()));
        assert!(!calls.contains(&"start_mining".to_string()));
        assert!(!calls.contains(&"claim_rewards".to_string()));
    }

    #[tokio::test]
    async fn test_only_unclaimed_missions_claimed() {
        let api = ScriptedApi::new(
            NodeStatus::NeedsLink,
            vec![
                mission("ACCOUNT_VERIFICATION", true),
                mission("JOIN_OUR_TELEGRAM_CHANNEL", false),
                mission("JOIN_OUR_DISCORD_CHANNEL", false),
                mission("FOLLOW_BOUNCETON_ON_X", true),
            ],
            RewardEstimate::Idle,
        );

        process_account(&api, &sample_credential(), offset())
            .await
            .unwrap();

        let claims: Vec<_> = api
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("claim_mission:"))
            .collect();
        assert_eq!(
            claims,
            vec![
                "claim_mission:JOIN_OUR_TELEGRAM_CHANNEL",
                "claim_mission:JOIN_OUR_DISCORD_CHANNEL",
            ]
        );
    }

    #[tokio::test]
    async fn test_mission_claim_failure_does_not_stop_sweep() {
        let mut api = ScriptedApi::new(
            NodeStatus::NeedsLink,
            MISSION_IDS.iter().map(|id| mission(id, false)).collect(),
            RewardEstimate::Idle,
        );
        api.failing_missions = vec!["JOIN_OUR_TELEGRAM_CHANNEL"];

        process_account(&api, &sample_credential(), offset())
            .await
            .unwrap();

        let claims: Vec<_> = api
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("claim_mission:"))
            .collect();
        // All four attempted despite the failure on the second
        assert_eq!(claims.len(), 4);
    }

    #[tokio::test]
    async fn test_ready_estimate_triggers_claim() {
        let api = ScriptedApi::new(
            NodeStatus::NeedsLink,
            vec![],
            RewardEstimate::Ready { value: 25.0 },
        );

        process_account(&api, &sample_credential(), offset())
            .await
            .unwrap();

        let calls = api.calls();
        assert!(calls.contains(&"claim_rewards".to_string()));
        assert!(!calls.contains(&"start_mining".to_string()));
    }

    #[tokio::test]
    async fn test_accruing_estimate_takes_no_action() {
        let api = ScriptedApi::new(
            NodeStatus::NeedsLink,
            vec![],
            RewardEstimate::Accruing {
                value: 3.0,
                elapsed_secs: 600,
            },
        );

        process_account(&api, &sample_credential(), offset())
            .await
            .unwrap();

        let calls = api.calls();
        assert!(!calls.contains(&"claim_rewards".to_string()));
        assert!(!calls.contains(&"start_mining".to_string()));
    }

    #[tokio::test]
    async fn test_sign_in_failure_aborts_account() {
        let mut api = ScriptedApi::new(NodeStatus::NeedsLink, vec![], RewardEstimate::Idle);
        api.fail_sign_in = true;

        let result = process_account(&api, &sample_credential(), offset()).await;
        assert!(result.is_err());
        assert_eq!(api.calls(), vec!["sign_in"]);
    }

    #[test]
    fn test_format_claim_time_applies_offset() {
        let formatted = format_claim_time(cycle_end(), offset());
        // 10:00 UTC displayed as 17:00 in UTC+7
        assert_eq!(formatted, "17:00:00 01/06/2025");
    }
}
