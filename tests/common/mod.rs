//! Common test utilities and helpers
//!
//! Shared helpers for the wiremock-backed integration tests.

use meshchain_bot::{Settings, types::Credential};

/// Build a credential token with a properly URL-encoded `user=` fragment
pub fn credential_token(id: i64, username: &str, first_name: &str) -> String {
    let user_json = format!(
        r#"{{"id":{},"username":"{}","first_name":"{}"}}"#,
        id, username, first_name
    );

    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("query_id", "AAEtest")
        .append_pair("user", &user_json)
        .append_pair("auth_date", "1735000000")
        .append_pair("hash", "deadbeef")
        .finish();

    encoded
}

/// Parse a test credential
pub fn credential(id: i64, username: &str, first_name: &str) -> Credential {
    Credential::parse(credential_token(id, username, first_name)).unwrap()
}

/// Settings pointed at a mock server, with all delays zeroed so retries
/// and pass pacing don't slow the tests down
pub fn test_settings(base_url: &str) -> Settings {
    let mut settings = Settings::default();
    settings.api.base_url = base_url.to_string();
    settings.retry.attempts = 3;
    settings.retry.delay_secs = 0;
    settings.retry.status_attempts = 3;
    settings.retry.status_delay_secs = 0;
    settings.schedule.account_delay_secs = 0;
    settings
}
