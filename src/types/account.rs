//! Account credential parsing
//!
//! A credential is the opaque auth token string the miniapp hands to the
//! API. It is shaped like a query string and carries a URL-encoded `user=`
//! fragment holding a JSON object with the account identity. Parsing happens
//! once per processing pass; the raw string is kept because the link-node
//! call sends it back verbatim.

use serde::{Deserialize, Serialize};

/// Identity fields embedded in the credential's `user=` fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Numeric account id, used as the node's external key
    pub id: i64,
    /// Account username, used as the node display name
    pub username: String,
    /// First name, used in log banners
    pub first_name: String,
}

/// A parsed account credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// The raw token string, sent verbatim on sign-in and node link
    raw: String,
    /// Identity extracted from the embedded `user=` fragment
    user: UserIdentity,
}

impl Credential {
    /// Parse a credential token, extracting the embedded user identity.
    ///
    /// Fails deterministically when the `user=` fragment is absent or its
    /// JSON payload is malformed or missing required fields.
    pub fn parse(raw: impl Into<String>) -> crate::Result<Self> {
        let raw = raw.into();

        let user_json = url::form_urlencoded::parse(raw.as_bytes())
            .find(|(key, _)| key == "user")
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| crate::Error::credential("missing user= fragment"))?;

        let user: UserIdentity = serde_json::from_str(&user_json)
            .map_err(|e| crate::Error::credential(format!("invalid user payload: {}", e)))?;

        Ok(Self { raw, user })
    }

    /// The raw token string
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The embedded identity
    pub fn user(&self) -> &UserIdentity {
        &self.user
    }

    /// Numeric account id
    pub fn unique_id(&self) -> i64 {
        self.user.id
    }
}

/// Load credentials from a newline-delimited file, one token per line.
///
/// Carriage returns are stripped and blank lines skipped. Any line that
/// fails to parse aborts loading; a half-usable account list would silently
/// shift the positional proxy mapping.
pub fn load_credentials(path: &std::path::Path) -> crate::Result<Vec<Credential>> {
    let content = std::fs::read_to_string(path)?;

    content
        .replace('\r', "")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(Credential::parse)
        .collect()
}
