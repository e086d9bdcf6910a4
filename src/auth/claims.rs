/// Access token claims
///
/// `sub` carries the username. It is optional on the wire so that a token
/// without a subject can be told apart from an undecodable one.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    pub fn new(subject: &str, ttl: Duration) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: Some(subject.to_string()),
            exp: now + ttl.num_seconds(),
            iat: now,
        }
    }

    /// Expired once the current second reaches `exp`
    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }

    /// The subject, if present and non-empty
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref().filter(|s| !s.is_empty())
    }
}
