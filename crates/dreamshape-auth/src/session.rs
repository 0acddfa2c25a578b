use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Refresh this many seconds before the access token actually expires.
const EXPIRY_SKEW_SECONDS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// A signed-in session, persisted locally between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: Timestamp,
    pub user: AuthUser,
}

impl Session {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now.as_second() + EXPIRY_SKEW_SECONDS >= self.expires_at.as_second()
    }
}

/// Token grant response body.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: AuthUser,
}

impl TokenResponse {
    pub(crate) fn into_session(self, now: Timestamp) -> Session {
        let expires_at = Timestamp::from_second(now.as_second() + self.expires_in).unwrap_or(now);
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}
