use jiff::civil::Date;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub member_since: Date,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Creator,
    Member,
}

impl UserProfile {
    /// Profile used before the user has named themselves.
    pub fn new_default(today: Date) -> Self {
        Self {
            name: "User".to_string(),
            member_since: today,
            role: None,
        }
    }
}
