//! Wire types returned by the backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = u64;

/// Per-user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub bio: String,

    /// Free-form preference document, merged server-side on PATCH
    #[serde(default)]
    pub preferences: serde_json::Map<String, serde_json::Value>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowStatus {
    Requested,
    Accepted,
}

/// A follow edge from `follower` to `following`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Follow {
    pub id: u64,
    pub follower: UserId,
    pub following: UserId,
    pub status: FollowStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_without_profile() {
        let user: User = serde_json::from_str(r#"{"id": 3, "username": "mina"}"#).unwrap();
        assert_eq!(user.id, 3);
        assert!(user.email.is_empty());
        assert!(user.profile.is_none());
    }

    #[test]
    fn test_follow_status_is_lowercase() {
        let follow: Follow = serde_json::from_str(
            r#"{"id": 1, "follower": 2, "following": 3, "status": "requested",
                "created_at": "2024-05-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(follow.status, FollowStatus::Requested);
    }
}
