//! User domain.

#[cfg(feature = "http")]
pub mod client;

use serde::{Deserialize, Serialize};

use crate::shared::serde_util::null_default;
use crate::shared::{Extra, ResponseMeta, Time};

/// A user with free-form profile data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(
        default,
        deserialize_with = "null_default::deserialize",
        skip_serializing_if = "Extra::is_empty"
    )]
    pub data: Extra,
}

impl User {
    pub fn new(id: impl Into<String>, data: Extra) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserResponse {
    #[serde(flatten)]
    pub meta: ResponseMeta,
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub created_at: Option<Time>,
    #[serde(default)]
    pub updated_at: Option<Time>,
}

/// Reference to a user usable as an activity actor or object: `SU:<id>`.
pub fn create_user_reference(id: &str) -> String {
    format!("SU:{}", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_reference() {
        assert_eq!(create_user_reference("bob"), "SU:bob");
    }

    #[test]
    fn test_user_wire() {
        let user = User::new("bob", Extra::new());
        assert_eq!(serde_json::to_value(&user).unwrap(), json!({"id": "bob"}));

        let resp: UserResponse = serde_json::from_value(json!({
            "id": "bob",
            "data": {"name": "Bob"},
            "created_at": "2024-01-01T00:00:00.000001",
            "duration": "0.5ms"
        }))
        .unwrap();
        assert_eq!(resp.user.data["name"], "Bob");
        assert!(resp.created_at.is_some());
    }
}
