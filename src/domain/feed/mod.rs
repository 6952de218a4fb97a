//! Feed domain: feed identity, follow relationships, read options.

#[cfg(feature = "http")]
pub mod client;
pub mod options;
pub mod wire;

pub use options::{
    FollowStatOption, FollowersOption, FollowingOption, GetActivitiesOption, ToTargetsUpdate,
};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::SdkError;
use crate::shared::Time;

/// Copy limit applied when following a feed without an explicit one.
pub const DEFAULT_ACTIVITY_COPY_LIMIT: u32 = 300;

// ─── FeedId ──────────────────────────────────────────────────────────────────

/// Validated feed identity: a feed group (`slug`) and a user id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedId {
    slug: String,
    user_id: String,
}

impl FeedId {
    /// Fails on an empty slug or a user id outside `[A-Za-z0-9_-]+`.
    pub fn new(slug: impl Into<String>, user_id: impl Into<String>) -> Result<Self, SdkError> {
        let slug = slug.into();
        let user_id = user_id.into();
        if slug.is_empty() {
            return Err(SdkError::validation("feed slug must not be empty"));
        }
        if !is_valid_user_id(&user_id) {
            return Err(SdkError::validation(format!(
                "invalid feed user id {:?}: must match [a-zA-Z0-9_-]+",
                user_id
            )));
        }
        Ok(Self { slug, user_id })
    }

    /// Parses `slug:user_id`.
    pub fn parse(id: &str) -> Result<Self, SdkError> {
        match id.split_once(':') {
            Some((slug, user_id)) => Self::new(slug, user_id),
            None => Err(SdkError::validation(format!(
                "invalid feed id {:?}: expected slug:user_id",
                id
            ))),
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Identifier used in token claims: slug and user id with no separator.
    pub fn signing_id(&self) -> String {
        format!("{}{}", self.slug, self.user_id)
    }
}

fn is_valid_user_id(user_id: &str) -> bool {
    !user_id.is_empty()
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.slug, self.user_id)
    }
}

impl FromStr for FeedId {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for FeedId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ─── Follow relationships ────────────────────────────────────────────────────

/// Source feed follows target feed. Both sides are `slug:user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowRelationship {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_copy_limit: Option<u32>,
}

impl FollowRelationship {
    pub fn new(source: &FeedId, target: &FeedId) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            activity_copy_limit: None,
        }
    }

    pub fn with_activity_copy_limit(mut self, limit: u32) -> Self {
        self.activity_copy_limit = Some(limit);
        self
    }
}

/// Source feed stops following target feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnfollowRelationship {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub keep_history: bool,
}

impl UnfollowRelationship {
    pub fn new(source: &FeedId, target: &FeedId, keep_history: bool) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            keep_history,
        }
    }
}

/// One edge of the follow graph as returned by follower/following listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follower {
    #[serde(default)]
    pub feed_id: String,
    #[serde(default)]
    pub target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Time>,
}

/// One to-targets change in a batch update, addressed by foreign id and time.
#[derive(Debug, Clone, PartialEq)]
pub struct ToTargetsRequest {
    pub foreign_id: String,
    pub time: Time,
    pub update: ToTargetsUpdate,
}

impl ToTargetsRequest {
    pub fn new(foreign_id: impl Into<String>, time: impl Into<Time>, update: ToTargetsUpdate) -> Self {
        Self {
            foreign_id: foreign_id.into(),
            time: time.into(),
            update,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_id_validation() {
        let cases = [
            ("user", "bob", true),
            ("user", "bob_123-x", true),
            ("user", "", false),
            ("user", "bob:1", false),
            ("user", "bob smith", false),
            ("user", "bób", false),
            ("", "bob", false),
        ];
        for (slug, user_id, ok) in cases {
            let result = FeedId::new(slug, user_id);
            assert_eq!(result.is_ok(), ok, "{}:{}", slug, user_id);
            if let Err(err) = result {
                assert!(matches!(err, SdkError::Validation(_)));
            }
        }
    }

    #[test]
    fn test_feed_id_identifiers() {
        let id = FeedId::new("timeline", "alice").unwrap();
        assert_eq!(id.to_string(), "timeline:alice");
        assert_eq!(id.signing_id(), "timelinealice");
        assert_eq!("timeline:alice".parse::<FeedId>().unwrap(), id);
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""timeline:alice""#);
    }

    #[test]
    fn test_feed_id_parse_rejects_missing_separator() {
        assert!(FeedId::parse("timelinealice").is_err());
        assert!(FeedId::parse("timeline:al:ice").is_err());
    }

    #[test]
    fn test_relationships_wire() {
        let a = FeedId::new("user", "a").unwrap();
        let b = FeedId::new("timeline", "b").unwrap();
        assert_eq!(
            serde_json::to_value(FollowRelationship::new(&b, &a)).unwrap(),
            serde_json::json!({"source": "timeline:b", "target": "user:a"})
        );
        assert_eq!(
            serde_json::to_value(FollowRelationship::new(&b, &a).with_activity_copy_limit(10))
                .unwrap()["activity_copy_limit"],
            10
        );
        assert_eq!(
            serde_json::to_value(UnfollowRelationship::new(&b, &a, true)).unwrap(),
            serde_json::json!({"source": "timeline:b", "target": "user:a", "keep_history": true})
        );
    }
}
