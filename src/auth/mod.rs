//! Authentication: claim sets and HS256 token signing.
//!
//! Every request carries a JWT signed with the application secret, sent as
//! `Stream-Auth-Type: jwt` plus `Authorization: <token>`. The claim set
//! depends on the resource being touched:
//!
//! - **Feed resources** (`feed`, `follower`, `activities`, `feed_targets`):
//!   `resource`, an `action` derived from the HTTP method, and `feed_id`
//!   (`slug` + `user_id` without separator, or `*` for app-wide calls).
//! - **App resources** (`collections`, `users`, `reactions`,
//!   `personalization`, `moderation`, `audit_logs`): wildcard `action`,
//!   `user_id` and `feed_id`.
//! - **Analytics** (`analytics`, `redirect_and_track`): wildcard `action` and
//!   `user_id`, no `feed_id`.

pub mod signer;

pub use signer::Signer;

use std::collections::BTreeMap;
use std::fmt;

/// Claim map signed into a token. Keys are serialized in sorted order.
pub type Claims = BTreeMap<String, serde_json::Value>;

/// Header naming the token type.
pub const HEADER_AUTH_TYPE: &str = "Stream-Auth-Type";
/// Header carrying the token.
pub const HEADER_AUTHORIZATION: &str = "Authorization";
/// The only supported auth type.
pub const AUTH_TYPE_JWT: &str = "jwt";

const WILDCARD: &str = "*";

// ============================================================================
// Resources and actions
// ============================================================================

/// Resource named in the `resource` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Feed,
    Follower,
    Activities,
    FeedTargets,
    Collections,
    Users,
    Reactions,
    Personalization,
    Moderation,
    AuditLogs,
    Analytics,
    AnalyticsRedirect,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Follower => "follower",
            Self::Activities => "activities",
            Self::FeedTargets => "feed_targets",
            Self::Collections => "collections",
            Self::Users => "users",
            Self::Reactions => "reactions",
            Self::Personalization => "personalization",
            Self::Moderation => "moderation",
            Self::AuditLogs => "audit_logs",
            Self::Analytics => "analytics",
            Self::AnalyticsRedirect => "redirect_and_track",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value of the `action` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    Write,
    Delete,
    All,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
            Self::All => WILDCARD,
        }
    }

    /// GET/HEAD/OPTIONS read, POST/PUT/PATCH write, DELETE deletes.
    /// Unknown methods fall back to the wildcard.
    pub fn from_method(method: &str) -> Self {
        match method.to_ascii_uppercase().as_str() {
            "GET" | "HEAD" | "OPTIONS" => Self::Read,
            "POST" | "PUT" | "PATCH" => Self::Write,
            "DELETE" => Self::Delete,
            _ => Self::All,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Scopes
// ============================================================================

/// Which claim set a request is signed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScope {
    /// Feed-level resource. `feed_id` is the signing id of a single feed, or
    /// `None` for app-wide access.
    Feed {
        resource: Resource,
        feed_id: Option<String>,
    },
    /// App-level resource with wildcard action, user and feed.
    App(Resource),
    /// Analytics resource with wildcard action and user.
    Analytics(Resource),
}

impl AuthScope {
    pub fn feed(resource: Resource, feed_id: impl Into<String>) -> Self {
        Self::Feed {
            resource,
            feed_id: Some(feed_id.into()),
        }
    }

    pub fn any_feed(resource: Resource) -> Self {
        Self::Feed {
            resource,
            feed_id: None,
        }
    }

    /// Builds the claim set for a request made with `method`.
    pub fn claims(&self, method: &str) -> Claims {
        let mut claims = Claims::new();
        match self {
            Self::Feed { resource, feed_id } => {
                claims.insert("resource".into(), resource.as_str().into());
                claims.insert("action".into(), Action::from_method(method).as_str().into());
                claims.insert(
                    "feed_id".into(),
                    feed_id.as_deref().unwrap_or(WILDCARD).into(),
                );
            }
            Self::App(resource) => {
                claims.insert("resource".into(), resource.as_str().into());
                claims.insert("action".into(), WILDCARD.into());
                claims.insert("user_id".into(), WILDCARD.into());
                claims.insert("feed_id".into(), WILDCARD.into());
            }
            Self::Analytics(resource) => {
                claims.insert("resource".into(), resource.as_str().into());
                claims.insert("action".into(), WILDCARD.into());
                claims.insert("user_id".into(), WILDCARD.into());
            }
        }
        claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_from_method() {
        assert_eq!(Action::from_method("GET"), Action::Read);
        assert_eq!(Action::from_method("head"), Action::Read);
        assert_eq!(Action::from_method("OPTIONS"), Action::Read);
        assert_eq!(Action::from_method("POST"), Action::Write);
        assert_eq!(Action::from_method("PUT"), Action::Write);
        assert_eq!(Action::from_method("PATCH"), Action::Write);
        assert_eq!(Action::from_method("DELETE"), Action::Delete);
    }

    #[test]
    fn test_feed_claims() {
        let claims = AuthScope::feed(Resource::Follower, "userbob").claims("DELETE");
        assert_eq!(claims["resource"], json!("follower"));
        assert_eq!(claims["action"], json!("delete"));
        assert_eq!(claims["feed_id"], json!("userbob"));

        let claims = AuthScope::any_feed(Resource::Activities).claims("GET");
        assert_eq!(claims["feed_id"], json!("*"));
        assert!(!claims.contains_key("user_id"));
    }

    #[test]
    fn test_app_and_analytics_claims() {
        let claims = AuthScope::App(Resource::AuditLogs).claims("GET");
        assert_eq!(
            serde_json::to_value(&claims).unwrap(),
            json!({"action": "*", "feed_id": "*", "resource": "audit_logs", "user_id": "*"})
        );

        let claims = AuthScope::Analytics(Resource::AnalyticsRedirect).claims("GET");
        assert_eq!(
            serde_json::to_value(&claims).unwrap(),
            json!({"action": "*", "resource": "redirect_and_track", "user_id": "*"})
        );
    }
}
