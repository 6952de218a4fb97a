//! Analytics domain: engagement and impression event builders.
//!
//! Events are open JSON objects; the builders only set well-known keys.
//! Every builder consumes and returns `self`.

#[cfg(feature = "http")]
pub mod client;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::Extra;

/// A named feature attached to an event, e.g. `("color", "red")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFeature {
    pub group: String,
    pub value: String,
}

impl EventFeature {
    pub fn new(group: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            value: value.into(),
        }
    }
}

/// The user an event is attributed to: a string or integer id, optionally
/// with a display alias.
#[derive(Debug, Clone, PartialEq)]
pub struct UserData {
    id: Value,
    alias: Option<String>,
}

impl UserData {
    pub fn string(id: impl Into<String>) -> Self {
        Self {
            id: Value::String(id.into()),
            alias: None,
        }
    }

    pub fn int(id: i64) -> Self {
        Self {
            id: Value::from(id),
            alias: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into()).filter(|a: &String| !a.is_empty());
        self
    }

    /// Bare id without an alias, `{"id", "alias"}` with one.
    fn to_value(&self) -> Value {
        match &self.alias {
            None => self.id.clone(),
            Some(alias) => serde_json::json!({"id": self.id, "alias": alias}),
        }
    }
}

fn features_value(features: Vec<EventFeature>) -> Value {
    Value::Array(
        features
            .into_iter()
            .map(|f| serde_json::json!({"group": f.group, "value": f.value}))
            .collect(),
    )
}

fn tracked_at_value(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::Secs, true))
}

// ─── Engagement ──────────────────────────────────────────────────────────────

/// A user interaction with a piece of content (click, share, like...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngagementEvent(Extra);

impl EngagementEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_map(&self) -> &Extra {
        &self.0
    }

    fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn with_label(self, label: impl Into<String>) -> Self {
        self.set("label", label.into())
    }

    pub fn with_user_data(self, user: &UserData) -> Self {
        self.set("user_data", user.to_value())
    }

    /// Content referenced by foreign id only.
    pub fn with_foreign_id(self, foreign_id: impl Into<String>) -> Self {
        self.set("content", foreign_id.into())
    }

    /// Content as an object; its `foreign_id` key is set to `foreign_id`.
    pub fn with_content(self, foreign_id: impl Into<String>, mut content: Extra) -> Self {
        content.insert("foreign_id".to_string(), Value::String(foreign_id.into()));
        self.set("content", Value::Object(content))
    }

    pub fn with_feed_id(self, feed_id: impl Into<String>) -> Self {
        self.set("feed_id", feed_id.into())
    }

    pub fn with_location(self, location: impl Into<String>) -> Self {
        self.set("location", location.into())
    }

    pub fn with_position(self, position: i64) -> Self {
        self.set("position", position)
    }

    pub fn with_features(self, features: Vec<EventFeature>) -> Self {
        self.set("features", features_value(features))
    }

    pub fn with_boost(self, boost: i64) -> Self {
        self.set("boost", boost)
    }

    pub fn with_tracked_at(self, at: DateTime<Utc>) -> Self {
        self.set("tracked_at", tracked_at_value(at))
    }
}

// ─── Impressions ─────────────────────────────────────────────────────────────

/// A batch of content shown to a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImpressionEventsData(Extra);

impl ImpressionEventsData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_map(&self) -> &Extra {
        &self.0
    }

    fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Replaces the list of shown foreign ids.
    pub fn with_foreign_ids(self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let ids: Vec<Value> = ids.into_iter().map(|id| Value::String(id.into())).collect();
        self.set("content_list", ids)
    }

    /// Appends to the list of shown foreign ids.
    pub fn add_foreign_ids(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let list = self
            .0
            .entry("content_list")
            .or_insert_with(|| Value::Array(Vec::new()));
        if !list.is_array() {
            *list = Value::Array(Vec::new());
        }
        if let Value::Array(items) = list {
            items.extend(ids.into_iter().map(|id| Value::String(id.into())));
        }
        self
    }

    pub fn with_user_data(self, user: &UserData) -> Self {
        self.set("user_data", user.to_value())
    }

    pub fn with_feed_id(self, feed_id: impl Into<String>) -> Self {
        self.set("feed_id", feed_id.into())
    }

    pub fn with_location(self, location: impl Into<String>) -> Self {
        self.set("location", location.into())
    }

    pub fn with_position(self, position: i64) -> Self {
        self.set("position", position)
    }

    pub fn with_features(self, features: Vec<EventFeature>) -> Self {
        self.set("features", features_value(features))
    }

    pub fn with_tracked_at(self, at: DateTime<Utc>) -> Self {
        self.set("tracked_at", tracked_at_value(at))
    }
}

/// Any event that can ride along a tracked redirect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalyticsEvent {
    Engagement(EngagementEvent),
    Impression(ImpressionEventsData),
}

impl From<EngagementEvent> for AnalyticsEvent {
    fn from(event: EngagementEvent) -> Self {
        Self::Engagement(event)
    }
}

impl From<ImpressionEventsData> for AnalyticsEvent {
    fn from(data: ImpressionEventsData) -> Self {
        Self::Impression(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_engagement_event() {
        let event = EngagementEvent::new()
            .with_label("click")
            .with_foreign_id("abcdef")
            .with_user_data(&UserData::int(12345).alias("John Doe"))
            .with_feed_id("timeline:123")
            .with_location("hawaii")
            .with_position(42)
            .with_boost(10);
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"boost":10,"content":"abcdef","feed_id":"timeline:123","label":"click","location":"hawaii","position":42,"user_data":{"alias":"John Doe","id":12345}}"#
        );
    }

    #[test]
    fn test_engagement_content_and_time() {
        let mut content = Extra::new();
        content.insert("title".into(), "hello".into());
        let event = EngagementEvent::new()
            .with_content("post:1", content)
            .with_tracked_at(Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap());
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"content": {"foreign_id": "post:1", "title": "hello"}, "tracked_at": "2024-05-06T07:08:09Z"})
        );
    }

    #[test]
    fn test_impression_foreign_ids() {
        let data = ImpressionEventsData::new()
            .with_foreign_ids(["a", "b"])
            .add_foreign_ids(["c"])
            .with_user_data(&UserData::string("bob"));
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({"content_list": ["a", "b", "c"], "user_data": "bob"})
        );
        let fresh = ImpressionEventsData::new().add_foreign_ids(["x"]);
        assert_eq!(fresh.as_map()["content_list"], json!(["x"]));
    }
}
