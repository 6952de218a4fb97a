//! Activity domain: the activity codec, aggregated groups, partial updates.
//!
//! Activities have a small fixed schema plus arbitrary custom fields. Custom
//! fields are kept in [`Activity::extra`] and written back on encode, so
//! payloads survive a decode/encode cycle untouched.

#[cfg(feature = "http")]
pub mod client;
pub mod enriched;
pub mod wire;

pub use enriched::{EnrichedActivity, EnrichedReaction, Reference};

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::DecodeError;
use crate::shared::{Extra, Time};

// ─── Activity ────────────────────────────────────────────────────────────────

/// A feed activity.
///
/// Empty `id`/`actor`/`verb`/`object` are left out of the encoded object;
/// optional fields are written whenever they are `Some`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Activity {
    pub id: String,
    pub actor: String,
    pub verb: String,
    pub object: String,
    pub foreign_id: Option<String>,
    pub target: Option<String>,
    pub time: Option<Time>,
    pub origin: Option<String>,
    /// Recipient feed ids (`slug:user_id`).
    pub to: Vec<String>,
    pub score: Option<f64>,
    /// Custom fields. Overlaid on top of the fixed fields when encoding.
    pub extra: Extra,
}

impl Activity {
    pub fn new(actor: impl Into<String>, verb: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            verb: verb.into(),
            object: object.into(),
            ..Default::default()
        }
    }

    pub fn with_foreign_id(mut self, foreign_id: impl Into<String>) -> Self {
        self.foreign_id = Some(foreign_id.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<Time>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_to(mut self, to: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.to = to.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Encoded form with lexicographically ordered keys. Fails on a
    /// non-finite `score`.
    pub fn to_json(&self) -> Result<BTreeMap<String, Value>, serde_json::Error> {
        let mut out = BTreeMap::new();
        put_str(&mut out, "id", &self.id);
        put_str(&mut out, "actor", &self.actor);
        put_str(&mut out, "verb", &self.verb);
        put_str(&mut out, "object", &self.object);
        put_opt(&mut out, "foreign_id", &self.foreign_id);
        put_opt(&mut out, "target", &self.target);
        put_opt(&mut out, "origin", &self.origin);
        put_common(&mut out, self.time, &self.to, self.score)?;
        overlay(&mut out, &self.extra);
        Ok(out)
    }

    /// Decodes an activity object. Recognized keys are consumed; the rest
    /// end up in `extra`.
    pub fn from_json(mut map: Extra) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: take_str(&mut map, "id")?.unwrap_or_default(),
            actor: take_str(&mut map, "actor")?.unwrap_or_default(),
            verb: take_str(&mut map, "verb")?.unwrap_or_default(),
            object: take_str(&mut map, "object")?.unwrap_or_default(),
            foreign_id: take_str(&mut map, "foreign_id")?,
            target: take_str(&mut map, "target")?,
            time: take_time(&mut map, "time")?,
            origin: take_str(&mut map, "origin")?,
            to: take_to(&mut map)?,
            score: take_f64(&mut map, "score")?,
            extra: map,
        })
    }
}

impl Serialize for Activity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json()
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Activity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Extra::deserialize(deserializer)?;
        Activity::from_json(map).map_err(D::Error::custom)
    }
}

// ─── Codec helpers ───────────────────────────────────────────────────────────

fn put_str(out: &mut BTreeMap<String, Value>, key: &str, value: &str) {
    if !value.is_empty() {
        out.insert(key.to_string(), Value::from(value));
    }
}

fn put_opt(out: &mut BTreeMap<String, Value>, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        out.insert(key.to_string(), Value::from(v.as_str()));
    }
}

pub(crate) fn put_common(
    out: &mut BTreeMap<String, Value>,
    time: Option<Time>,
    to: &[String],
    score: Option<f64>,
) -> Result<(), serde_json::Error> {
    if let Some(t) = time {
        out.insert("time".to_string(), Value::from(t.format()));
    }
    if !to.is_empty() {
        out.insert("to".to_string(), Value::from(to.to_vec()));
    }
    if let Some(s) = score {
        if !s.is_finite() {
            return Err(serde_json::Error::custom(format!(
                "invalid score {}: expected a finite number",
                s
            )));
        }
        out.insert("score".to_string(), Value::from(s));
    }
    Ok(())
}

pub(crate) fn overlay(out: &mut BTreeMap<String, Value>, extra: &Extra) {
    for (k, v) in extra {
        out.insert(k.clone(), v.clone());
    }
}

pub(crate) fn take_str(map: &mut Extra, key: &str) -> Result<Option<String>, serde_json::Error> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(serde_json::Error::custom(format!(
            "invalid type for {}: expected a string, got {}",
            key, other
        ))),
    }
}

pub(crate) fn take_time(map: &mut Extra, key: &str) -> Result<Option<Time>, serde_json::Error> {
    take_str(map, key)?
        .map(|s| Time::parse(&s).map_err(serde_json::Error::custom))
        .transpose()
}

pub(crate) fn take_f64(map: &mut Extra, key: &str) -> Result<Option<f64>, serde_json::Error> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(other) => Err(serde_json::Error::custom(format!(
            "invalid type for {}: expected a number, got {}",
            key, other
        ))),
    }
}

pub(crate) fn take_as<T: serde::de::DeserializeOwned + Default>(
    map: &mut Extra,
    key: &str,
) -> Result<T, serde_json::Error> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(v) => serde_json::from_value(v),
    }
}

/// A `to` entry: a plain feed id or a `[feed_id, annotation]` pair.
#[derive(Deserialize)]
#[serde(untagged)]
enum ToTarget {
    Plain(String),
    Annotated(String, String),
}

pub(crate) fn take_to(map: &mut Extra) -> Result<Vec<String>, serde_json::Error> {
    let raw = match map.remove("to") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(v) => v,
    };
    let targets = Vec::<ToTarget>::deserialize(raw)
        .map_err(|_| serde_json::Error::custom(DecodeError::InvalidToTargets))?;
    Ok(targets
        .into_iter()
        .map(|t| match t {
            ToTarget::Plain(id) | ToTarget::Annotated(id, _) => id,
        })
        .collect())
}

// ─── Groups ──────────────────────────────────────────────────────────────────

/// A group of activities read from an aggregated feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityGroup<A = Activity> {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub verb: String,
    #[serde(default)]
    pub activity_count: i64,
    #[serde(default)]
    pub actor_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default = "Vec::new")]
    pub activities: Vec<A>,
}

/// A group of activities read from a notification feed, with read/seen state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationGroup<A = Activity> {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub verb: String,
    #[serde(default)]
    pub activity_count: i64,
    #[serde(default)]
    pub actor_count: i64,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub is_seen: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Time>,
    #[serde(default = "Vec::new")]
    pub activities: Vec<A>,
}

pub type EnrichedActivityGroup = ActivityGroup<EnrichedActivity>;
pub type EnrichedNotificationGroup = NotificationGroup<EnrichedActivity>;

// ─── Lookups and partial updates ─────────────────────────────────────────────

/// Identifies an activity by foreign id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignIdTimePair {
    pub foreign_id: String,
    pub time: Time,
}

impl ForeignIdTimePair {
    pub fn new(foreign_id: impl Into<String>, time: impl Into<Time>) -> Self {
        Self {
            foreign_id: foreign_id.into(),
            time: time.into(),
        }
    }
}

/// One partial-update changeset: fields to set and field names to unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateActivityRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<Time>,
    #[serde(skip_serializing_if = "Extra::is_empty")]
    pub set: Extra,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unset: Vec<String>,
}

impl UpdateActivityRequest {
    pub fn by_id(id: impl Into<String>, set: Extra, unset: Vec<String>) -> Self {
        Self {
            id: Some(id.into()),
            set,
            unset,
            ..Default::default()
        }
    }

    pub fn by_foreign_id(
        foreign_id: impl Into<String>,
        time: impl Into<Time>,
        set: Extra,
        unset: Vec<String>,
    ) -> Self {
        Self {
            foreign_id: Some(foreign_id.into()),
            time: Some(time.into()),
            set,
            unset,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn now() -> Time {
        Time::parse("2018-05-16T11:38:42.617348").unwrap()
    }

    #[test]
    fn test_encode_minimal() {
        let activity = Activity::new("actor", "verb", "object");
        assert_eq!(
            serde_json::to_string(&activity).unwrap(),
            r#"{"actor":"actor","object":"object","verb":"verb"}"#
        );
    }

    #[test]
    fn test_encode_with_time_and_extra() {
        let activity = Activity::new("actor", "verb", "object")
            .with_time(now())
            .with_extra("popularity", 42)
            .with_extra("size", json!({"height": 600, "width": 800}));
        assert_eq!(
            serde_json::to_string(&activity).unwrap(),
            r#"{"actor":"actor","object":"object","popularity":42,"size":{"height":600,"width":800},"time":"2018-05-16T11:38:42.617348","verb":"verb"}"#
        );
    }

    #[test]
    fn test_round_trip() {
        let activity = Activity {
            id: "0c7db91c-67f9-11e8-bcd9-fe00a9219401".into(),
            actor: "user:1".into(),
            verb: "like".into(),
            object: "post:42".into(),
            foreign_id: Some("like:42".into()),
            target: Some("board:7".into()),
            time: Some(now()),
            origin: Some("user:2".into()),
            to: vec!["notification:2".into(), "timeline:9".into()],
            score: Some(1.5),
            extra: json!({"nested": {"a": [1, 2, 3]}, "flag": true})
                .as_object()
                .cloned()
                .unwrap(),
        };
        let encoded = serde_json::to_string(&activity).unwrap();
        let decoded: Activity = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, activity);
    }

    #[test]
    fn test_non_finite_score_fails_to_encode() {
        for score in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let mut activity = Activity::new("a", "v", "o");
            activity.score = Some(score);
            assert!(activity.to_json().is_err());
            let err = serde_json::to_string(&activity).unwrap_err();
            assert!(err.to_string().contains("finite"));
        }
    }

    #[test]
    fn test_extra_overrides_fixed_fields() {
        let activity = Activity::new("actor", "verb", "object").with_extra("verb", "pin");
        let value = serde_json::to_value(&activity).unwrap();
        assert_eq!(value["verb"], json!("pin"));
    }

    #[test]
    fn test_unknown_keys_kept_in_extra() {
        let activity: Activity =
            serde_json::from_str(r#"{"actor":"a","verb":"v","object":"o","custom":{"x":1},"time":null}"#)
                .unwrap();
        assert_eq!(activity.extra.len(), 1);
        assert_eq!(activity.extra["custom"], json!({"x": 1}));
        assert_eq!(activity.time, None);
    }

    #[test]
    fn test_to_field_shapes() {
        let activity: Activity =
            serde_json::from_str(r#"{"to":["feed:1",["feed:2","annotation"]]}"#).unwrap();
        assert_eq!(activity.to, vec!["feed:1", "feed:2"]);

        let err = serde_json::from_str::<Activity>(r#"{"to":[[123]]}"#).unwrap_err();
        assert!(err.to_string().contains("invalid format for to targets"));

        assert!(serde_json::from_str::<Activity>(r#"{"to":"feed:1"}"#).is_err());
    }

    #[test]
    fn test_decode_failures() {
        assert!(serde_json::from_str::<Activity>(r#"{"time":"not a time"}"#).is_err());
        assert!(serde_json::from_str::<Activity>(r#"{"actor":12}"#).is_err());
        assert!(serde_json::from_str::<Activity>(r#"{"score":"high"}"#).is_err());
        assert!(serde_json::from_str::<Activity>("[]").is_err());
    }

    #[test]
    fn test_decode_alternate_time_layout() {
        let activity: Activity =
            serde_json::from_str(r#"{"time":"2018-05-16T11:38:42.617348Z"}"#).unwrap();
        assert_eq!(activity.time, Some(now()));
    }

    #[test]
    fn test_group_decode() {
        let group: ActivityGroup = serde_json::from_value(json!({
            "id": "g1",
            "group": "like_2018-05-16",
            "verb": "like",
            "activity_count": 2,
            "actor_count": 1,
            "created_at": "2018-05-16T11:38:42.617348",
            "activities": [{"actor": "a", "verb": "like", "object": "o1"}]
        }))
        .unwrap();
        assert_eq!(group.activity_count, 2);
        assert_eq!(group.activities[0].object, "o1");
        assert_eq!(group.created_at, Some(now()));
    }

    #[test]
    fn test_update_request_encoding() {
        let mut set = Extra::new();
        set.insert("popularity".into(), json!(10));
        let req = UpdateActivityRequest::by_foreign_id("post:1", now(), set, vec!["color".into()]);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "foreign_id": "post:1",
                "time": "2018-05-16T11:38:42.617348",
                "set": {"popularity": 10},
                "unset": ["color"]
            })
        );

        let req = UpdateActivityRequest::by_id("abc", Extra::new(), vec![]);
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"id": "abc"}));
    }
}
