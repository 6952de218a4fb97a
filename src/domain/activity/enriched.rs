//! Enriched activities: references resolved into embedded objects, plus
//! reaction data.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::{overlay, put_common, take_as, take_f64, take_str, take_time, take_to};
use crate::error::DecodeError;
use crate::shared::{Extra, Time};

/// Key under which an embedded foreign-id activity is preserved.
pub const FOREIGN_ID_REF_KEY: &str = "foreign_id_ref";

// ─── Reference ───────────────────────────────────────────────────────────────

/// A reference that may have been enriched.
///
/// Decodes from a bare id string or from an object carrying `id`; the other
/// keys of the object are kept in `extra`. Encodes back to a string when
/// nothing was embedded, otherwise to the same flat object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reference {
    pub id: String,
    pub extra: Extra,
}

impl Reference {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extra: Extra::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.extra.is_empty()
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::String(id) => Ok(Self::new(id)),
            Value::Object(mut map) => {
                let id = match map.remove("id") {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::String(id)) => id,
                    Some(_) => return Err(DecodeError::InvalidReference),
                };
                Ok(Self { id, extra: map })
            }
            _ => Err(DecodeError::InvalidReference),
        }
    }

    fn to_value(&self) -> Value {
        if self.extra.is_empty() {
            return Value::from(self.id.as_str());
        }
        let mut map = self.extra.clone();
        map.insert("id".to_string(), Value::from(self.id.as_str()));
        Value::Object(map)
    }
}

impl Serialize for Reference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Reference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Reference::from_value(value).map_err(D::Error::custom)
    }
}

fn take_ref(map: &mut Extra, key: &str) -> Result<Option<Reference>, serde_json::Error> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => Reference::from_value(v)
            .map(Some)
            .map_err(serde_json::Error::custom),
    }
}

/// `None` is left out; an empty reference is written as `""`.
fn put_ref(out: &mut BTreeMap<String, Value>, key: &str, value: &Option<Reference>) {
    if let Some(r) = value {
        out.insert(key.to_string(), r.to_value());
    }
}

// ─── EnrichedReaction ────────────────────────────────────────────────────────

/// A reaction embedded in an enriched activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedReaction {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub activity_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Extra::is_empty")]
    pub data: Extra,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_feeds: Vec<String>,
    #[serde(default, rename = "parent", skip_serializing_if = "String::is_empty")]
    pub parent_id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub latest_children: BTreeMap<String, Vec<EnrichedReaction>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub own_children: BTreeMap<String, Vec<EnrichedReaction>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children_counts: BTreeMap<String, i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Time>,
}

// ─── EnrichedActivity ────────────────────────────────────────────────────────

/// An activity whose references were resolved by the service.
///
/// A `foreign_id` that arrives as an embedded activity object is rewritten to
/// `SA:<id>`, and the object is kept in `extra["foreign_id_ref"]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedActivity {
    pub id: String,
    pub actor: Option<Reference>,
    pub verb: String,
    pub object: Option<Reference>,
    pub foreign_id: Option<String>,
    pub target: Option<Reference>,
    pub time: Option<Time>,
    pub origin: Option<Reference>,
    pub to: Vec<String>,
    pub score: Option<f64>,
    pub reaction_counts: BTreeMap<String, i64>,
    pub own_reactions: BTreeMap<String, Vec<EnrichedReaction>>,
    pub latest_reactions: BTreeMap<String, Vec<EnrichedReaction>>,
    pub extra: Extra,
}

impl EnrichedActivity {
    pub fn to_json(&self) -> Result<BTreeMap<String, Value>, serde_json::Error> {
        let mut out = BTreeMap::new();
        if !self.id.is_empty() {
            out.insert("id".to_string(), Value::from(self.id.as_str()));
        }
        if !self.verb.is_empty() {
            out.insert("verb".to_string(), Value::from(self.verb.as_str()));
        }
        put_ref(&mut out, "actor", &self.actor);
        put_ref(&mut out, "object", &self.object);
        put_ref(&mut out, "target", &self.target);
        put_ref(&mut out, "origin", &self.origin);
        if let Some(fid) = &self.foreign_id {
            out.insert("foreign_id".to_string(), Value::from(fid.as_str()));
        }
        put_common(&mut out, self.time, &self.to, self.score)?;
        if !self.reaction_counts.is_empty() {
            out.insert("reaction_counts".to_string(), serde_json::to_value(&self.reaction_counts)?);
        }
        if !self.own_reactions.is_empty() {
            out.insert("own_reactions".to_string(), serde_json::to_value(&self.own_reactions)?);
        }
        if !self.latest_reactions.is_empty() {
            out.insert(
                "latest_reactions".to_string(),
                serde_json::to_value(&self.latest_reactions)?,
            );
        }
        overlay(&mut out, &self.extra);
        Ok(out)
    }

    pub fn from_json(mut map: Extra) -> Result<Self, serde_json::Error> {
        let foreign_id = match map.remove("foreign_id") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(Value::Object(referenced)) => {
                let id = match referenced.get("id") {
                    Some(Value::String(id)) => id.clone(),
                    other => {
                        return Err(serde_json::Error::custom(format!(
                            "invalid format for enriched referenced activity id: {:?}",
                            other
                        )))
                    }
                };
                map.insert(FOREIGN_ID_REF_KEY.to_string(), Value::Object(referenced));
                Some(format!("SA:{}", id))
            }
            Some(other) => {
                return Err(serde_json::Error::custom(format!(
                    "invalid type for foreign_id: {}",
                    other
                )))
            }
        };

        Ok(Self {
            id: take_str(&mut map, "id")?.unwrap_or_default(),
            actor: take_ref(&mut map, "actor")?,
            verb: take_str(&mut map, "verb")?.unwrap_or_default(),
            object: take_ref(&mut map, "object")?,
            foreign_id,
            target: take_ref(&mut map, "target")?,
            time: take_time(&mut map, "time")?,
            origin: take_ref(&mut map, "origin")?,
            to: take_to(&mut map)?,
            score: take_f64(&mut map, "score")?,
            reaction_counts: take_as(&mut map, "reaction_counts")?,
            own_reactions: take_as(&mut map, "own_reactions")?,
            latest_reactions: take_as(&mut map, "latest_reactions")?,
            extra: map,
        })
    }
}

impl Serialize for EnrichedActivity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json()
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EnrichedActivity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Extra::deserialize(deserializer)?;
        EnrichedActivity::from_json(map).map_err(D::Error::custom)
    }
}
