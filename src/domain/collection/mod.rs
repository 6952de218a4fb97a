//! Collection domain: app-wide objects referenced from activities.

#[cfg(feature = "http")]
pub mod client;

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::shared::serde_util::null_default;
use crate::shared::{Extra, ResponseMeta, Time};

/// An object stored in a collection.
///
/// Encodes flat: `id` next to the data keys. A data key named `id` wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionObject {
    pub id: String,
    pub data: Extra,
}

impl CollectionObject {
    pub fn new(id: impl Into<String>, data: Extra) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

impl Serialize for CollectionObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut flat: BTreeMap<&str, &Value> = BTreeMap::new();
        let id = Value::String(self.id.clone());
        flat.insert("id", &id);
        for (k, v) in &self.data {
            flat.insert(k, v);
        }
        let mut map = serializer.serialize_map(Some(flat.len()))?;
        for (k, v) in flat {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CollectionObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut data = Extra::deserialize(deserializer)?;
        let id = match data.remove("id") {
            Some(Value::String(id)) => id,
            Some(Value::Null) | None => String::new(),
            Some(other) => {
                return Err(D::Error::custom(format!(
                    "collection object id must be a string, got {}",
                    other
                )))
            }
        };
        Ok(Self { id, data })
    }
}

/// An object as returned by single-object calls.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CollectionObjectResponse {
    #[serde(flatten)]
    pub meta: ResponseMeta,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub collection: String,
    #[serde(default)]
    pub foreign_id: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub data: Extra,
    #[serde(default)]
    pub created_at: Option<Time>,
    #[serde(default)]
    pub updated_at: Option<Time>,
}

/// One object of a select call, keyed by `<collection>:<id>`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GetCollectionResponseObject {
    #[serde(default)]
    pub foreign_id: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub data: Extra,
}

/// Objects returned by a select call, unwrapped from the
/// `{"response": {"data": [...]}}` envelope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetCollectionResponse {
    pub meta: ResponseMeta,
    pub objects: Vec<GetCollectionResponseObject>,
}

impl<'de> Deserialize<'de> for GetCollectionResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize, Default)]
        struct Inner {
            #[serde(default, deserialize_with = "null_default::deserialize")]
            data: Vec<GetCollectionResponseObject>,
        }

        #[derive(Deserialize)]
        struct Wrap {
            #[serde(flatten)]
            meta: ResponseMeta,
            #[serde(default, deserialize_with = "null_default::deserialize")]
            response: Inner,
        }

        let wrap = Wrap::deserialize(deserializer)?;
        Ok(Self {
            meta: wrap.meta,
            objects: wrap.response.data,
        })
    }
}

/// Reference to a collection object usable in activities:
/// `SO:<collection>:<id>`.
pub fn create_collection_reference(collection: &str, id: &str) -> String {
    format!("SO:{}:{}", collection, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn data(value: Value) -> Extra {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_object_encodes_flat() {
        let obj = CollectionObject::new("cheese", data(json!({"name": "gouda", "age": 2})));
        assert_eq!(
            serde_json::to_value(&obj).unwrap(),
            json!({"id": "cheese", "name": "gouda", "age": 2})
        );
        let back: CollectionObject = serde_json::from_value(serde_json::to_value(&obj).unwrap()).unwrap();
        assert_eq!(back, obj);
    }

    #[test]
    fn test_select_response_unwraps() {
        let resp: GetCollectionResponse = serde_json::from_value(json!({
            "duration": "3ms",
            "response": {"data": [{"foreign_id": "food:cheese", "data": {"name": "gouda"}}]}
        }))
        .unwrap();
        assert_eq!(resp.objects.len(), 1);
        assert_eq!(resp.objects[0].foreign_id, "food:cheese");
    }

    #[test]
    fn test_collection_reference() {
        assert_eq!(create_collection_reference("food", "cheese"), "SO:food:cheese");
    }
}
