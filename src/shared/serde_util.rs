//! Custom serde helpers for backend wire formats.

/// Deserializes `null` as `T::default()`.
///
/// The service sends `null` instead of `[]`/`{}` for empty collections on
/// several endpoints (reaction children, follow results).
pub mod null_default {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::null_default::deserialize")]
        items: Vec<u32>,
        #[serde(default, deserialize_with = "super::null_default::deserialize")]
        data: serde_json::Map<String, serde_json::Value>,
    }

    #[test]
    fn test_null_and_missing_become_default() {
        let p: Probe = serde_json::from_str(r#"{"items":null,"data":null}"#).unwrap();
        assert!(p.items.is_empty());
        assert!(p.data.is_empty());

        let p: Probe = serde_json::from_str(r#"{"items":[1,2]}"#).unwrap();
        assert_eq!(p.items, vec![1, 2]);
        assert!(p.data.is_empty());
    }
}
