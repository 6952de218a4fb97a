//! Rate-limit information and the common response envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Duration;

pub const HEADER_RATE_LIMIT: &str = "X-Ratelimit-Limit";
pub const HEADER_RATE_REMAINING: &str = "X-Ratelimit-Remaining";
pub const HEADER_RATE_RESET: &str = "X-Ratelimit-Reset";

/// Rate-limit state reported by the service for the resource just called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub remaining: i64,
    /// When the window resets. Absent unless the header held a positive epoch.
    #[serde(default)]
    pub reset: Option<DateTime<Utc>>,
}

impl Rate {
    /// Builds a `Rate` from raw header values. Unparseable values are ignored.
    pub fn from_header_values(
        limit: Option<&str>,
        remaining: Option<&str>,
        reset: Option<&str>,
    ) -> Self {
        let int = |v: Option<&str>| v.and_then(|s| s.trim().parse::<i64>().ok());
        Self {
            limit: int(limit).unwrap_or_default(),
            remaining: int(remaining).unwrap_or_default(),
            reset: int(reset)
                .filter(|secs| *secs > 0)
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        }
    }
}

/// Fields present on every response: server processing time and rate limit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(default)]
    pub duration: Duration,
    #[serde(default)]
    pub ratelimit: Rate,
}

/// Plain acknowledgement response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseResponse {
    #[serde(flatten)]
    pub meta: ResponseMeta,
}

impl ResponseMeta {
    /// Splits the envelope keys out of a raw response object.
    pub(crate) fn take_from(
        map: &mut serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, serde_json::Error> {
        let duration = match map.remove("duration") {
            Some(serde_json::Value::Null) | None => Duration::default(),
            Some(v) => serde_json::from_value(v)?,
        };
        let ratelimit = match map.remove("ratelimit") {
            Some(serde_json::Value::Null) | None => Rate::default(),
            Some(v) => serde_json::from_value(v)?,
        };
        Ok(Self {
            duration,
            ratelimit,
        })
    }
}
