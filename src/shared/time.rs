//! Activity timestamps.
//!
//! The service sends naive UTC timestamps such as `2013-02-03T00:00:00.123456`
//! (no timezone suffix, at most microsecond precision). Reaction endpoints use
//! RFC 3339 and a few legacy payloads use `YYYY-MM-DD HH:MM:SS.ffffff±HH:MM`;
//! all three are accepted on decode and normalized to UTC.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DecodeError;

const LAYOUT: &str = "%Y-%m-%dT%H:%M:%S";
const LEGACY_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

/// A UTC timestamp truncated to microsecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(DateTime<Utc>);

impl Time {
    pub fn new(dt: DateTime<Utc>) -> Self {
        let micros = dt.nanosecond() / 1_000 * 1_000;
        Self(dt.with_nanosecond(micros).unwrap_or(dt))
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Formats as `YYYY-MM-DDTHH:MM:SS[.ffffff]`, trailing fractional zeros trimmed.
    pub fn format(&self) -> String {
        let base = self.0.format(LAYOUT).to_string();
        let micros = self.0.nanosecond() / 1_000;
        if micros == 0 {
            return base;
        }
        let frac = format!("{:06}", micros);
        format!("{}.{}", base, frac.trim_end_matches('0'))
    }

    pub fn parse(s: &str) -> Result<Self, DecodeError> {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Self::new(naive.and_utc()));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::new(dt.with_timezone(&Utc)));
        }
        DateTime::parse_from_str(s, LEGACY_LAYOUT)
            .map(|dt| Self::new(dt.with_timezone(&Utc)))
            .map_err(|_| DecodeError::InvalidTime(s.to_string()))
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl FromStr for Time {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<DateTime<Utc>> for Time {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::new(dt)
    }
}

impl From<NaiveDateTime> for Time {
    fn from(naive: NaiveDateTime) -> Self {
        Self::new(naive.and_utc())
    }
}

impl Serialize for Time {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format())
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Time::parse(&s).map_err(serde::de::Error::custom)
    }
}
