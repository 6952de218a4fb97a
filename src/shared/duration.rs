//! Server-reported durations.
//!
//! Responses carry durations as strings like `"10ms"` or `"1m2.5s"`, and
//! occasionally as a plain number of seconds.

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DecodeError;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Non-negative duration with a `1h2m3.5s`-style text form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(StdDuration);

impl Duration {
    pub const ZERO: Duration = Duration(StdDuration::ZERO);

    pub fn new(d: StdDuration) -> Self {
        Self(d)
    }

    pub fn as_std(&self) -> StdDuration {
        self.0
    }

    pub fn parse(s: &str) -> Result<Self, DecodeError> {
        let err = || DecodeError::InvalidDuration(s.to_string());
        let mut rest = s.strip_prefix('+').unwrap_or(s);
        if rest == "0" {
            return Ok(Self::ZERO);
        }
        if rest.is_empty() {
            return Err(err());
        }

        let mut total: u128 = 0;
        while !rest.is_empty() {
            let number_end = rest
                .find(|c: char| !(c.is_ascii_digit() || c == '.'))
                .ok_or_else(err)?;
            let (number, tail) = rest.split_at(number_end);
            let unit_end = tail
                .find(|c: char| c.is_ascii_digit() || c == '.')
                .unwrap_or(tail.len());
            let (unit, tail) = tail.split_at(unit_end);

            let unit_nanos: u128 = match unit {
                "ns" => 1,
                "us" | "µs" | "μs" => 1_000,
                "ms" => 1_000_000,
                "s" => NANOS_PER_SEC,
                "m" => 60 * NANOS_PER_SEC,
                "h" => 3_600 * NANOS_PER_SEC,
                _ => return Err(err()),
            };

            let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
            if whole.is_empty() && frac.is_empty() {
                return Err(err());
            }
            let whole: u128 = if whole.is_empty() {
                0
            } else {
                whole.parse().map_err(|_| err())?
            };
            let mut nanos = whole.checked_mul(unit_nanos).ok_or_else(err)?;
            if !frac.is_empty() {
                let digits = &frac[..frac.len().min(18)];
                let value: u128 = digits.parse().map_err(|_| err())?;
                nanos += value * unit_nanos / 10u128.pow(digits.len() as u32);
            }
            total = total.checked_add(nanos).ok_or_else(err)?;
            rest = tail;
        }

        let nanos = u64::try_from(total).map_err(|_| err())?;
        Ok(Self(StdDuration::from_nanos(nanos)))
    }

    fn from_seconds(secs: f64) -> Result<Self, DecodeError> {
        StdDuration::try_from_secs_f64(secs)
            .map(Self)
            .map_err(|_| DecodeError::InvalidDuration(secs.to_string()))
    }
}

fn with_fraction(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let rem = value % unit;
    if rem == 0 {
        return whole.to_string();
    }
    let width = unit.to_string().len() - 1;
    let frac = format!("{:0width$}", rem, width = width);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = self.0.as_nanos();
        if nanos == 0 {
            return f.write_str("0s");
        }
        if nanos < 1_000 {
            return write!(f, "{}ns", nanos);
        }
        if nanos < 1_000_000 {
            return write!(f, "{}µs", with_fraction(nanos, 1_000));
        }
        if nanos < NANOS_PER_SEC {
            return write!(f, "{}ms", with_fraction(nanos, 1_000_000));
        }

        let secs = nanos / NANOS_PER_SEC;
        let hours = secs / 3_600;
        let minutes = secs % 3_600 / 60;
        if hours > 0 {
            write!(f, "{}h", hours)?;
        }
        if hours > 0 || minutes > 0 {
            write!(f, "{}m", minutes)?;
        }
        let rest = nanos % (60 * NANOS_PER_SEC);
        write!(f, "{}s", with_fraction(rest, NANOS_PER_SEC))
    }
}

impl FromStr for Duration {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<StdDuration> for Duration {
    fn from(d: StdDuration) -> Self {
        Self(d)
    }
}

impl Serialize for Duration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Seconds(f64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Duration::parse(&s),
            Raw::Seconds(secs) => Duration::from_seconds(secs),
        }
        .map_err(serde::de::Error::custom)
    }
}
