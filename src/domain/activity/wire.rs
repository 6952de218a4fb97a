//! Wire types for activity endpoints.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use super::{Activity, EnrichedActivity, UpdateActivityRequest};
use crate::shared::{Extra, ResponseMeta};

// ─── Requests ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct ActivitiesBody<'a> {
    #[serde(skip_serializing_if = "<[Activity]>::is_empty")]
    pub activities: &'a [Activity],
}

#[derive(Debug, Serialize)]
pub(crate) struct PartialUpdateBody<'a> {
    #[serde(skip_serializing_if = "<[UpdateActivityRequest]>::is_empty")]
    pub changes: &'a [UpdateActivityRequest],
}

// ─── Responses ───────────────────────────────────────────────────────────────

/// Response carrying a single activity at the top level (add, partial update).
///
/// The envelope keys are split off before the activity is decoded, so
/// `duration` and `ratelimit` never leak into [`Activity::extra`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityResponse {
    pub meta: ResponseMeta,
    pub activity: Activity,
}

impl<'de> Deserialize<'de> for ActivityResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut map = Extra::deserialize(deserializer)?;
        let meta = ResponseMeta::take_from(&mut map).map_err(D::Error::custom)?;
        let activity = Activity::from_json(map).map_err(D::Error::custom)?;
        Ok(Self { meta, activity })
    }
}

pub type AddActivityResponse = ActivityResponse;
pub type UpdateActivityResponse = ActivityResponse;

/// Activities looked up by id or foreign id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GetActivitiesResponse {
    #[serde(flatten)]
    pub meta: ResponseMeta,
    #[serde(default)]
    pub results: Vec<Activity>,
}

/// Enriched activities looked up by id or foreign id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GetEnrichedActivitiesResponse {
    #[serde(flatten)]
    pub meta: ResponseMeta,
    #[serde(default)]
    pub results: Vec<EnrichedActivity>,
}

/// Activities affected by a batch partial update.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateActivitiesResponse {
    #[serde(flatten)]
    pub meta: ResponseMeta,
    #[serde(default)]
    pub activities: Vec<Activity>,
}
