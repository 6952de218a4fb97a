//! Personalization domain: generic responses from the personalization service.

#[cfg(feature = "http")]
pub mod client;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::domain::activity::take_as;
use crate::shared::{Extra, ResponseMeta};

/// Response of any personalization endpoint.
///
/// Common keys are typed; everything else lands in `extra`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonalizationResponse {
    pub meta: ResponseMeta,
    pub app_id: i64,
    pub limit: i64,
    pub offset: i64,
    pub version: String,
    pub next: String,
    pub results: Vec<Extra>,
    pub extra: Extra,
}

impl<'de> Deserialize<'de> for PersonalizationResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut map = Extra::deserialize(deserializer)?;
        let meta = ResponseMeta::take_from(&mut map).map_err(D::Error::custom)?;
        Ok(Self {
            meta,
            app_id: take_as(&mut map, "app_id").map_err(D::Error::custom)?,
            limit: take_as(&mut map, "limit").map_err(D::Error::custom)?,
            offset: take_as(&mut map, "offset").map_err(D::Error::custom)?,
            version: take_as(&mut map, "version").map_err(D::Error::custom)?,
            next: take_as(&mut map, "next").map_err(D::Error::custom)?,
            results: take_as(&mut map, "results").map_err(D::Error::custom)?,
            extra: map,
        })
    }
}
