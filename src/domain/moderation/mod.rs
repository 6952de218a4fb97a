//! Moderation domain: flags and review statuses, single or batched.

#[cfg(feature = "http")]
pub mod client;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::SdkError;
use crate::shared::serde_util::null_default;
use crate::shared::ResponseMeta;

pub const ENTITY_ACTIVITY: &str = "stream:feeds:v2:activity";
pub const ENTITY_REACTION: &str = "stream:feeds:v2:reaction";
pub const ENTITY_USER: &str = "stream:user";

/// Upper bound on updates in one batch.
pub const MAX_BATCH_UPDATES: usize = 100;

/// Review outcome recorded by a moderator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModerationStatus {
    pub status: String,
    pub recommended_action: String,
    pub latest_moderator_action: String,
}

impl ModerationStatus {
    pub fn new(
        status: impl Into<String>,
        recommended_action: impl Into<String>,
        latest_moderator_action: impl Into<String>,
    ) -> Self {
        Self {
            status: status.into(),
            recommended_action: recommended_action.into(),
            latest_moderator_action: latest_moderator_action.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct FlagBody<'a> {
    pub user_id: &'a str,
    pub entity_type: &'a str,
    pub entity_id: &'a str,
    pub reason: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusBody<'a> {
    pub entity_type: &'a str,
    pub entity_id: &'a str,
    pub moderator_id: &'a str,
    pub status: &'a str,
    pub recommended_action: &'a str,
    pub latest_moderator_action: &'a str,
}

// ─── Batch ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusBatchItem {
    pub entity_type: String,
    pub entity_id: String,
    pub status: String,
    pub recommended_action: String,
    pub latest_moderator_action: String,
}

impl UpdateStatusBatchItem {
    pub fn new(
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        status: &ModerationStatus,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            status: status.status.clone(),
            recommended_action: status.recommended_action.clone(),
            latest_moderator_action: status.latest_moderator_action.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusBatchRequest {
    pub moderator_id: String,
    pub updates: Vec<UpdateStatusBatchItem>,
}

impl UpdateStatusBatchRequest {
    /// Checks the request locally: a moderator, 1 to 100 updates, each
    /// naming an entity, and no entity twice.
    pub fn validate(&self) -> Result<(), SdkError> {
        if self.moderator_id.is_empty() {
            return Err(SdkError::validation("moderator_id is required"));
        }
        if self.updates.len() > MAX_BATCH_UPDATES {
            return Err(SdkError::validation(format!(
                "maximum of {} updates allowed, got {}",
                MAX_BATCH_UPDATES,
                self.updates.len()
            )));
        }
        if self.updates.is_empty() {
            return Err(SdkError::validation("at least one update is required"));
        }

        let mut seen = HashSet::new();
        for (i, update) in self.updates.iter().enumerate() {
            if update.entity_type.is_empty() {
                return Err(SdkError::validation(format!(
                    "entity_type is required for update at index {}",
                    i
                )));
            }
            if update.entity_id.is_empty() {
                return Err(SdkError::validation(format!(
                    "entity_id is required for update at index {}",
                    i
                )));
            }
            if !seen.insert((update.entity_type.as_str(), update.entity_id.as_str())) {
                return Err(SdkError::validation(format!(
                    "duplicate entity found: entity_type={}, entity_id={}",
                    update.entity_type, update.entity_id
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateStatusBatchResult {
    #[serde(default)]
    pub entity_id: String,
    #[serde(default)]
    pub entity_type: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateStatusBatchResponse {
    #[serde(flatten)]
    pub meta: ResponseMeta,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub results: Vec<UpdateStatusBatchResult>,
}
