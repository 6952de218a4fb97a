//! Moderation sub-client.

use crate::auth::{AuthScope, Resource};
use crate::client::StreamClient;
use crate::domain::moderation::{
    FlagBody, ModerationStatus, StatusBody, UpdateStatusBatchRequest, UpdateStatusBatchResponse,
    ENTITY_ACTIVITY, ENTITY_REACTION, ENTITY_USER,
};
use crate::error::SdkError;
use crate::http::path_segment;
use crate::shared::BaseResponse;

const SCOPE: AuthScope = AuthScope::App(Resource::Moderation);

pub struct Moderation<'a> {
    pub(crate) client: &'a StreamClient,
}

impl<'a> Moderation<'a> {
    // ── Flags ────────────────────────────────────────────────────────────

    pub async fn flag_activity(
        &self,
        user_id: &str,
        activity_id: &str,
        reason: &str,
    ) -> Result<BaseResponse, SdkError> {
        self.flag(user_id, ENTITY_ACTIVITY, activity_id, reason).await
    }

    pub async fn flag_reaction(
        &self,
        user_id: &str,
        reaction_id: &str,
        reason: &str,
    ) -> Result<BaseResponse, SdkError> {
        self.flag(user_id, ENTITY_REACTION, reaction_id, reason).await
    }

    pub async fn flag_user(
        &self,
        user_id: &str,
        target_user_id: &str,
        reason: &str,
    ) -> Result<BaseResponse, SdkError> {
        self.flag(user_id, ENTITY_USER, target_user_id, reason).await
    }

    async fn flag(
        &self,
        user_id: &str,
        entity_type: &str,
        entity_id: &str,
        reason: &str,
    ) -> Result<BaseResponse, SdkError> {
        let endpoint = self.client.http.endpoint("moderation/flag/")?;
        let body = FlagBody {
            user_id,
            entity_type,
            entity_id,
            reason,
        };
        self.client.http.post(&endpoint, &body, &SCOPE).await
    }

    // ── Statuses ─────────────────────────────────────────────────────────

    pub async fn update_activity_moderation_status(
        &self,
        activity_id: &str,
        moderator_id: &str,
        status: &ModerationStatus,
    ) -> Result<BaseResponse, SdkError> {
        self.update_status(ENTITY_ACTIVITY, activity_id, moderator_id, status)
            .await
    }

    pub async fn update_reaction_moderation_status(
        &self,
        reaction_id: &str,
        moderator_id: &str,
        status: &ModerationStatus,
    ) -> Result<BaseResponse, SdkError> {
        self.update_status(ENTITY_REACTION, reaction_id, moderator_id, status)
            .await
    }

    async fn update_status(
        &self,
        entity_type: &str,
        entity_id: &str,
        moderator_id: &str,
        status: &ModerationStatus,
    ) -> Result<BaseResponse, SdkError> {
        let endpoint = self.client.http.endpoint("moderation/status/")?;
        let body = StatusBody {
            entity_type,
            entity_id,
            moderator_id,
            status: &status.status,
            recommended_action: &status.recommended_action,
            latest_moderator_action: &status.latest_moderator_action,
        };
        self.client.http.post(&endpoint, &body, &SCOPE).await
    }

    /// Updates many statuses at once. The request is validated before any
    /// network call.
    pub async fn update_status_batch(
        &self,
        request: &UpdateStatusBatchRequest,
    ) -> Result<UpdateStatusBatchResponse, SdkError> {
        request.validate()?;
        let endpoint = self.client.http.endpoint("moderation/status/batch/")?;
        self.client.http.post(&endpoint, request, &SCOPE).await
    }

    pub async fn invalidate_user_cache(&self, user_id: &str) -> Result<BaseResponse, SdkError> {
        if user_id.is_empty() {
            return Err(SdkError::validation("empty user id"));
        }
        let endpoint = self
            .client
            .http
            .endpoint(&format!("moderation/user/cache/{}/", path_segment(user_id)))?;
        self.client.http.delete(&endpoint, &SCOPE).await
    }
}
