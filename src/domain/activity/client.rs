//! Activities sub-client: app-wide lookups and updates, independent of feed.

use serde::de::DeserializeOwned;

use crate::auth::{AuthScope, Resource};
use crate::client::StreamClient;
use crate::domain::activity::wire::{
    ActivitiesBody, GetActivitiesResponse, GetEnrichedActivitiesResponse, PartialUpdateBody,
    UpdateActivitiesResponse, UpdateActivityResponse,
};
use crate::domain::activity::{Activity, ForeignIdTimePair, UpdateActivityRequest};
use crate::domain::feed::GetActivitiesOption;
use crate::error::SdkError;
use crate::http::Endpoint;
use crate::shared::{BaseResponse, Extra, Time};

pub struct Activities<'a> {
    pub(crate) client: &'a StreamClient,
}

impl<'a> Activities<'a> {
    fn scope() -> AuthScope {
        AuthScope::any_feed(Resource::Activities)
    }

    // ── Lookups ──────────────────────────────────────────────────────────

    pub async fn get_by_id(&self, ids: &[&str]) -> Result<GetActivitiesResponse, SdkError> {
        let mut endpoint = self.client.http.endpoint("activities/")?;
        push_ids(&mut endpoint, ids)?;
        self.lookup(&endpoint).await
    }

    pub async fn get_by_foreign_id(
        &self,
        pairs: &[ForeignIdTimePair],
    ) -> Result<GetActivitiesResponse, SdkError> {
        let mut endpoint = self.client.http.endpoint("activities/")?;
        push_foreign_ids(&mut endpoint, pairs)?;
        self.lookup(&endpoint).await
    }

    pub async fn get_enriched_by_id(
        &self,
        ids: &[&str],
        opts: &[GetActivitiesOption],
    ) -> Result<GetEnrichedActivitiesResponse, SdkError> {
        let mut endpoint = self.client.http.endpoint("enrich/activities/")?;
        push_ids(&mut endpoint, ids)?;
        endpoint.push_opts(opts);
        self.lookup(&endpoint).await
    }

    pub async fn get_enriched_by_foreign_id(
        &self,
        pairs: &[ForeignIdTimePair],
        opts: &[GetActivitiesOption],
    ) -> Result<GetEnrichedActivitiesResponse, SdkError> {
        let mut endpoint = self.client.http.endpoint("enrich/activities/")?;
        push_foreign_ids(&mut endpoint, pairs)?;
        endpoint.push_opts(opts);
        self.lookup(&endpoint).await
    }

    async fn lookup<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, SdkError> {
        self.client.http.get(endpoint, &Self::scope()).await
    }

    // ── Updates ──────────────────────────────────────────────────────────

    /// Replaces whole activities, matched by foreign id and time.
    pub async fn update(&self, activities: &[Activity]) -> Result<BaseResponse, SdkError> {
        let endpoint = self.client.http.endpoint("activities/")?;
        self.client
            .http
            .post(&endpoint, &ActivitiesBody { activities }, &Self::scope())
            .await
    }

    /// Applies set/unset changesets to many activities.
    pub async fn partial_update(
        &self,
        changes: &[UpdateActivityRequest],
    ) -> Result<UpdateActivitiesResponse, SdkError> {
        let endpoint = self.client.http.endpoint("activity/")?;
        self.client
            .http
            .post(&endpoint, &PartialUpdateBody { changes }, &Self::scope())
            .await
    }

    pub async fn update_by_id(
        &self,
        id: &str,
        set: Extra,
        unset: Vec<String>,
    ) -> Result<UpdateActivityResponse, SdkError> {
        if id.is_empty() {
            return Err(SdkError::validation("activity id must not be empty"));
        }
        self.update_one(&UpdateActivityRequest::by_id(id, set, unset))
            .await
    }

    pub async fn update_by_foreign_id(
        &self,
        foreign_id: &str,
        time: Time,
        set: Extra,
        unset: Vec<String>,
    ) -> Result<UpdateActivityResponse, SdkError> {
        if foreign_id.is_empty() {
            return Err(SdkError::validation("foreign id must not be empty"));
        }
        self.update_one(&UpdateActivityRequest::by_foreign_id(
            foreign_id, time, set, unset,
        ))
        .await
    }

    async fn update_one(
        &self,
        request: &UpdateActivityRequest,
    ) -> Result<UpdateActivityResponse, SdkError> {
        let endpoint = self.client.http.endpoint("activity/")?;
        self.client
            .http
            .post(&endpoint, request, &Self::scope())
            .await
    }
}

fn push_ids(endpoint: &mut Endpoint, ids: &[&str]) -> Result<(), SdkError> {
    if ids.is_empty() {
        return Err(SdkError::validation("at least one activity id is required"));
    }
    endpoint.push("ids", ids.join(","));
    Ok(())
}

fn push_foreign_ids(endpoint: &mut Endpoint, pairs: &[ForeignIdTimePair]) -> Result<(), SdkError> {
    if pairs.is_empty() {
        return Err(SdkError::validation(
            "at least one foreign id and time pair is required",
        ));
    }
    let foreign_ids: Vec<&str> = pairs.iter().map(|p| p.foreign_id.as_str()).collect();
    let timestamps: Vec<String> = pairs.iter().map(|p| p.time.format()).collect();
    endpoint
        .push("foreign_ids", foreign_ids.join(","))
        .push("timestamps", timestamps.join(","));
    Ok(())
}
