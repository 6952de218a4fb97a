//! Analytics sub-client: event tracking and signed redirect links.

use serde::Serialize;

use crate::auth::{AuthScope, Resource, AUTH_TYPE_JWT};
use crate::client::StreamClient;
use crate::domain::analytics::{AnalyticsEvent, EngagementEvent, ImpressionEventsData};
use crate::error::SdkError;
use crate::http::Service;
use crate::shared::BaseResponse;

#[derive(Serialize)]
struct EngagementBody<'a> {
    content_list: &'a [EngagementEvent],
}

pub struct Analytics<'a> {
    pub(crate) client: &'a StreamClient,
}

impl<'a> Analytics<'a> {
    pub async fn track_engagement(&self, events: &[EngagementEvent]) -> Result<BaseResponse, SdkError> {
        let endpoint = self
            .client
            .http
            .service_endpoint(Service::Analytics, "engagement/")?;
        self.client
            .http
            .post(
                &endpoint,
                &EngagementBody {
                    content_list: events,
                },
                &AuthScope::Analytics(Resource::Analytics),
            )
            .await
    }

    pub async fn track_impression(
        &self,
        data: &ImpressionEventsData,
    ) -> Result<BaseResponse, SdkError> {
        let endpoint = self
            .client
            .http
            .service_endpoint(Service::Analytics, "impression/")?;
        self.client
            .http
            .post(&endpoint, data, &AuthScope::Analytics(Resource::Analytics))
            .await
    }

    /// Builds a link that records `events` and redirects to `url`.
    ///
    /// Authentication travels in the query string, so the link works from a
    /// browser. No request is made.
    pub fn redirect_and_track(&self, url: &str, events: &[AnalyticsEvent]) -> Result<String, SdkError> {
        let mut endpoint = self
            .client
            .http
            .service_endpoint(Service::Analytics, "redirect/")?;
        let events = serde_json::to_string(events)?;
        let token = self.client.http.signer().sign_scope(
            &AuthScope::Analytics(Resource::AnalyticsRedirect),
            "GET",
        )?;
        endpoint
            .push("events", events)
            .push("url", url)
            .push("stream-auth-type", AUTH_TYPE_JWT)
            .push("authorization", token);
        Ok(endpoint.url().to_string())
    }
}
