//! Personalization sub-client.
//!
//! Thin wrapper over the personalization service: the caller names the
//! resource and passes its query parameters in order.

use serde::Serialize;

use crate::auth::{AuthScope, Resource};
use crate::client::StreamClient;
use crate::domain::personalization::PersonalizationResponse;
use crate::error::SdkError;
use crate::http::{Endpoint, Service};
use crate::shared::Extra;

const SCOPE: AuthScope = AuthScope::App(Resource::Personalization);

#[derive(Serialize)]
struct DataBody<'a> {
    data: &'a Extra,
}

pub struct Personalization<'a> {
    pub(crate) client: &'a StreamClient,
}

impl<'a> Personalization<'a> {
    pub async fn get(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<PersonalizationResponse, SdkError> {
        let endpoint = self.endpoint(resource, params)?;
        self.client.http.get(&endpoint, &SCOPE).await
    }

    /// Posts `data` wrapped as `{"data": ...}`; `None` sends a JSON `null`.
    pub async fn post(
        &self,
        resource: &str,
        params: &[(&str, &str)],
        data: Option<&Extra>,
    ) -> Result<PersonalizationResponse, SdkError> {
        let endpoint = self.endpoint(resource, params)?;
        let body = data.map(|data| DataBody { data });
        self.client.http.post(&endpoint, &body, &SCOPE).await
    }

    pub async fn delete(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<PersonalizationResponse, SdkError> {
        let endpoint = self.endpoint(resource, params)?;
        self.client.http.delete(&endpoint, &SCOPE).await
    }

    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> Result<Endpoint, SdkError> {
        if resource.is_empty() {
            return Err(SdkError::validation("missing resource"));
        }
        let mut endpoint = self
            .client
            .http
            .service_endpoint(Service::Personalization, &format!("{}/", resource))?;
        for (key, value) in params {
            endpoint.push(key, value);
        }
        Ok(endpoint)
    }
}
