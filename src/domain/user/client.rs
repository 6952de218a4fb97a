//! Users sub-client.

use serde::Serialize;

use crate::auth::{AuthScope, Resource};
use crate::client::StreamClient;
use crate::domain::user::{create_user_reference, User, UserResponse};
use crate::error::SdkError;
use crate::http::path_segment;
use crate::shared::{BaseResponse, Extra};

const SCOPE: AuthScope = AuthScope::App(Resource::Users);

#[derive(Serialize)]
struct DataBody<'a> {
    data: &'a Extra,
}

pub struct Users<'a> {
    pub(crate) client: &'a StreamClient,
}

impl<'a> Users<'a> {
    /// Creates a user. With `get_or_create`, an existing user is returned
    /// instead of failing.
    pub async fn add(&self, user: &User, get_or_create: bool) -> Result<UserResponse, SdkError> {
        require_id(&user.id)?;
        let mut endpoint = self.client.http.endpoint("user/")?;
        endpoint.push("get_or_create", get_or_create);
        self.client.http.post(&endpoint, user, &SCOPE).await
    }

    pub async fn get(&self, id: &str) -> Result<UserResponse, SdkError> {
        require_id(id)?;
        let endpoint = self.client.http.endpoint(&format!("user/{}/", path_segment(id)))?;
        self.client.http.get(&endpoint, &SCOPE).await
    }

    /// Replaces the user's data.
    pub async fn update(&self, id: &str, data: &Extra) -> Result<UserResponse, SdkError> {
        require_id(id)?;
        let endpoint = self.client.http.endpoint(&format!("user/{}/", path_segment(id)))?;
        self.client
            .http
            .put(&endpoint, Some(&DataBody { data }), &SCOPE)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<BaseResponse, SdkError> {
        require_id(id)?;
        let endpoint = self.client.http.endpoint(&format!("user/{}/", path_segment(id)))?;
        self.client.http.delete(&endpoint, &SCOPE).await
    }

    pub fn create_reference(&self, id: &str) -> String {
        create_user_reference(id)
    }
}

fn require_id(id: &str) -> Result<(), SdkError> {
    if id.is_empty() {
        return Err(SdkError::validation("user id must not be empty"));
    }
    Ok(())
}
