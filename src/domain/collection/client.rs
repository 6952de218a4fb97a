//! Collections sub-client.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::auth::{AuthScope, Resource};
use crate::client::StreamClient;
use crate::domain::collection::{
    create_collection_reference, CollectionObject, CollectionObjectResponse, GetCollectionResponse,
};
use crate::error::SdkError;
use crate::http::{path_segment, Endpoint};
use crate::shared::{BaseResponse, Extra};

const SCOPE: AuthScope = AuthScope::App(Resource::Collections);

#[derive(Serialize)]
struct UpsertBody<'a> {
    data: BTreeMap<&'a str, &'a [CollectionObject]>,
}

#[derive(Serialize)]
struct AddBody<'a> {
    id: &'a str,
    data: &'a Extra,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
}

#[derive(Serialize)]
struct DataBody<'a> {
    data: &'a Extra,
}

pub struct Collections<'a> {
    pub(crate) client: &'a StreamClient,
}

impl<'a> Collections<'a> {
    /// Inserts or replaces objects in `collection`.
    pub async fn upsert(
        &self,
        collection: &str,
        objects: &[CollectionObject],
    ) -> Result<BaseResponse, SdkError> {
        require_name(collection)?;
        let endpoint = self.client.http.endpoint("collections/")?;
        let body = UpsertBody {
            data: BTreeMap::from([(collection, objects)]),
        };
        self.client.http.post(&endpoint, &body, &SCOPE).await
    }

    pub async fn select(
        &self,
        collection: &str,
        ids: &[&str],
    ) -> Result<GetCollectionResponse, SdkError> {
        require_name(collection)?;
        let foreign_ids: Vec<String> = ids
            .iter()
            .map(|id| format!("{}:{}", collection, id))
            .collect();
        let mut endpoint = self.client.http.endpoint("collections/")?;
        endpoint.push("foreign_ids", foreign_ids.join(","));
        self.client.http.get(&endpoint, &SCOPE).await
    }

    pub async fn delete_many(&self, collection: &str, ids: &[&str]) -> Result<BaseResponse, SdkError> {
        require_name(collection)?;
        let mut endpoint = self.client.http.endpoint("collections/")?;
        endpoint
            .push("collection_name", collection)
            .push("ids", ids.join(","));
        self.client.http.delete(&endpoint, &SCOPE).await
    }

    /// Adds one object, optionally owned by `user_id`.
    pub async fn add(
        &self,
        collection: &str,
        object: &CollectionObject,
        user_id: Option<&str>,
    ) -> Result<CollectionObjectResponse, SdkError> {
        require_name(collection)?;
        let endpoint = self
            .client
            .http
            .endpoint(&format!("collections/{}/", path_segment(collection)))?;
        let body = AddBody {
            id: &object.id,
            data: &object.data,
            user_id,
        };
        self.client.http.post(&endpoint, &body, &SCOPE).await
    }

    pub async fn get(&self, collection: &str, id: &str) -> Result<CollectionObjectResponse, SdkError> {
        let endpoint = self.object_endpoint(collection, id)?;
        self.client.http.get(&endpoint, &SCOPE).await
    }

    /// Replaces the object's data.
    pub async fn update(
        &self,
        collection: &str,
        id: &str,
        data: &Extra,
    ) -> Result<CollectionObjectResponse, SdkError> {
        let endpoint = self.object_endpoint(collection, id)?;
        self.client
            .http
            .put(&endpoint, Some(&DataBody { data }), &SCOPE)
            .await
    }

    pub async fn delete(&self, collection: &str, id: &str) -> Result<BaseResponse, SdkError> {
        let endpoint = self.object_endpoint(collection, id)?;
        self.client.http.delete(&endpoint, &SCOPE).await
    }

    pub fn create_reference(&self, collection: &str, id: &str) -> String {
        create_collection_reference(collection, id)
    }

    fn object_endpoint(&self, collection: &str, id: &str) -> Result<Endpoint, SdkError> {
        require_name(collection)?;
        if id.is_empty() {
            return Err(SdkError::validation("collection object id must not be empty"));
        }
        self.client
            .http
            .endpoint(&format!("collections/{}/{}/", path_segment(collection), path_segment(id)))
    }
}

fn require_name(collection: &str) -> Result<(), SdkError> {
    if collection.is_empty() {
        return Err(SdkError::validation("collection name required"));
    }
    Ok(())
}
