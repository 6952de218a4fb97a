//! Reactions sub-client.

use crate::auth::{AuthScope, Resource};
use crate::client::StreamClient;
use crate::domain::reaction::wire::{
    FilterReactionResponse, GetReactionsResponse, ReactionResponse, UpdateReactionBody,
};
use crate::domain::reaction::{
    AddReactionRequest, FilterReactionsAttribute, FilterReactionsOption, GetReactionsOption,
};
use crate::error::SdkError;
use crate::http::path_segment;
use crate::shared::{BaseResponse, Extra};

const SCOPE: AuthScope = AuthScope::App(Resource::Reactions);

pub struct Reactions<'a> {
    pub(crate) client: &'a StreamClient,
}

impl<'a> Reactions<'a> {
    /// Adds a top-level reaction. Child reactions go through
    /// [`Reactions::add_child`].
    pub async fn add(&self, reaction: &AddReactionRequest) -> Result<ReactionResponse, SdkError> {
        if !reaction.parent.is_empty() {
            return Err(SdkError::validation(
                "parent is not empty; use add_child for child reactions",
            ));
        }
        self.post_reaction(reaction).await
    }

    pub async fn add_child(
        &self,
        parent_id: &str,
        reaction: &AddReactionRequest,
    ) -> Result<ReactionResponse, SdkError> {
        require_id(parent_id)?;
        let mut child = reaction.clone();
        child.parent = parent_id.to_string();
        self.post_reaction(&child).await
    }

    async fn post_reaction(&self, reaction: &AddReactionRequest) -> Result<ReactionResponse, SdkError> {
        let endpoint = self.client.http.endpoint("reaction/")?;
        self.client.http.post(&endpoint, reaction, &SCOPE).await
    }

    pub async fn get(&self, id: &str) -> Result<ReactionResponse, SdkError> {
        require_id(id)?;
        let endpoint = self.client.http.endpoint(&format!("reaction/{}/", path_segment(id)))?;
        self.client.http.get(&endpoint, &SCOPE).await
    }

    /// Replaces the reaction's data and/or target feeds. Empty arguments are
    /// left out of the request.
    pub async fn update(
        &self,
        id: &str,
        data: &Extra,
        target_feeds: &[String],
    ) -> Result<ReactionResponse, SdkError> {
        require_id(id)?;
        let endpoint = self.client.http.endpoint(&format!("reaction/{}/", path_segment(id)))?;
        let body = UpdateReactionBody { data, target_feeds };
        self.client.http.put(&endpoint, Some(&body), &SCOPE).await
    }

    pub async fn delete(&self, id: &str) -> Result<ReactionResponse, SdkError> {
        require_id(id)?;
        let endpoint = self.client.http.endpoint(&format!("reaction/{}/", path_segment(id)))?;
        self.client.http.delete(&endpoint, &SCOPE).await
    }

    /// Deletes a reaction so that it can later be brought back with
    /// [`Reactions::restore`].
    pub async fn soft_delete(&self, id: &str) -> Result<BaseResponse, SdkError> {
        require_id(id)?;
        let mut endpoint = self.client.http.endpoint(&format!("reaction/{}/", path_segment(id)))?;
        endpoint.push("soft", true);
        self.client.http.delete(&endpoint, &SCOPE).await
    }

    pub async fn restore(&self, id: &str) -> Result<BaseResponse, SdkError> {
        require_id(id)?;
        let endpoint = self
            .client
            .http
            .endpoint(&format!("reaction/{}/restore/", path_segment(id)))?;
        self.client.http.put(&endpoint, None::<&()>, &SCOPE).await
    }

    // ── Listing ──────────────────────────────────────────────────────────

    pub async fn filter(
        &self,
        attribute: &FilterReactionsAttribute,
        opts: &[FilterReactionsOption],
    ) -> Result<FilterReactionResponse, SdkError> {
        require_id(attribute.id())?;
        let mut endpoint = self
            .client
            .http
            .endpoint(&format!("reaction/{}/", attribute))?;
        endpoint.push_opts(opts);
        let mut resp: FilterReactionResponse = self.client.http.get(&endpoint, &SCOPE).await?;
        resp.attribute = Some(attribute.clone());
        Ok(resp)
    }

    /// Fetches the page after `resp` with the same filter.
    pub async fn get_next_page_filtered(
        &self,
        resp: &FilterReactionResponse,
    ) -> Result<FilterReactionResponse, SdkError> {
        let opts = resp.next_page_options()?;
        let attribute = resp
            .attribute()
            .ok_or_else(|| SdkError::validation("response was not produced by a reaction filter"))?;
        self.filter(attribute, &opts).await
    }

    pub async fn get_many(
        &self,
        ids: &[&str],
        opts: &[GetReactionsOption],
    ) -> Result<GetReactionsResponse, SdkError> {
        if ids.is_empty() {
            return Err(SdkError::validation("at least one reaction id is required"));
        }
        let mut endpoint = self.client.http.endpoint("reaction/get_many/")?;
        endpoint.push("ids", ids.join(","));
        endpoint.push_opts(opts);
        self.client.http.get(&endpoint, &SCOPE).await
    }
}

fn require_id(id: &str) -> Result<(), SdkError> {
    if id.is_empty() {
        return Err(SdkError::validation("reaction id must not be empty"));
    }
    Ok(())
}
