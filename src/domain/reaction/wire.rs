//! Wire types for reaction endpoints.

use serde::{Deserialize, Serialize};

use super::{FilterReactionsAttribute, FilterReactionsOption, Reaction};
use crate::error::PaginationError;
use crate::shared::serde_util::null_default;
use crate::shared::{Extra, ResponseMeta};

#[derive(Debug, Serialize)]
pub(crate) struct UpdateReactionBody<'a> {
    #[serde(skip_serializing_if = "Extra::is_empty")]
    pub data: &'a Extra,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub target_feeds: &'a [String],
}

/// A single reaction at the top level of the response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReactionResponse {
    #[serde(flatten)]
    pub meta: ResponseMeta,
    #[serde(flatten)]
    pub reaction: Reaction,
}

/// One page of a reaction filter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FilterReactionResponse {
    #[serde(flatten)]
    pub meta: ResponseMeta,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub next: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub results: Vec<Reaction>,
    /// The reacted-to activity, when requested with
    /// [`FilterReactionsOption::ActivityData`].
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub activity: Extra,
    /// Filter that produced this page; reused to fetch the next one.
    #[serde(skip)]
    pub(crate) attribute: Option<FilterReactionsAttribute>,
}

impl FilterReactionResponse {
    pub fn next_page_options(&self) -> Result<Vec<FilterReactionsOption>, PaginationError> {
        FilterReactionsOption::from_next(&self.next)
    }

    pub fn attribute(&self) -> Option<&FilterReactionsAttribute> {
        self.attribute.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GetReactionsResponse {
    #[serde(flatten)]
    pub meta: ResponseMeta,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub reactions: Vec<Reaction>,
}
