//! Reaction domain: reactions, child reactions, filters.

#[cfg(feature = "http")]
pub mod client;
pub mod wire;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PaginationError;
use crate::http::{path_segment, QueryParam};
use crate::shared::query::parse_next_link;
use crate::shared::serde_util::null_default;
use crate::shared::{Extra, Time};

// ─── Reaction ────────────────────────────────────────────────────────────────

/// A reaction as stored by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub activity_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(
        default,
        deserialize_with = "null_default::deserialize",
        skip_serializing_if = "Extra::is_empty"
    )]
    pub data: Extra,
    #[serde(
        default,
        deserialize_with = "null_default::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub target_feeds: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_default::deserialize",
        skip_serializing_if = "Extra::is_empty"
    )]
    pub target_feeds_extra_data: Extra,
    /// Id of the parent reaction, empty for top-level reactions.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent: String,
    #[serde(
        default,
        deserialize_with = "null_default::deserialize",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub latest_children: BTreeMap<String, Vec<Reaction>>,
    #[serde(
        default,
        deserialize_with = "null_default::deserialize",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub own_children: BTreeMap<String, Vec<Reaction>>,
    #[serde(
        default,
        deserialize_with = "null_default::deserialize",
        skip_serializing_if = "Extra::is_empty"
    )]
    pub children_counts: Extra,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Time>,
}

/// Payload for adding a reaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AddReactionRequest {
    /// Client-chosen id; the service generates one when empty.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub kind: String,
    pub activity_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Extra::is_empty")]
    pub data: Extra,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target_feeds: Vec<String>,
    #[serde(skip_serializing_if = "Extra::is_empty")]
    pub target_feeds_extra_data: Extra,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent: String,
}

impl AddReactionRequest {
    pub fn new(
        kind: impl Into<String>,
        activity_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            activity_id: activity_id.into(),
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_data(mut self, data: Extra) -> Self {
        self.data = data;
        self
    }

    pub fn with_target_feeds(
        mut self,
        feeds: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.target_feeds = feeds.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_target_feeds_extra_data(mut self, data: Extra) -> Self {
        self.target_feeds_extra_data = data;
        self
    }
}

// ─── Filters ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterBy {
    Activity,
    Reaction,
    User,
}

/// Which reactions a filter call lists: by activity, by parent reaction or by
/// user, optionally narrowed to one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterReactionsAttribute {
    by: FilterBy,
    id: String,
    kind: Option<String>,
}

impl FilterReactionsAttribute {
    pub fn by_activity_id(activity_id: impl Into<String>) -> Self {
        Self::new(FilterBy::Activity, activity_id.into())
    }

    /// Children of the given reaction.
    pub fn by_reaction_id(reaction_id: impl Into<String>) -> Self {
        Self::new(FilterBy::Reaction, reaction_id.into())
    }

    pub fn by_user_id(user_id: impl Into<String>) -> Self {
        Self::new(FilterBy::User, user_id.into())
    }

    fn new(by: FilterBy, id: String) -> Self {
        Self { by, id, kind: None }
    }

    pub fn by_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Path segment: `activity_id/<id>`, `reaction_id/<id>` or `user_id/<id>`,
/// followed by `/<kind>` when set.
impl fmt::Display for FilterReactionsAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let by = match self.by {
            FilterBy::Activity => "activity_id",
            FilterBy::Reaction => "reaction_id",
            FilterBy::User => "user_id",
        };
        write!(f, "{}/{}", by, path_segment(&self.id))?;
        if let Some(kind) = &self.kind {
            write!(f, "/{}", path_segment(kind))?;
        }
        Ok(())
    }
}

/// Pagination and enrichment option for reaction filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterReactionsOption {
    Limit(u32),
    IdGte(String),
    IdGt(String),
    IdLte(String),
    IdLt(String),
    /// Include the activity when filtering by activity id.
    ActivityData,
    OwnChildren,
    /// Further restrict to reactions by this user.
    OwnUserId(String),
    /// Restrict `own_children` to this user.
    ChildrenUserId(String),
}

impl FilterReactionsOption {
    /// Rebuilds filter options from a `next` link.
    pub fn from_next(next: &str) -> Result<Vec<Self>, PaginationError> {
        let values = parse_next_link(next)?;
        let mut opts = Vec::new();

        if let Some(limit) = values.get_int("limit")? {
            let limit = u32::try_from(limit).map_err(|_| PaginationError::InvalidNextPage)?;
            opts.push(Self::Limit(limit));
        }
        match values.get("id_lt") {
            "" => {}
            id => opts.push(Self::IdLt(id.to_string())),
        }
        match values.get("id_gt") {
            "" => {}
            id => opts.push(Self::IdGt(id.to_string())),
        }
        if is_truthy(values.get("with_activity_data")) {
            opts.push(Self::ActivityData);
        }
        if is_truthy(values.get("with_own_children")) {
            opts.push(Self::OwnChildren);
        }
        Ok(opts)
    }
}

// Stricter than feed pagination: only true, t and 1 count.
fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "t" | "1")
}

impl QueryParam for FilterReactionsOption {
    fn key(&self) -> &str {
        match self {
            Self::Limit(_) => "limit",
            Self::IdGte(_) => "id_gte",
            Self::IdGt(_) => "id_gt",
            Self::IdLte(_) => "id_lte",
            Self::IdLt(_) => "id_lt",
            Self::ActivityData => "with_activity_data",
            Self::OwnChildren => "with_own_children",
            Self::OwnUserId(_) => "user_id",
            Self::ChildrenUserId(_) => "children_user_id",
        }
    }

    fn value(&self) -> String {
        match self {
            Self::Limit(n) => n.to_string(),
            Self::IdGte(s)
            | Self::IdGt(s)
            | Self::IdLte(s)
            | Self::IdLt(s)
            | Self::OwnUserId(s)
            | Self::ChildrenUserId(s) => s.clone(),
            Self::ActivityData | Self::OwnChildren => "true".to_string(),
        }
    }
}

/// Option for fetching reactions by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetReactionsOption {
    IncludeDeleted,
}

impl QueryParam for GetReactionsOption {
    fn key(&self) -> &str {
        match self {
            Self::IncludeDeleted => "include_deleted",
        }
    }

    fn value(&self) -> String {
        "true".to_string()
    }
}
