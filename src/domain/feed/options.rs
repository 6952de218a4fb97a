//! Typed query options for feed reads and follow-graph calls.

use crate::error::{PaginationError, SdkError};
use crate::http::QueryParam;
use crate::shared::query::{parse_bool, parse_next_link, QueryValues};

// ─── Reads ───────────────────────────────────────────────────────────────────

/// Option for reading activities from a feed.
#[derive(Debug, Clone, PartialEq)]
pub enum GetActivitiesOption {
    Limit(u32),
    Offset(u32),
    IdGte(String),
    IdGt(String),
    IdLte(String),
    IdLt(String),
    Ranking(String),
    RankingScoreVars,
    /// JSON object, already encoded. Build with
    /// [`GetActivitiesOption::external_ranking_vars`].
    ExternalRankingVars(String),
    /// Mark every activity as seen (`None`) or only the given ids.
    MarkSeen(Option<Vec<String>>),
    MarkRead(Option<Vec<String>>),
    Custom(String, String),
    OwnReactions,
    UserReactions(String),
    FirstReactions,
    RecentReactions,
    ReactionCounts,
    OwnChildren,
    RecentReactionsLimit(u32),
    ReactionsLimit(u32),
    ReactionKindsFilter(Vec<String>),
    OwnChildrenKindsFilter(Vec<String>),
}

impl GetActivitiesOption {
    /// Encodes external ranking variables as a `ranking_vars` parameter.
    pub fn external_ranking_vars(
        vars: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, SdkError> {
        Ok(Self::ExternalRankingVars(serde_json::to_string(vars)?))
    }

    /// Rebuilds read options from a `next` link.
    ///
    /// Only the parameters the server echoes for pagination are recovered:
    /// limit, offset, `id_lt`, ranking and the enrichment flags.
    pub fn from_next(next: &str) -> Result<Vec<Self>, PaginationError> {
        let values = parse_next_link(next)?;
        let mut opts = Vec::new();

        if let Some(limit) = get_u32(&values, "limit")? {
            opts.push(Self::Limit(limit));
        }
        if let Some(offset) = get_u32(&values, "offset")? {
            opts.push(Self::Offset(offset));
        }
        match values.get("id_lt") {
            "" => {}
            id => opts.push(Self::IdLt(id.to_string())),
        }
        match values.get("ranking") {
            "" => {}
            ranking => opts.push(Self::Ranking(ranking.to_string())),
        }
        if parse_bool(values.get("withOwnReactions")) {
            opts.push(Self::OwnReactions);
        }
        if parse_bool(values.get("withRecentReactions")) {
            opts.push(Self::RecentReactions);
        }
        if parse_bool(values.get("withReactionCounts")) {
            opts.push(Self::ReactionCounts);
        }
        if parse_bool(values.get("withOwnChildren")) {
            opts.push(Self::OwnChildren);
        }
        if let Some(limit) = get_u32(&values, "recentReactionsLimit")? {
            opts.push(Self::RecentReactionsLimit(limit));
        }
        match values.get("reactionKindsFilter") {
            "" => {}
            kinds => opts.push(Self::ReactionKindsFilter(
                kinds.split(',').map(str::to_string).collect(),
            )),
        }
        Ok(opts)
    }
}

impl QueryParam for GetActivitiesOption {
    fn key(&self) -> &str {
        match self {
            Self::Limit(_) => "limit",
            Self::Offset(_) => "offset",
            Self::IdGte(_) => "id_gte",
            Self::IdGt(_) => "id_gt",
            Self::IdLte(_) => "id_lte",
            Self::IdLt(_) => "id_lt",
            Self::Ranking(_) => "ranking",
            Self::RankingScoreVars => "withScoreVars",
            Self::ExternalRankingVars(_) => "ranking_vars",
            Self::MarkSeen(_) => "mark_seen",
            Self::MarkRead(_) => "mark_read",
            Self::Custom(name, _) => name,
            Self::OwnReactions => "withOwnReactions",
            Self::UserReactions(_) => "user_id",
            Self::FirstReactions => "withFirstReactions",
            Self::RecentReactions => "withRecentReactions",
            Self::ReactionCounts => "withReactionCounts",
            Self::OwnChildren => "withOwnChildren",
            Self::RecentReactionsLimit(_) => "recentReactionsLimit",
            Self::ReactionsLimit(_) => "reaction_limit",
            Self::ReactionKindsFilter(_) => "reactionKindsFilter",
            Self::OwnChildrenKindsFilter(_) => "withOwnChildrenKinds",
        }
    }

    fn value(&self) -> String {
        match self {
            Self::Limit(n)
            | Self::Offset(n)
            | Self::RecentReactionsLimit(n)
            | Self::ReactionsLimit(n) => n.to_string(),
            Self::IdGte(s)
            | Self::IdGt(s)
            | Self::IdLte(s)
            | Self::IdLt(s)
            | Self::Ranking(s)
            | Self::ExternalRankingVars(s)
            | Self::Custom(_, s)
            | Self::UserReactions(s) => s.clone(),
            Self::RankingScoreVars
            | Self::OwnReactions
            | Self::FirstReactions
            | Self::RecentReactions
            | Self::ReactionCounts
            | Self::OwnChildren => "true".to_string(),
            Self::MarkSeen(ids) | Self::MarkRead(ids) => match ids {
                None => "true".to_string(),
                Some(ids) => ids.join(","),
            },
            Self::ReactionKindsFilter(kinds) | Self::OwnChildrenKindsFilter(kinds) => {
                kinds.join(",")
            }
        }
    }
}

fn get_u32(values: &QueryValues, key: &str) -> Result<Option<u32>, PaginationError> {
    values
        .get_int(key)?
        .map(|v| u32::try_from(v).map_err(|_| PaginationError::InvalidNextPage))
        .transpose()
}

// ─── Follow graph ────────────────────────────────────────────────────────────

/// Option for listing the feeds a feed follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowingOption {
    /// Restrict the result to these feed ids.
    Filter(Vec<String>),
    Limit(u32),
    Offset(u32),
}

impl QueryParam for FollowingOption {
    fn key(&self) -> &str {
        match self {
            Self::Filter(_) => "filter",
            Self::Limit(_) => "limit",
            Self::Offset(_) => "offset",
        }
    }

    fn value(&self) -> String {
        match self {
            Self::Filter(ids) => ids.join(","),
            Self::Limit(n) | Self::Offset(n) => n.to_string(),
        }
    }
}

/// Option for listing the followers of a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowersOption {
    Limit(u32),
    Offset(u32),
}

impl QueryParam for FollowersOption {
    fn key(&self) -> &str {
        match self {
            Self::Limit(_) => "limit",
            Self::Offset(_) => "offset",
        }
    }

    fn value(&self) -> String {
        match self {
            Self::Limit(n) | Self::Offset(n) => n.to_string(),
        }
    }
}

/// Option narrowing follow counts to specific feed groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowStatOption {
    FollowerSlugs(Vec<String>),
    FollowingSlugs(Vec<String>),
}

impl QueryParam for FollowStatOption {
    fn key(&self) -> &str {
        match self {
            Self::FollowerSlugs(_) => "followers_slugs",
            Self::FollowingSlugs(_) => "following_slugs",
        }
    }

    fn value(&self) -> String {
        match self {
            Self::FollowerSlugs(slugs) | Self::FollowingSlugs(slugs) => slugs.join(","),
        }
    }
}

// ─── To-targets ──────────────────────────────────────────────────────────────

/// Changes to the `to` recipients of an existing activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToTargetsUpdate {
    pub new_targets: Vec<String>,
    pub added_targets: Vec<String>,
    pub removed_targets: Vec<String>,
}

impl ToTargetsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole target list.
    pub fn replace(mut self, targets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.new_targets = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn add(mut self, targets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.added_targets
            .extend(targets.into_iter().map(Into::into));
        self
    }

    pub fn remove(mut self, targets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.removed_targets
            .extend(targets.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.new_targets.is_empty() && self.added_targets.is_empty() && self.removed_targets.is_empty()
    }
}
