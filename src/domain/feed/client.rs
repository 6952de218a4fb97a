//! Feeds sub-client and feed handles.
//!
//! [`Feeds`] builds typed feed handles and runs the cross-feed batch calls.
//! A [`Feed`] carries the operations common to every feed group; the flat,
//! aggregated and notification wrappers add the reads whose result shape
//! depends on the group type.

use std::ops::Deref;

use serde::de::DeserializeOwned;

use crate::auth::{Action, AuthScope, Resource};
use crate::client::StreamClient;
use crate::domain::activity::wire::{ActivitiesBody, AddActivityResponse};
use crate::domain::activity::Activity;
use crate::domain::feed::wire::{
    AddActivitiesResponse, AddToManyBody, AggregatedFeedResponse, EnrichedAggregatedFeedResponse,
    EnrichedFlatFeedResponse, EnrichedNotificationFeedResponse, FlatFeedResponse, FollowBody,
    FollowStatResponse, FollowersResponse, FollowingResponse, NotificationFeedResponse,
    RemoveActivityResponse, ToTargetsBody, UpdateToTargetsResponse,
};
use crate::domain::feed::{
    FeedId, FollowRelationship, FollowStatOption, FollowersOption, FollowingOption,
    GetActivitiesOption, ToTargetsRequest, ToTargetsUpdate, UnfollowRelationship,
    DEFAULT_ACTIVITY_COPY_LIMIT,
};
use crate::error::SdkError;
use crate::http::{path_segment, Endpoint};
use crate::shared::BaseResponse;

// ─── Feeds ───────────────────────────────────────────────────────────────────

pub struct Feeds<'a> {
    pub(crate) client: &'a StreamClient,
}

impl<'a> Feeds<'a> {
    pub fn flat(&self, slug: &str, user_id: &str) -> Result<FlatFeed<'a>, SdkError> {
        Ok(FlatFeed(self.feed(slug, user_id)?))
    }

    pub fn aggregated(&self, slug: &str, user_id: &str) -> Result<AggregatedFeed<'a>, SdkError> {
        Ok(AggregatedFeed(self.feed(slug, user_id)?))
    }

    pub fn notification(
        &self,
        slug: &str,
        user_id: &str,
    ) -> Result<NotificationFeed<'a>, SdkError> {
        Ok(NotificationFeed(self.feed(slug, user_id)?))
    }

    /// Handle for a feed given as `slug:user_id`, without committing to a
    /// group type.
    pub fn generic(&self, id: &str) -> Result<Feed<'a>, SdkError> {
        Ok(Feed {
            client: self.client,
            id: FeedId::parse(id)?,
        })
    }

    fn feed(&self, slug: &str, user_id: &str) -> Result<Feed<'a>, SdkError> {
        Ok(Feed {
            client: self.client,
            id: FeedId::new(slug, user_id)?,
        })
    }

    /// Adds one activity to many feeds at once.
    pub async fn add_to_many(
        &self,
        activity: &Activity,
        feeds: &[FeedId],
    ) -> Result<BaseResponse, SdkError> {
        let endpoint = self.client.http.endpoint("feed/add_to_many/")?;
        let body = AddToManyBody {
            activity,
            feeds: feeds.iter().map(FeedId::to_string).collect(),
        };
        self.client
            .http
            .post(&endpoint, &body, &AuthScope::any_feed(Resource::Feed))
            .await
    }

    /// Creates many follow relationships. `activity_copy_limit` applies to
    /// every relationship that doesn't carry its own.
    pub async fn follow_many(
        &self,
        relationships: &[FollowRelationship],
        activity_copy_limit: Option<u32>,
    ) -> Result<BaseResponse, SdkError> {
        let mut endpoint = self.client.http.endpoint("follow_many/")?;
        if let Some(limit) = activity_copy_limit {
            endpoint.push("activity_copy_limit", limit);
        }
        self.client
            .http
            .post(&endpoint, relationships, &AuthScope::any_feed(Resource::Follower))
            .await
    }

    pub async fn unfollow_many(
        &self,
        relationships: &[UnfollowRelationship],
    ) -> Result<BaseResponse, SdkError> {
        let endpoint = self.client.http.endpoint("unfollow_many/")?;
        self.client
            .http
            .post(&endpoint, relationships, &AuthScope::any_feed(Resource::Follower))
            .await
    }
}

// ─── Feed ────────────────────────────────────────────────────────────────────

/// Operations shared by every feed group.
#[derive(Debug, Clone)]
pub struct Feed<'a> {
    client: &'a StreamClient,
    id: FeedId,
}

impl<'a> Feed<'a> {
    pub fn id(&self) -> &FeedId {
        &self.id
    }

    pub fn slug(&self) -> &str {
        self.id.slug()
    }

    pub fn user_id(&self) -> &str {
        self.id.user_id()
    }

    fn scope(&self, resource: Resource) -> AuthScope {
        AuthScope::feed(resource, self.id.signing_id())
    }

    fn path(&self, suffix: &str) -> String {
        format!("feed/{}/{}/{}", self.id.slug(), self.id.user_id(), suffix)
    }

    // ── Activities ───────────────────────────────────────────────────────

    pub async fn add_activity(&self, activity: &Activity) -> Result<AddActivityResponse, SdkError> {
        let endpoint = self.client.http.endpoint(&self.path(""))?;
        self.client
            .http
            .post(&endpoint, activity, &self.scope(Resource::Feed))
            .await
    }

    pub async fn add_activities(
        &self,
        activities: &[Activity],
    ) -> Result<AddActivitiesResponse, SdkError> {
        let endpoint = self.client.http.endpoint(&self.path(""))?;
        self.client
            .http
            .post(&endpoint, &ActivitiesBody { activities }, &self.scope(Resource::Feed))
            .await
    }

    pub async fn remove_activity_by_id(&self, id: &str) -> Result<RemoveActivityResponse, SdkError> {
        if id.is_empty() {
            return Err(SdkError::validation("activity id must not be empty"));
        }
        let endpoint = self.client.http.endpoint(&self.path(&format!("{}/", path_segment(id))))?;
        self.client
            .http
            .delete(&endpoint, &self.scope(Resource::Feed))
            .await
    }

    pub async fn remove_activity_by_foreign_id(
        &self,
        foreign_id: &str,
    ) -> Result<RemoveActivityResponse, SdkError> {
        if foreign_id.is_empty() {
            return Err(SdkError::validation("foreign id must not be empty"));
        }
        let mut endpoint = self
            .client
            .http
            .endpoint(&self.path(&format!("{}/", path_segment(foreign_id))))?;
        endpoint.push("foreign_id", 1);
        self.client
            .http
            .delete(&endpoint, &self.scope(Resource::Feed))
            .await
    }

    // ── Reads ────────────────────────────────────────────────────────────

    async fn read<T: DeserializeOwned>(
        &self,
        enriched: bool,
        opts: &[GetActivitiesOption],
    ) -> Result<T, SdkError> {
        let path = if enriched {
            format!("enrich/{}", self.path(""))
        } else {
            self.path("")
        };
        let mut endpoint = self.client.http.endpoint(&path)?;
        endpoint.push_opts(opts);
        self.client
            .http
            .get(&endpoint, &self.scope(Resource::Feed))
            .await
    }

    async fn read_ranked<T: DeserializeOwned>(
        &self,
        enriched: bool,
        ranking: &str,
        opts: &[GetActivitiesOption],
    ) -> Result<T, SdkError> {
        let mut ranked = opts.to_vec();
        ranked.push(GetActivitiesOption::Ranking(ranking.to_string()));
        self.read(enriched, &ranked).await
    }

    async fn read_next<T: DeserializeOwned>(&self, enriched: bool, next: &str) -> Result<T, SdkError> {
        let opts = GetActivitiesOption::from_next(next)?;
        self.read(enriched, &opts).await
    }

    // ── Follow graph ─────────────────────────────────────────────────────

    /// Makes this feed follow `target`, copying up to `activity_copy_limit`
    /// existing activities (300 when `None`).
    pub async fn follow(
        &self,
        target: &FeedId,
        activity_copy_limit: Option<u32>,
    ) -> Result<BaseResponse, SdkError> {
        let endpoint = self.client.http.endpoint(&self.path("follows/"))?;
        let target = target.to_string();
        let body = FollowBody {
            target: &target,
            activity_copy_limit: activity_copy_limit.unwrap_or(DEFAULT_ACTIVITY_COPY_LIMIT),
        };
        self.client
            .http
            .post(&endpoint, &body, &self.scope(Resource::Follower))
            .await
    }

    pub async fn get_followers(
        &self,
        opts: &[FollowersOption],
    ) -> Result<FollowersResponse, SdkError> {
        let mut endpoint = self.client.http.endpoint(&self.path("followers/"))?;
        endpoint.push_opts(opts);
        self.client
            .http
            .get(&endpoint, &self.scope(Resource::Follower))
            .await
    }

    pub async fn get_following(
        &self,
        opts: &[FollowingOption],
    ) -> Result<FollowingResponse, SdkError> {
        let mut endpoint = self.client.http.endpoint(&self.path("follows/"))?;
        endpoint.push_opts(opts);
        self.client
            .http
            .get(&endpoint, &self.scope(Resource::Follower))
            .await
    }

    pub async fn unfollow(&self, target: &FeedId, keep_history: bool) -> Result<BaseResponse, SdkError> {
        let mut endpoint = self
            .client
            .http
            .endpoint(&self.path(&format!("follows/{}/", target)))?;
        if keep_history {
            endpoint.push("keep_history", 1);
        }
        self.client
            .http
            .delete(&endpoint, &self.scope(Resource::Follower))
            .await
    }

    /// Follower and following counts, optionally narrowed to feed groups.
    pub async fn follow_stats(
        &self,
        opts: &[FollowStatOption],
    ) -> Result<FollowStatResponse, SdkError> {
        let id = self.id.to_string();
        let mut endpoint = self.client.http.endpoint("stats/follow/")?;
        endpoint.push("followers", &id).push("following", &id);
        endpoint.push_opts(opts);
        self.client
            .http
            .get(&endpoint, &AuthScope::any_feed(Resource::Follower))
            .await
    }

    // ── To-targets ───────────────────────────────────────────────────────

    /// Changes the `to` recipients of `activity`, which must carry its
    /// foreign id and time.
    pub async fn update_to_targets(
        &self,
        activity: &Activity,
        update: &ToTargetsUpdate,
    ) -> Result<UpdateToTargetsResponse, SdkError> {
        if update.is_empty() {
            return Err(no_to_targets_changes());
        }
        let foreign_id = activity
            .foreign_id
            .as_deref()
            .ok_or_else(|| SdkError::validation("activity has no foreign id"))?;
        let time = activity
            .time
            .as_ref()
            .ok_or_else(|| SdkError::validation("activity has no time"))?;

        let endpoint = self.to_targets_endpoint()?;
        let body = ToTargetsBody::new(foreign_id, time.format(), update);
        self.client
            .http
            .post(&endpoint, &body, &self.scope(Resource::FeedTargets))
            .await
    }

    pub async fn batch_update_to_targets(
        &self,
        requests: &[ToTargetsRequest],
    ) -> Result<UpdateToTargetsResponse, SdkError> {
        if requests.iter().any(|r| r.update.is_empty()) {
            return Err(no_to_targets_changes());
        }
        let body: Vec<ToTargetsBody<'_>> = requests
            .iter()
            .map(|r| ToTargetsBody::new(&r.foreign_id, r.time.format(), &r.update))
            .collect();

        let endpoint = self.to_targets_endpoint()?;
        self.client
            .http
            .post(&endpoint, &body, &self.scope(Resource::FeedTargets))
            .await
    }

    fn to_targets_endpoint(&self) -> Result<Endpoint, SdkError> {
        self.client.http.endpoint(&format!(
            "feed_targets/{}/{}/activity_to_targets/",
            self.id.slug(),
            self.id.user_id()
        ))
    }

    // ── Tokens ───────────────────────────────────────────────────────────

    /// Realtime subscription token for this feed.
    pub fn try_realtime_token(&self, read_only: bool) -> Result<String, SdkError> {
        let action = if read_only { Action::Read } else { Action::Write };
        Ok(self
            .client
            .http
            .signer()
            .feed_token(&self.id.signing_id(), action)?)
    }

    /// Like [`Feed::try_realtime_token`], but a signing failure is logged and
    /// yields an empty token.
    pub fn realtime_token(&self, read_only: bool) -> String {
        self.try_realtime_token(read_only).unwrap_or_else(|e| {
            tracing::warn!(feed = %self.id, error = %e, "cannot sign realtime token");
            String::new()
        })
    }
}

fn no_to_targets_changes() -> SdkError {
    SdkError::validation("no changes specified for to targets")
}

// ─── Typed feeds ─────────────────────────────────────────────────────────────

/// Feed whose reads return plain activities.
#[derive(Debug, Clone)]
pub struct FlatFeed<'a>(Feed<'a>);

impl<'a> Deref for FlatFeed<'a> {
    type Target = Feed<'a>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> FlatFeed<'a> {
    pub async fn get_activities(
        &self,
        opts: &[GetActivitiesOption],
    ) -> Result<FlatFeedResponse, SdkError> {
        self.read(false, opts).await
    }

    pub async fn get_activities_with_ranking(
        &self,
        ranking: &str,
        opts: &[GetActivitiesOption],
    ) -> Result<FlatFeedResponse, SdkError> {
        self.read_ranked(false, ranking, opts).await
    }

    pub async fn get_next_page_activities(
        &self,
        resp: &FlatFeedResponse,
    ) -> Result<FlatFeedResponse, SdkError> {
        self.read_next(false, &resp.next).await
    }

    pub async fn get_enriched_activities(
        &self,
        opts: &[GetActivitiesOption],
    ) -> Result<EnrichedFlatFeedResponse, SdkError> {
        self.read(true, opts).await
    }

    pub async fn get_enriched_activities_with_ranking(
        &self,
        ranking: &str,
        opts: &[GetActivitiesOption],
    ) -> Result<EnrichedFlatFeedResponse, SdkError> {
        self.read_ranked(true, ranking, opts).await
    }

    pub async fn get_next_page_enriched_activities(
        &self,
        resp: &EnrichedFlatFeedResponse,
    ) -> Result<EnrichedFlatFeedResponse, SdkError> {
        self.read_next(true, &resp.next).await
    }
}

/// Feed whose reads return activity groups.
#[derive(Debug, Clone)]
pub struct AggregatedFeed<'a>(Feed<'a>);

impl<'a> Deref for AggregatedFeed<'a> {
    type Target = Feed<'a>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> AggregatedFeed<'a> {
    pub async fn get_activities(
        &self,
        opts: &[GetActivitiesOption],
    ) -> Result<AggregatedFeedResponse, SdkError> {
        self.read(false, opts).await
    }

    pub async fn get_activities_with_ranking(
        &self,
        ranking: &str,
        opts: &[GetActivitiesOption],
    ) -> Result<AggregatedFeedResponse, SdkError> {
        self.read_ranked(false, ranking, opts).await
    }

    pub async fn get_next_page_activities(
        &self,
        resp: &AggregatedFeedResponse,
    ) -> Result<AggregatedFeedResponse, SdkError> {
        self.read_next(false, &resp.next).await
    }

    pub async fn get_enriched_activities(
        &self,
        opts: &[GetActivitiesOption],
    ) -> Result<EnrichedAggregatedFeedResponse, SdkError> {
        self.read(true, opts).await
    }

    pub async fn get_enriched_activities_with_ranking(
        &self,
        ranking: &str,
        opts: &[GetActivitiesOption],
    ) -> Result<EnrichedAggregatedFeedResponse, SdkError> {
        self.read_ranked(true, ranking, opts).await
    }

    pub async fn get_next_page_enriched_activities(
        &self,
        resp: &EnrichedAggregatedFeedResponse,
    ) -> Result<EnrichedAggregatedFeedResponse, SdkError> {
        self.read_next(true, &resp.next).await
    }
}

/// Feed whose reads return notification groups with seen/read state.
#[derive(Debug, Clone)]
pub struct NotificationFeed<'a>(Feed<'a>);

impl<'a> Deref for NotificationFeed<'a> {
    type Target = Feed<'a>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> NotificationFeed<'a> {
    pub async fn get_activities(
        &self,
        opts: &[GetActivitiesOption],
    ) -> Result<NotificationFeedResponse, SdkError> {
        self.read(false, opts).await
    }

    pub async fn get_next_page_activities(
        &self,
        resp: &NotificationFeedResponse,
    ) -> Result<NotificationFeedResponse, SdkError> {
        self.read_next(false, &resp.next).await
    }

    pub async fn get_enriched_activities(
        &self,
        opts: &[GetActivitiesOption],
    ) -> Result<EnrichedNotificationFeedResponse, SdkError> {
        self.read(true, opts).await
    }

    pub async fn get_next_page_enriched_activities(
        &self,
        resp: &EnrichedNotificationFeedResponse,
    ) -> Result<EnrichedNotificationFeedResponse, SdkError> {
        self.read_next(true, &resp.next).await
    }
}
