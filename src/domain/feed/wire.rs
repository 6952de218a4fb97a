//! Wire types for feed endpoints.

use serde::{Deserialize, Serialize};

use super::{Follower, GetActivitiesOption, ToTargetsUpdate};
use crate::domain::activity::{
    Activity, ActivityGroup, EnrichedActivity, EnrichedActivityGroup, NotificationGroup,
};
use crate::error::PaginationError;
use crate::shared::serde_util::null_default;
use crate::shared::{Extra, ResponseMeta};

// ─── Requests ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct FollowBody<'a> {
    pub target: &'a str,
    pub activity_copy_limit: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddToManyBody<'a> {
    pub activity: &'a Activity,
    pub feeds: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ToTargetsBody<'a> {
    pub foreign_id: &'a str,
    pub time: String,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub new_targets: &'a [String],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub added_targets: &'a [String],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub removed_targets: &'a [String],
}

impl<'a> ToTargetsBody<'a> {
    pub fn new(foreign_id: &'a str, time: String, update: &'a ToTargetsUpdate) -> Self {
        Self {
            foreign_id,
            time,
            new_targets: &update.new_targets,
            added_targets: &update.added_targets,
            removed_targets: &update.removed_targets,
        }
    }
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// A page of feed results with the link to the following page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "R: Deserialize<'de>"))]
pub struct FeedResponse<R> {
    #[serde(flatten)]
    pub meta: ResponseMeta,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub next: String,
    #[serde(default = "Vec::new", deserialize_with = "null_default::deserialize")]
    pub results: Vec<R>,
}

impl<R> FeedResponse<R> {
    /// Read options that fetch the page after this one.
    pub fn next_page_options(&self) -> Result<Vec<GetActivitiesOption>, PaginationError> {
        GetActivitiesOption::from_next(&self.next)
    }
}

pub type FlatFeedResponse = FeedResponse<Activity>;
pub type EnrichedFlatFeedResponse = FeedResponse<EnrichedActivity>;
pub type AggregatedFeedResponse = FeedResponse<ActivityGroup>;
pub type EnrichedAggregatedFeedResponse = FeedResponse<EnrichedActivityGroup>;

/// A page of notification groups plus the feed's unseen/unread counters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de>"))]
pub struct NotificationFeedResponse<A = Activity> {
    #[serde(flatten)]
    pub meta: ResponseMeta,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub next: String,
    #[serde(default)]
    pub unseen: i64,
    #[serde(default)]
    pub unread: i64,
    #[serde(default = "Vec::new", deserialize_with = "null_default::deserialize")]
    pub results: Vec<NotificationGroup<A>>,
}

impl<A> NotificationFeedResponse<A> {
    pub fn next_page_options(&self) -> Result<Vec<GetActivitiesOption>, PaginationError> {
        GetActivitiesOption::from_next(&self.next)
    }
}

pub type EnrichedNotificationFeedResponse = NotificationFeedResponse<EnrichedActivity>;

// ─── Writes ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AddActivitiesResponse {
    #[serde(flatten)]
    pub meta: ResponseMeta,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoveActivityResponse {
    #[serde(flatten)]
    pub meta: ResponseMeta,
    /// Id (or foreign id) of the removed activity.
    #[serde(default)]
    pub removed: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateToTargetsResponse {
    #[serde(flatten)]
    pub meta: ResponseMeta,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub activity: Extra,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub added: Vec<String>,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub removed: Vec<String>,
}

// ─── Follow graph ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FollowersResponse {
    #[serde(flatten)]
    pub meta: ResponseMeta,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub results: Vec<Follower>,
}

pub type FollowingResponse = FollowersResponse;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FollowStat {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub feed: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FollowStatResults {
    #[serde(default)]
    pub followers: Option<FollowStat>,
    #[serde(default)]
    pub following: Option<FollowStat>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FollowStatResponse {
    #[serde(flatten)]
    pub meta: ResponseMeta,
    #[serde(default)]
    pub results: FollowStatResults,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_flat_feed_response() {
        let resp: FlatFeedResponse = serde_json::from_value(json!({
            "duration": "4.2ms",
            "next": "/api/v1.0/feed/user/bob/?limit=25&id_lt=xyz",
            "results": [{"id": "a", "actor": "bob", "verb": "post", "object": "o", "to": [["user:1", "x"]]}]
        }))
        .unwrap();
        assert_eq!(resp.results.len(), 1);
        assert_eq!(resp.results[0].to, vec!["user:1".to_string()]);
        assert_eq!(
            resp.next_page_options().unwrap(),
            vec![GetActivitiesOption::Limit(25), GetActivitiesOption::IdLt("xyz".into())]
        );
    }

    #[test]
    fn test_flat_feed_response_is_all_or_nothing() {
        let err = serde_json::from_value::<FlatFeedResponse>(json!({
            "results": [
                {"id": "a", "actor": "bob", "verb": "post", "object": "o"},
                {"id": "b", "actor": "bob", "verb": "post", "object": "o", "to": [[123]]}
            ]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("invalid format for to targets"));
    }

    #[test]
    fn test_notification_feed_response() {
        let resp: NotificationFeedResponse = serde_json::from_value(json!({
            "unseen": 3,
            "unread": 1,
            "results": [{
                "id": "g1",
                "group": "like_2024",
                "verb": "like",
                "activity_count": 2,
                "actor_count": 1,
                "is_read": false,
                "is_seen": true,
                "activities": [{"id": "a", "actor": "bob", "verb": "like", "object": "o"}]
            }]
        }))
        .unwrap();
        assert_eq!((resp.unseen, resp.unread), (3, 1));
        assert!(resp.results[0].is_seen);
        assert_eq!(resp.results[0].activities[0].verb, "like");
        assert!(matches!(
            resp.next_page_options(),
            Err(PaginationError::MissingNextPage)
        ));
    }

    #[test]
    fn test_null_results_decode_empty() {
        let resp: AggregatedFeedResponse =
            serde_json::from_value(json!({"results": null, "next": ""})).unwrap();
        assert!(resp.results.is_empty());
    }

    #[test]
    fn test_null_next_is_last_page() {
        let resp: FlatFeedResponse =
            serde_json::from_str(r#"{"results":[],"next":null}"#).unwrap();
        assert!(resp.next.is_empty());
        assert!(matches!(
            resp.next_page_options(),
            Err(PaginationError::MissingNextPage)
        ));

        let resp: NotificationFeedResponse =
            serde_json::from_str(r#"{"results":[],"next":null,"unseen":0}"#).unwrap();
        assert!(matches!(
            resp.next_page_options(),
            Err(PaginationError::MissingNextPage)
        ));
    }

    #[test]
    fn test_to_targets_body() {
        let update = ToTargetsUpdate::new().add(["user:a"]);
        let body = ToTargetsBody::new("fid", "2024-01-02T03:04:05".into(), &update);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"foreign_id": "fid", "time": "2024-01-02T03:04:05", "added_targets": ["user:a"]})
        );
    }

    #[test]
    fn test_follow_stat_response() {
        let resp: FollowStatResponse = serde_json::from_value(json!({
            "results": {"followers": {"count": 5, "feed": "user:bob"}, "following": {"count": 7, "feed": "user:bob"}}
        }))
        .unwrap();
        assert_eq!(resp.results.followers.unwrap().count, 5);
        assert_eq!(resp.results.following.unwrap().count, 7);
    }
}
