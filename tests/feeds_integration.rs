//! Feed reads, writes and the follow graph against a mock server.

mod common;

use common::{api, client, API_KEY};
use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use stream_feeds_sdk::prelude::*;

fn activity_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "actor": "alice",
        "verb": "post",
        "object": "picture:10",
        "foreign_id": format!("post:{}", id),
        "time": "2024-02-03T04:05:06.789000",
        "to": ["user:bob"]
    })
}

#[tokio::test]
async fn test_add_activity_signs_and_decodes() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(api("feed/user/alice/"))
                .query_param("api_key", API_KEY)
                .header("Stream-Auth-Type", "jwt")
                .header_exists("Authorization")
                .header("Content-Type", "application/json")
                .json_body_partial(r#"{"actor":"alice","verb":"post","object":"picture:10"}"#);
            then.status(201)
                .header("X-Ratelimit-Limit", "100")
                .header("X-Ratelimit-Remaining", "99")
                .json_body(json!({
                    "duration": "2.5ms",
                    "id": "a1",
                    "actor": "alice",
                    "verb": "post",
                    "object": "picture:10",
                    "time": "2024-02-03T04:05:06.789000",
                    "mood": "happy"
                }));
        })
        .await;

    let client = client(&server);
    let feed = client.feeds().flat("user", "alice").unwrap();
    let resp = feed
        .add_activity(&Activity::new("alice", "post", "picture:10"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(resp.activity.id, "a1");
    assert_eq!(resp.activity.extra.get("mood"), Some(&json!("happy")));
    assert_eq!(resp.meta.ratelimit.limit, 100);
    assert_eq!(resp.meta.ratelimit.remaining, 99);
}

#[tokio::test]
async fn test_flat_feed_pagination() {
    let server = MockServer::start_async().await;
    let first = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(api("feed/user/alice/"))
                .query_param("limit", "2");
            then.status(200).json_body(json!({
                "results": [activity_json("a3"), activity_json("a2")],
                "next": "/api/v1.0/feed/user/alice/?api_key=key&id_lt=a2&limit=3&withReactionCounts=true"
            }));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(api("feed/user/alice/"))
                .query_param("limit", "3")
                .query_param("id_lt", "a2")
                .query_param("withReactionCounts", "true");
            then.status(200).json_body(json!({
                "results": [activity_json("a1")],
                "next": ""
            }));
        })
        .await;

    let client = client(&server);
    let feed = client.feeds().flat("user", "alice").unwrap();
    let page = feed
        .get_activities(&[GetActivitiesOption::Limit(2)])
        .await
        .unwrap();
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].to, vec!["user:bob".to_string()]);

    let page = feed.get_next_page_activities(&page).await.unwrap();
    assert_eq!(page.results[0].id, "a1");

    let err = feed.get_next_page_activities(&page).await.unwrap_err();
    assert!(matches!(
        err,
        SdkError::Pagination(PaginationError::MissingNextPage)
    ));

    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_invalid_next_link_never_reaches_server() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path(api("feed/user/alice/"));
            then.status(200).json_body(json!({
                "results": [],
                "next": "/api/v1.0/feed/user/alice/?limit=lots"
            }));
        })
        .await;

    let client = client(&server);
    let feed = client.feeds().flat("user", "alice").unwrap();
    let page = feed.get_activities(&[]).await.unwrap();
    let err = feed.get_next_page_activities(&page).await.unwrap_err();
    assert!(matches!(
        err,
        SdkError::Pagination(PaginationError::InvalidNextPage)
    ));
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_aggregated_and_notification_reads() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(api("feed/timeline_aggr/bob/"));
            then.status(200).json_body(json!({
                "results": [{
                    "id": "g1",
                    "group": "post_2024-02-03",
                    "verb": "post",
                    "activity_count": 1,
                    "actor_count": 1,
                    "activities": [activity_json("a1")],
                    "created_at": "2024-02-03T04:05:06.789000",
                    "updated_at": "2024-02-03T04:05:06.789000"
                }],
                "next": ""
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(api("feed/notification/bob/"))
                .query_param("mark_seen", "true");
            then.status(200).json_body(json!({
                "results": [{
                    "id": "n1",
                    "group": "post_2024-02-03",
                    "verb": "post",
                    "activity_count": 1,
                    "actor_count": 1,
                    "activities": [activity_json("a1")],
                    "is_read": false,
                    "is_seen": true
                }],
                "unseen": 0,
                "unread": 3,
                "next": ""
            }));
        })
        .await;

    let client = client(&server);
    let aggregated = client
        .feeds()
        .aggregated("timeline_aggr", "bob")
        .unwrap()
        .get_activities(&[])
        .await
        .unwrap();
    assert_eq!(aggregated.results[0].activities[0].id, "a1");

    let notifications = client
        .feeds()
        .notification("notification", "bob")
        .unwrap()
        .get_activities(&[GetActivitiesOption::MarkSeen(None)])
        .await
        .unwrap();
    assert_eq!(notifications.unread, 3);
    assert!(notifications.results[0].is_seen);
}

#[tokio::test]
async fn test_follow_uses_target_feed() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(api("feed/timeline/alice/follows/"))
                .json_body(json!({"target": "user:bob", "activity_copy_limit": 300}));
            then.status(201).json_body(json!({"duration": "1ms"}));
        })
        .await;

    let client = client(&server);
    let timeline = client.feeds().flat("timeline", "alice").unwrap();
    let target = FeedId::new("user", "bob").unwrap();
    timeline.follow(&target, None).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unfollow_and_remove() {
    let server = MockServer::start_async().await;
    let unfollow = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path(api("feed/timeline/alice/follows/user:bob/"))
                .query_param("keep_history", "1");
            then.status(200).json_body(json!({}));
        })
        .await;
    let remove = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path(api("feed/user/alice/post:1/"))
                .query_param("foreign_id", "1");
            then.status(200).json_body(json!({"removed": "post:1"}));
        })
        .await;

    let client = client(&server);
    let timeline = client.feeds().flat("timeline", "alice").unwrap();
    timeline
        .unfollow(&FeedId::new("user", "bob").unwrap(), true)
        .await
        .unwrap();

    let user = client.feeds().flat("user", "alice").unwrap();
    let resp = user.remove_activity_by_foreign_id("post:1").await.unwrap();
    assert_eq!(resp.removed, "post:1");

    assert!(matches!(
        user.remove_activity_by_id("").await,
        Err(SdkError::Validation(_))
    ));

    unfollow.assert_async().await;
    remove.assert_async().await;
}

#[tokio::test]
async fn test_follow_many_and_stats() {
    let server = MockServer::start_async().await;
    let follow_many = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(api("follow_many/"))
                .query_param("activity_copy_limit", "20")
                .json_body(json!([
                    {"source": "timeline:alice", "target": "user:bob"},
                    {"source": "timeline:alice", "target": "user:carol"}
                ]));
            then.status(201).json_body(json!({}));
        })
        .await;
    let stats = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(api("stats/follow/"))
                .query_param("followers", "user:alice")
                .query_param("following", "user:alice");
            then.status(200).json_body(json!({
                "results": {
                    "followers": {"count": 4, "feed": "user:alice"},
                    "following": {"count": 2, "feed": "user:alice"}
                }
            }));
        })
        .await;

    let client = client(&server);
    let source = FeedId::new("timeline", "alice").unwrap();
    let rels = vec![
        FollowRelationship::new(&source, &FeedId::new("user", "bob").unwrap()),
        FollowRelationship::new(&source, &FeedId::new("user", "carol").unwrap()),
    ];
    client.feeds().follow_many(&rels, Some(20)).await.unwrap();

    let user = client.feeds().flat("user", "alice").unwrap();
    let resp = user.follow_stats(&[]).await.unwrap();
    assert_eq!(resp.results.followers.map(|s| s.count), Some(4));
    assert_eq!(resp.results.following.map(|s| s.count), Some(2));

    follow_many.assert_async().await;
    stats.assert_async().await;
}

#[tokio::test]
async fn test_update_to_targets_requires_changes() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(api("feed_targets/user/alice/activity_to_targets/"))
                .json_body(json!({
                    "foreign_id": "post:1",
                    "time": "2024-02-03T04:05:06.789",
                    "added_targets": ["user:carol"]
                }));
            then.status(201).json_body(json!({
                "activity": {"id": "a1"},
                "added": ["user:carol"],
                "removed": []
            }));
        })
        .await;

    let client = client(&server);
    let feed = client.feeds().flat("user", "alice").unwrap();
    let activity: Activity = serde_json::from_value(activity_json("1")).unwrap();

    let err = feed
        .update_to_targets(&activity, &ToTargetsUpdate::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no changes specified for to targets"));

    let resp = feed
        .update_to_targets(&activity, &ToTargetsUpdate::new().add(["user:carol"]))
        .await
        .unwrap();
    assert_eq!(resp.added, vec!["user:carol".to_string()]);
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_realtime_token_is_stable() {
    let server = MockServer::start_async().await;
    let client = client(&server);
    let feed = client.feeds().flat("user", "alice").unwrap();
    assert_eq!(feed.realtime_token(true), feed.realtime_token(true));
    assert_ne!(feed.realtime_token(true), feed.realtime_token(false));
}
