//! Error mapping of non-2xx and malformed responses.

mod common;

use common::{api, client};
use httpmock::prelude::*;
use serde_json::json;
use stream_feeds_sdk::error::HttpError;
use stream_feeds_sdk::prelude::*;

#[tokio::test]
async fn test_api_error_keeps_actual_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(api("user/ghost/"));
            then.status(404)
                .header("X-Ratelimit-Limit", "1000")
                .header("X-Ratelimit-Remaining", "998")
                .json_body(json!({
                    "code": 16,
                    "detail": "the details",
                    "duration": "0.5ms",
                    "exception": "DoesNotExistException",
                    "status_code": 400
                }));
        })
        .await;

    let client = client(&server);
    let err = client.users().get("ghost").await.unwrap_err();
    assert_eq!(err.to_string(), "the details");

    let api_err = err.as_api_error().expect("structured error");
    assert_eq!(api_err.status_code, 404);
    assert_eq!(api_err.code, 16);
    assert_eq!(api_err.exception, "DoesNotExistException");
    assert_eq!(api_err.rate.map(|r| r.remaining), Some(998));
}

#[tokio::test]
async fn test_unreadable_error_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(api("user/alice/"));
            then.status(502).body("<html>bad gateway</html>");
        })
        .await;

    let client = client(&server);
    let err = client.users().get("alice").await.unwrap_err();
    assert!(err.as_api_error().is_none());
    assert!(matches!(
        err,
        SdkError::Http(HttpError::UnexpectedStatus { status: 502 })
    ));
}

#[tokio::test]
async fn test_malformed_success_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(api("feed/user/alice/"));
            then.status(200).json_body(json!({
                "results": [
                    {"id": "a1", "actor": "alice", "verb": "post", "object": "o1"},
                    {"id": "a2", "actor": "alice", "verb": "post", "object": "o2", "to": [42]}
                ]
            }));
        })
        .await;

    let client = client(&server);
    let feed = client.feeds().flat("user", "alice").unwrap();
    let err = feed.get_activities(&[]).await.unwrap_err();
    assert!(matches!(err, SdkError::Serde(_)));
}

#[tokio::test]
async fn test_validation_never_reaches_server() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.path_contains("/");
            then.status(200).json_body(json!({}));
        })
        .await;

    let client = client(&server);
    assert!(matches!(
        client.feeds().flat("user", "bad id!"),
        Err(SdkError::Validation(_))
    ));
    assert!(matches!(
        client.feeds().generic("user:a:b"),
        Err(SdkError::Validation(_))
    ));
    assert!(matches!(
        client.users().get("").await,
        Err(SdkError::Validation(_))
    ));
    assert!(matches!(
        client.collections().get("", "cheese").await,
        Err(SdkError::Validation(_))
    ));
    mock.assert_hits_async(0).await;
}
