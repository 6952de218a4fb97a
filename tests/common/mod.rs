#![allow(dead_code)]

use httpmock::MockServer;
use stream_feeds_sdk::client::StreamClient;

pub const API_KEY: &str = "key";
pub const API_SECRET: &str = "something very secret";

/// Client whose every service points at `server`.
pub fn client(server: &MockServer) -> StreamClient {
    StreamClient::builder()
        .api_key(API_KEY)
        .api_secret(API_SECRET)
        .base_url(&server.base_url())
        .build()
        .expect("client builds")
}

pub fn api(path: &str) -> String {
    format!("/api/v1.0/{}", path)
}
