//! Network constants for the Stream feeds API.

use std::time::Duration;

/// Root domain every service host hangs off.
pub const DOMAIN: &str = "stream-io-api.com";

/// API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "1.0";

/// The personalization service is only served under this version.
pub const PERSONALIZATION_API_VERSION: &str = "1.0";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(6);

/// Idle connections kept per host by the default transport.
pub const POOL_MAX_IDLE_PER_HOST: usize = 5;

/// How long an idle pooled connection is kept.
pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(59);

/// Value of the `X-Stream-Client` header.
pub const CLIENT_IDENTIFIER: &str = concat!("stream-feeds-rust-", env!("CARGO_PKG_VERSION"));

// ── Environment ──────────────────────────────────────────────────────────────

pub const ENV_API_KEY: &str = "STREAM_API_KEY";
pub const ENV_API_SECRET: &str = "STREAM_API_SECRET";
pub const ENV_API_REGION: &str = "STREAM_API_REGION";
pub const ENV_API_VERSION: &str = "STREAM_API_VERSION";
/// Replaces scheme and host of every endpoint (local and test servers).
pub const ENV_BASE_URL: &str = "STREAM_URL";

const API_REGION_OVERRIDES: &[(&str, &str)] = &[
    ("us-east", "us-east-api"),
    ("eu-west", "eu-west-api"),
    ("singapore", "singapore-api"),
];

/// Host prefix for the main API in a named region.
///
/// Regions already given in host form (`eu-central-api`) are used as is.
pub fn api_region_host(region: &str) -> String {
    if let Some((_, host)) = API_REGION_OVERRIDES.iter().find(|(name, _)| *name == region) {
        return host.to_string();
    }
    if region.ends_with("-api") {
        region.to_string()
    } else {
        format!("{}-api", region)
    }
}
