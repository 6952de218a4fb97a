//! High-level client: `StreamClient` with nested sub-client accessors.
//!
//! Each resource has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, the shared configuration, and accessor
//! methods.

use std::time::Duration;

use crate::auth::Signer;
use crate::domain::activity::client::Activities;
use crate::domain::analytics::client::Analytics;
use crate::domain::audit_log::client::AuditLogs;
use crate::domain::collection::client::Collections;
use crate::domain::feed::client::Feeds;
use crate::domain::moderation::client::Moderation;
use crate::domain::personalization::client::Personalization;
use crate::domain::reaction::client::Reactions;
use crate::domain::user::client::Users;
use crate::error::SdkError;
use crate::http::{BaseUrls, StreamHttp};
use crate::network::{
    DEFAULT_TIMEOUT, ENV_API_KEY, ENV_API_REGION, ENV_API_SECRET, ENV_API_VERSION, ENV_BASE_URL,
    POOL_IDLE_TIMEOUT, POOL_MAX_IDLE_PER_HOST,
};
use crate::shared::Extra;

// Re-export sub-client types for convenience.
pub use crate::domain::activity::client::Activities as ActivitiesClient;
pub use crate::domain::analytics::client::Analytics as AnalyticsClient;
pub use crate::domain::audit_log::client::AuditLogs as AuditLogsClient;
pub use crate::domain::collection::client::Collections as CollectionsClient;
pub use crate::domain::feed::client::Feeds as FeedsClient;
pub use crate::domain::moderation::client::Moderation as ModerationClient;
pub use crate::domain::personalization::client::Personalization as PersonalizationClient;
pub use crate::domain::reaction::client::Reactions as ReactionsClient;
pub use crate::domain::user::client::Users as UsersClient;

/// The primary entry point for the feeds API.
///
/// Provides nested sub-client accessors for each resource:
/// `client.feeds()`, `client.reactions()`, etc. The configuration is fixed at
/// construction; cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct StreamClient {
    pub(crate) http: StreamHttp,
}

impl StreamClient {
    pub fn builder() -> StreamClientBuilder {
        StreamClientBuilder::default()
    }

    /// Client for the given credentials. `STREAM_URL` still overrides the
    /// host when set.
    pub fn new(api_key: &str, api_secret: &str) -> Result<Self, SdkError> {
        Self::builder().api_key(api_key).api_secret(api_secret).build()
    }

    /// Client configured from `STREAM_API_KEY`, `STREAM_API_SECRET`,
    /// `STREAM_API_REGION`, `STREAM_API_VERSION` and `STREAM_URL`.
    pub fn from_env() -> Result<Self, SdkError> {
        let mut builder = Self::builder();
        if let Some(key) = env(ENV_API_KEY) {
            builder = builder.api_key(&key);
        }
        if let Some(secret) = env(ENV_API_SECRET) {
            builder = builder.api_secret(&secret);
        }
        if let Some(region) = env(ENV_API_REGION) {
            builder = builder.region(&region);
        }
        if let Some(version) = env(ENV_API_VERSION) {
            builder = builder.version(&version);
        }
        builder.build()
    }

    /// A copy of this client whose requests use `timeout`.
    pub fn with_timeout(&self, timeout: Duration) -> Result<Self, SdkError> {
        Ok(Self {
            http: self.http.with_client(transport(timeout)?),
        })
    }

    pub fn api_key(&self) -> &str {
        self.http.api_key()
    }

    pub fn base_urls(&self) -> &BaseUrls {
        self.http.urls()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn feeds(&self) -> Feeds<'_> {
        Feeds { client: self }
    }

    pub fn activities(&self) -> Activities<'_> {
        Activities { client: self }
    }

    pub fn reactions(&self) -> Reactions<'_> {
        Reactions { client: self }
    }

    pub fn users(&self) -> Users<'_> {
        Users { client: self }
    }

    pub fn collections(&self) -> Collections<'_> {
        Collections { client: self }
    }

    pub fn personalization(&self) -> Personalization<'_> {
        Personalization { client: self }
    }

    pub fn analytics(&self) -> Analytics<'_> {
        Analytics { client: self }
    }

    pub fn moderation(&self) -> Moderation<'_> {
        Moderation { client: self }
    }

    pub fn audit_logs(&self) -> AuditLogs<'_> {
        AuditLogs { client: self }
    }

    // ── Tokens ───────────────────────────────────────────────────────────

    /// Session token for a client-side user.
    pub fn create_user_token(&self, user_id: &str) -> Result<String, SdkError> {
        self.create_user_token_with_claims(user_id, Extra::new())
    }

    /// Session token carrying extra claims (e.g. `exp`). `user_id` always
    /// wins over a `user_id` key in `claims`.
    pub fn create_user_token_with_claims(
        &self,
        user_id: &str,
        claims: Extra,
    ) -> Result<String, SdkError> {
        Ok(self.http.signer().user_token(user_id, claims)?)
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct StreamClientBuilder {
    api_key: String,
    api_secret: String,
    region: Option<String>,
    version: Option<String>,
    base_url: Option<String>,
    timeout: Duration,
    http_client: Option<reqwest::Client>,
}

impl Default for StreamClientBuilder {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            region: None,
            version: None,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            http_client: None,
        }
    }
}

impl StreamClientBuilder {
    pub fn api_key(mut self, key: &str) -> Self {
        self.api_key = key.to_string();
        self
    }

    pub fn api_secret(mut self, secret: &str) -> Self {
        self.api_secret = secret.to_string();
        self
    }

    /// Region such as `us-east` or `eu-central-api`.
    pub fn region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    /// API version, without the `v` prefix.
    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Replaces scheme and host of every service, e.g. a local server.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    /// Per-request timeout. Ignored when a client is injected.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a preconfigured transport instead of the default one.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<StreamClient, SdkError> {
        if self.api_key.is_empty() {
            return Err(SdkError::Config("missing API key".to_string()));
        }
        if self.api_secret.is_empty() {
            return Err(SdkError::Config("missing API secret".to_string()));
        }

        let base_url = self.base_url.or_else(|| env(ENV_BASE_URL));
        let urls = BaseUrls::new(
            self.region.as_deref(),
            self.version.as_deref(),
            base_url.as_deref(),
        )?;
        let client = match self.http_client {
            Some(client) => client,
            None => transport(self.timeout)?,
        };

        tracing::debug!(
            region = urls.region().unwrap_or("default"),
            version = urls.version(),
            base_url = urls.base_url().unwrap_or(""),
            "stream client configured"
        );

        Ok(StreamClient {
            http: StreamHttp::new(client, &self.api_key, Signer::new(&self.api_secret), urls),
        })
    }
}

fn transport(timeout: Duration) -> Result<reqwest::Client, SdkError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .build()
        .map_err(|e| SdkError::Config(format!("cannot build HTTP client: {}", e)))
}

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
