//! # Stream Feeds SDK
//!
//! A Rust client for the Stream activity feeds REST API.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core**: Shared types, the activity codec, domain models (always available)
//! 2. **Auth**: Claim sets and HS256 token signing
//! 3. **HTTP API**: Endpoint builder plus the `StreamHttp` request executor
//! 4. **High-Level Client**: `StreamClient` with nested resource sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stream_feeds_sdk::prelude::*;
//!
//! let client = StreamClient::new("api-key", "api-secret")?;
//!
//! let feed = client.feeds().flat("user", "alice")?;
//! feed.add_activity(&Activity::new("alice", "post", "picture:10")).await?;
//!
//! let page = feed.get_activities(&[GetActivitiesOption::Limit(25)]).await?;
//! let next = feed.get_next_page_activities(&page).await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, sub-clients.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Hosts, versions, transport defaults and environment variable names.
pub mod network;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Authentication: claim sets, request and user tokens.
pub mod auth;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// Endpoint builder and request executor.
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `StreamClient`: the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{BaseResponse, Duration, Extra, Rate, ResponseMeta, Time};

    // Domain types: activity
    pub use crate::domain::activity::wire::{
        ActivityResponse, GetActivitiesResponse, GetEnrichedActivitiesResponse,
    };
    pub use crate::domain::activity::{
        Activity, ActivityGroup, EnrichedActivity, EnrichedReaction, ForeignIdTimePair,
        NotificationGroup, Reference, UpdateActivityRequest,
    };

    // Domain types: feed
    pub use crate::domain::feed::wire::{
        AggregatedFeedResponse, EnrichedAggregatedFeedResponse, EnrichedFlatFeedResponse,
        EnrichedNotificationFeedResponse, FlatFeedResponse, FollowStatResponse,
        FollowersResponse, NotificationFeedResponse,
    };
    pub use crate::domain::feed::{
        FeedId, FollowRelationship, FollowStatOption, Follower, FollowersOption, FollowingOption,
        GetActivitiesOption, ToTargetsRequest, ToTargetsUpdate, UnfollowRelationship,
    };

    // Domain types: reaction, user, collection
    pub use crate::domain::collection::{
        create_collection_reference, CollectionObject, CollectionObjectResponse,
    };
    pub use crate::domain::reaction::wire::{FilterReactionResponse, ReactionResponse};
    pub use crate::domain::reaction::{
        AddReactionRequest, FilterReactionsAttribute, FilterReactionsOption, GetReactionsOption,
        Reaction,
    };
    pub use crate::domain::user::{create_user_reference, User, UserResponse};

    // Domain types: personalization, analytics, moderation, audit logs
    pub use crate::domain::analytics::{
        AnalyticsEvent, EngagementEvent, EventFeature, ImpressionEventsData, UserData,
    };
    pub use crate::domain::audit_log::{
        AuditLog, QueryAuditLogsFilters, QueryAuditLogsPager, QueryAuditLogsResponse,
    };
    pub use crate::domain::moderation::{
        ModerationStatus, UpdateStatusBatchItem, UpdateStatusBatchRequest,
        UpdateStatusBatchResponse,
    };
    pub use crate::domain::personalization::PersonalizationResponse;

    // Errors
    pub use crate::error::{ApiError, PaginationError, SdkError};

    // Auth
    pub use crate::auth::{Action, AuthScope, Resource, Signer};

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        ActivitiesClient, AnalyticsClient, AuditLogsClient, CollectionsClient, FeedsClient,
        ModerationClient, PersonalizationClient, ReactionsClient, StreamClient,
        StreamClientBuilder, UsersClient,
    };
    #[cfg(feature = "http")]
    pub use crate::domain::feed::client::{AggregatedFeed, Feed, FlatFeed, NotificationFeed};
}
