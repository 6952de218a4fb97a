//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs`: Domain types and their JSON shapes
//! - `wire.rs`: Request bodies and response envelopes, where they are many
//! - `client.rs`: Sub-client with the HTTP methods of the resource

pub mod activity;
pub mod analytics;
pub mod audit_log;
pub mod collection;
pub mod feed;
pub mod moderation;
pub mod personalization;
pub mod reaction;
pub mod user;
