//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw format the backend sends, so they can be used directly in wire types
//! without conversion overhead.

pub mod duration;
pub mod query;
pub mod rate;
pub mod serde_util;
pub mod time;

pub use duration::Duration;
pub use rate::{BaseResponse, Rate, ResponseMeta};
pub use time::Time;

/// Free-form JSON object carried alongside typed fields.
pub type Extra = serde_json::Map<String, serde_json::Value>;
