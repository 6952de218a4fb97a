//! HTTP layer: endpoint builder and the `StreamHttp` request executor.

pub mod endpoint;

#[cfg(feature = "http")]
pub mod client;

#[cfg(feature = "http")]
pub use client::StreamHttp;
pub use endpoint::{path_segment, BaseUrls, Endpoint, QueryParam, Service};
