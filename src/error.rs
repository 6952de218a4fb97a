//! Unified SDK error types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::{Duration, Rate};

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// Structured error returned by the service for a non-2xx response.
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Pagination error: {0}")]
    Pagination(#[from] PaginationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl SdkError {
    /// Returns the structured API error, if this is one.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<DecodeError> for SdkError {
    fn from(err: DecodeError) -> Self {
        Self::Serde(serde::de::Error::custom(err))
    }
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("cannot marshal request: {0}")]
    Marshal(#[source] serde_json::Error),

    #[error("cannot create request: {0}")]
    InvalidRequest(String),

    #[cfg(feature = "http")]
    #[error("cannot perform request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("cannot read response: {0}")]
    InvalidResponse(String),

    #[error("unexpected error (status code {status})")]
    UnexpectedStatus { status: u16 },
}

/// Error payload returned by the service alongside a non-2xx status.
///
/// `status_code` always holds the actual HTTP status of the response, whatever
/// the body claimed.
#[derive(Error, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[error("{detail}")]
pub struct ApiError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub duration: Duration,
    #[serde(default)]
    pub exception: String,
    #[serde(default)]
    pub exception_fields: BTreeMap<String, Vec<serde_json::Value>>,
    #[serde(default)]
    pub status_code: u16,
    #[serde(skip)]
    pub rate: Option<Rate>,
}

/// Authentication errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("cannot sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Errors raised while following a `next` link.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("request missing next page")]
    MissingNextPage,

    #[error("invalid format for Next field")]
    InvalidNextPage,
}

/// Activity codec errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid format for to targets")]
    InvalidToTargets,

    #[error("invalid time: {0}")]
    InvalidTime(String),

    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    #[error("invalid reference: expected a string or an object with an id")]
    InvalidReference,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_is_detail() {
        let err = ApiError {
            detail: "boom".to_string(),
            ..Default::default()
        };
        assert_eq!(err.to_string(), "boom");

        let sdk: SdkError = err.into();
        assert_eq!(sdk.to_string(), "boom");
        assert_eq!(sdk.as_api_error().map(|e| e.detail.as_str()), Some("boom"));
    }

    #[test]
    fn test_api_error_decode() {
        let body = r#"{"code":42,"detail":"the details","duration":"10ms","exception":"boom","status_code":123,
            "exception_fields":{"user_id":["is required"]}}"#;
        let err: ApiError = serde_json::from_str(body).unwrap();
        assert_eq!(err.code, 42);
        assert_eq!(err.detail, "the details");
        assert_eq!(err.duration.as_std(), std::time::Duration::from_millis(10));
        assert_eq!(err.exception, "boom");
        assert_eq!(err.status_code, 123);
        assert_eq!(
            err.exception_fields.get("user_id"),
            Some(&vec![serde_json::json!("is required")])
        );
    }

    #[test]
    fn test_non_api_errors() {
        let err = SdkError::from(PaginationError::MissingNextPage);
        assert!(err.as_api_error().is_none());
        assert_eq!(
            HttpError::UnexpectedStatus { status: 502 }.to_string(),
            "unexpected error (status code 502)"
        );
        assert_eq!(
            DecodeError::InvalidToTargets.to_string(),
            "invalid format for to targets"
        );
    }
}
