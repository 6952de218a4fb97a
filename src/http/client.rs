//! Request executor: `StreamHttp`.
//!
//! Serializes the optional JSON body, signs the request for its scope,
//! performs it, and turns the response into either a typed value or a
//! structured [`ApiError`]. No retries: every call is a single attempt.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing;

use crate::auth::{AuthScope, Signer, AUTH_TYPE_JWT, HEADER_AUTHORIZATION, HEADER_AUTH_TYPE};
use crate::error::{ApiError, HttpError, SdkError};
use crate::http::endpoint::{BaseUrls, Endpoint, Service};
use crate::network::CLIENT_IDENTIFIER;
use crate::shared::rate::{HEADER_RATE_LIMIT, HEADER_RATE_REMAINING, HEADER_RATE_RESET};
use crate::shared::Rate;

/// Low-level HTTP client for the feeds REST API.
#[derive(Clone)]
pub struct StreamHttp {
    client: Client,
    api_key: String,
    signer: Signer,
    urls: BaseUrls,
}

impl StreamHttp {
    pub fn new(client: Client, api_key: &str, signer: Signer, urls: BaseUrls) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            signer,
            urls,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    pub fn urls(&self) -> &BaseUrls {
        &self.urls
    }

    pub(crate) fn with_client(&self, client: Client) -> Self {
        Self {
            client,
            ..self.clone()
        }
    }

    /// Endpoint on the main API service.
    pub fn endpoint(&self, path: &str) -> Result<Endpoint, SdkError> {
        self.urls.endpoint(Service::Api, &self.api_key, path)
    }

    pub fn service_endpoint(&self, service: Service, path: &str) -> Result<Endpoint, SdkError> {
        self.urls.endpoint(service, &self.api_key, path)
    }

    // ── Verbs ────────────────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        scope: &AuthScope,
    ) -> Result<T, SdkError> {
        self.request(Method::GET, endpoint, None::<&()>, scope).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        body: &B,
        scope: &AuthScope,
    ) -> Result<T, SdkError> {
        self.request(Method::POST, endpoint, Some(body), scope).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        body: Option<&B>,
        scope: &AuthScope,
    ) -> Result<T, SdkError> {
        self.request(Method::PUT, endpoint, body, scope).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        scope: &AuthScope,
    ) -> Result<T, SdkError> {
        self.request(Method::DELETE, endpoint, None::<&()>, scope).await
    }

    // ── Internal ─────────────────────────────────────────────────────────

    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &Endpoint,
        body: Option<&B>,
        scope: &AuthScope,
    ) -> Result<T, SdkError> {
        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(HttpError::Marshal)?;

        let token = self.signer.sign_scope(scope, method.as_str())?;
        let headers = self.headers(&token)?;

        let url = endpoint.url();
        tracing::debug!(method = %method, url = %redact(&url), "sending request");

        let mut req = self.client.request(method.clone(), url).headers(headers);
        if let Some(bytes) = payload {
            req = req.body(bytes);
        }

        let resp = req.send().await.map_err(HttpError::Request)?;
        let status = resp.status();
        let rate = rate_from_headers(resp.headers());
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| HttpError::InvalidResponse(e.to_string()))?;

        tracing::debug!(method = %method, status = status.as_u16(), "received response");

        if !status.is_success() {
            return Err(api_error(status.as_u16(), rate, &bytes));
        }

        decode_body(&bytes, rate)
    }

    fn headers(&self, token: &str) -> Result<HeaderMap, SdkError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("X-Stream-Client", HeaderValue::from_static(CLIENT_IDENTIFIER));
        headers.insert(HEADER_AUTH_TYPE, HeaderValue::from_static(AUTH_TYPE_JWT));
        let auth = HeaderValue::from_str(token)
            .map_err(|e| HttpError::InvalidRequest(e.to_string()))?;
        headers.insert(HEADER_AUTHORIZATION, auth);
        Ok(headers)
    }
}

impl std::fmt::Debug for StreamHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHttp")
            .field("api_key", &self.api_key)
            .field("urls", &self.urls)
            .finish_non_exhaustive()
    }
}

fn rate_from_headers(headers: &HeaderMap) -> Rate {
    let value = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    Rate::from_header_values(
        value(HEADER_RATE_LIMIT),
        value(HEADER_RATE_REMAINING),
        value(HEADER_RATE_RESET),
    )
}

/// Strips the query so tokens and keys never reach the logs.
fn redact(url: &url::Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

fn api_error(status: u16, rate: Rate, body: &[u8]) -> SdkError {
    match serde_json::from_slice::<ApiError>(body) {
        Ok(mut err) => {
            err.status_code = status;
            err.rate = Some(rate);
            SdkError::Api(err)
        }
        Err(e) => {
            tracing::warn!(status, error = %e, "error response is not an API error");
            HttpError::UnexpectedStatus { status }.into()
        }
    }
}

/// Parses a 2xx body as a JSON object, injects `ratelimit`, then decodes `T`.
/// An empty body counts as `{}`.
fn decode_body<T: DeserializeOwned>(body: &[u8], rate: Rate) -> Result<T, SdkError> {
    let mut object = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::Map::new()
    } else {
        serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(body)
            .map_err(|e| HttpError::InvalidResponse(e.to_string()))?
    };
    object.insert("ratelimit".to_string(), serde_json::to_value(rate)?);
    Ok(serde_json::from_value(serde_json::Value::Object(object))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::BaseResponse;

    #[test]
    fn test_api_error_mapping() {
        let body = br#"{"code":4,"detail":"the details","duration":"1ms","exception":"InputException","status_code":400}"#;
        let err = api_error(403, Rate::default(), body);
        let api = err.as_api_error().unwrap();
        assert_eq!(api.detail, "the details");
        assert_eq!(api.status_code, 403);
        assert_eq!(err.to_string(), "the details");
    }

    #[test]
    fn test_unexpected_error_body() {
        let err = api_error(502, Rate::default(), b"<html>bad gateway</html>");
        assert!(matches!(
            err,
            SdkError::Http(HttpError::UnexpectedStatus { status: 502 })
        ));
        assert!(err.to_string().contains("unexpected error (status code 502)"));
    }

    #[test]
    fn test_decode_body_injects_rate() {
        let rate = Rate::from_header_values(Some("100"), Some("42"), None);
        let resp: BaseResponse = decode_body(br#"{"duration":"3ms"}"#, rate).unwrap();
        assert_eq!(resp.meta.ratelimit, rate);

        let resp: BaseResponse = decode_body(b"", rate).unwrap();
        assert_eq!(resp.meta.ratelimit.remaining, 42);
    }

    #[test]
    fn test_decode_body_rejects_non_object() {
        let err = decode_body::<BaseResponse>(b"[1,2]", Rate::default()).unwrap_err();
        assert!(matches!(err, SdkError::Http(HttpError::InvalidResponse(_))));
        assert!(err.to_string().contains("cannot read response"));
    }
}
