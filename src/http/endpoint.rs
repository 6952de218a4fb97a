//! Endpoint construction: host, version, resource path, ordered query.

use url::Url;

use crate::error::SdkError;
use crate::network::{self, DEFAULT_API_VERSION, DOMAIN, PERSONALIZATION_API_VERSION};

/// Backend service an endpoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Api,
    Analytics,
    Personalization,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Analytics => "analytics",
            Self::Personalization => "personalization",
        }
    }

    fn host_prefix(&self, region: Option<&str>) -> String {
        match (self, region) {
            (_, None) => self.as_str().to_string(),
            (Self::Api, Some(region)) => network::api_region_host(region),
            (_, Some(region)) => format!("{}-{}", region, self.as_str()),
        }
    }
}

/// Percent-escapes a caller-supplied id for use as one path segment. `:`
/// stays readable since feed ids and references rely on it.
pub fn path_segment(raw: &str) -> String {
    urlencoding::encode(raw).replace("%3A", ":")
}

/// A query parameter contributed by a typed option.
pub trait QueryParam {
    fn key(&self) -> &str;
    fn value(&self) -> String;
}

/// Region, version and host override shared by every endpoint of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrls {
    region: Option<String>,
    version: String,
    base_url: Option<String>,
}

impl BaseUrls {
    /// Empty strings count as unset. `base_url` replaces scheme and host for
    /// every service and must be an absolute URL.
    pub fn new(
        region: Option<&str>,
        version: Option<&str>,
        base_url: Option<&str>,
    ) -> Result<Self, SdkError> {
        let base_url = match base_url.filter(|u| !u.is_empty()) {
            Some(raw) => {
                let trimmed = raw.trim_end_matches('/');
                Url::parse(trimmed)
                    .map_err(|e| SdkError::Config(format!("invalid base URL {:?}: {}", raw, e)))?;
                Some(trimmed.to_string())
            }
            None => None,
        };
        Ok(Self {
            region: region.filter(|r| !r.is_empty()).map(str::to_string),
            version: version
                .filter(|v| !v.is_empty())
                .unwrap_or(DEFAULT_API_VERSION)
                .to_string(),
            base_url,
        })
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Root of a service, ending in `/`, e.g. `https://api.stream-io-api.com/api/v1.0/`.
    pub fn service_root(&self, service: Service) -> String {
        let version = match service {
            Service::Personalization => PERSONALIZATION_API_VERSION,
            _ => self.version.as_str(),
        };
        let origin = match &self.base_url {
            Some(base) => base.clone(),
            None => format!(
                "https://{}.{}",
                service.host_prefix(self.region.as_deref()),
                DOMAIN
            ),
        };
        format!("{}/{}/v{}/", origin, service.as_str(), version)
    }

    /// Endpoint for `path` (relative to the service root) with `api_key` set.
    pub fn endpoint(&self, service: Service, api_key: &str, path: &str) -> Result<Endpoint, SdkError> {
        let raw = format!("{}{}", self.service_root(service), path);
        let url = Url::parse(&raw)
            .map_err(|e| SdkError::Validation(format!("invalid endpoint {:?}: {}", raw, e)))?;
        let mut endpoint = Endpoint {
            url,
            query: Vec::new(),
        };
        endpoint.push("api_key", api_key);
        Ok(endpoint)
    }
}

/// A request URL under construction. Parameters keep insertion order and
/// empty values are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
    query: Vec<(String, String)>,
}

impl Endpoint {
    pub fn push(&mut self, key: &str, value: impl ToString) -> &mut Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.query.push((key.to_string(), value));
        }
        self
    }

    pub fn push_opts<P: QueryParam>(&mut self, opts: &[P]) -> &mut Self {
        for opt in opts {
            self.push(opt.key(), opt.value());
        }
        self
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        url
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url())
    }
}
