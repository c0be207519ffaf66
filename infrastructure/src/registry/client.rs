//! HTTP client for the ROR registry

use super::schema::parse_organisation;
use async_trait::async_trait;
use reqwest::StatusCode;
use ror_application::RegistryGateway;
use ror_domain::{FetchOutcome, RorId};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

/// Default registry endpoint (v2 API)
pub const DEFAULT_BASE_URL: &str = "https://api.ror.org/v2/organizations";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default `User-Agent` header
pub const DEFAULT_USER_AGENT: &str = concat!("ror-harvest/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while setting up the registry client
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid registry base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// Connection settings for [`RorApiClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySettings {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl RegistrySettings {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Registry gateway backed by `reqwest`
///
/// Performs exactly one `GET <base>/<id>` per call and maps the response
/// onto a [`FetchOutcome`]:
///
/// | Response | Outcome |
/// |----------|---------|
/// | 2xx, parseable body | `Success` |
/// | 2xx, unparseable body | `NetworkError` |
/// | 429 | `RateLimited` |
/// | other status | `HttpError` with the canonical reason |
/// | transport failure | `NetworkError` |
pub struct RorApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl RorApiClient {
    pub fn new(settings: RegistrySettings) -> Result<Self, RegistryError> {
        let base_url = settings.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(RegistryError::InvalidBaseUrl(settings.base_url));
        }

        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent)
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lookup URL for one identifier
    pub fn endpoint(&self, id: &RorId) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

#[async_trait]
impl RegistryGateway for RorApiClient {
    async fn resolve(&self, id: &RorId) -> FetchOutcome {
        let url = self.endpoint(id);
        debug!("GET {}", url);

        let response = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(e) => return FetchOutcome::NetworkError(e.to_string()),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return FetchOutcome::RateLimited;
        }
        if !status.is_success() {
            return FetchOutcome::HttpError {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            };
        }

        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => return FetchOutcome::NetworkError(e.to_string()),
        };
        trace!("{} bytes for {}", body.len(), id);

        match parse_organisation(id.clone(), &body) {
            Ok(record) => FetchOutcome::Success(record),
            Err(e) => FetchOutcome::NetworkError(format!("Invalid response body: {}", e)),
        }
    }
}
