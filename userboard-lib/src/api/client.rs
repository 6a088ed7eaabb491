//! Member directory fetch client

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::error::ApiError;
use crate::model::UserRecord;

/// Default endpoint serving the member directory.
pub const DEFAULT_ENDPOINT: &str =
    "https://geektrust.s3-ap-southeast-1.amazonaws.com/adminui-problem/members.json";

/// Client for the member directory endpoint.
///
/// The directory is a single flat JSON array behind one GET: no auth, no
/// server-side pagination, no retry. This client is cheap to clone
/// (`reqwest::Client` shares its connection pool internally).
///
/// # Example
///
/// ```ignore
/// use userboard_lib::api::{DEFAULT_ENDPOINT, UserClient};
///
/// let client = UserClient::new(DEFAULT_ENDPOINT)?;
/// let users = client.fetch_users().await?;
/// ```
#[derive(Debug, Clone)]
pub struct UserClient {
    endpoint: Url,
    http_client: Client,
    timeout: Option<Duration>,
}

impl UserClient {
    /// Creates a client for the given endpoint URL.
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self, ApiError> {
        let endpoint = Url::parse(endpoint.as_ref())
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", endpoint.as_ref())))?;

        Ok(Self {
            endpoint,
            http_client: Client::new(),
            timeout: None,
        })
    }

    /// Sets a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the endpoint URL.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Fetches the full user collection.
    ///
    /// One GET, one JSON array. Non-success statuses and malformed bodies
    /// are reported as errors; the caller decides what to do with a failed
    /// load (the TUI logs it and keeps its prior state).
    pub async fn fetch_users(&self) -> Result<Vec<UserRecord>, ApiError> {
        let mut request = self.http_client.get(self.endpoint.clone());
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::http(status, body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::parse_with_body(e.to_string(), body))
    }
}
