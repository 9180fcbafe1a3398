use std::time::Duration;

use reqwest::{Client, Request};
use serde_json::Value;

use crate::error::{ApiError, SearchError};

pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);
/// Deep searches and page fetches get longer.
pub const LONG_TIMEOUT: Duration = Duration::from_secs(60);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// One attempt, one timeout, no retries.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
}

impl Transport {
    pub fn new() -> Result<Self, SearchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SearchError::Configuration(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn send_json(&self, request: Request, timeout: Duration) -> Result<Value, SearchError> {
        let body = self.send_text(request, timeout).await?;
        serde_json::from_str(&body).map_err(|e| SearchError::InvalidResponse(e.to_string()))
    }

    /// Returns the body of a 2xx response; any other status becomes
    /// [`SearchError::Api`] with the body kept for diagnostics.
    pub async fn send_text(
        &self,
        mut request: Request,
        timeout: Duration,
    ) -> Result<String, SearchError> {
        *request.timeout_mut() = Some(timeout);
        let method = request.method().clone();
        let endpoint = format!(
            "{}://{}{}",
            request.url().scheme(),
            request.url().host_str().unwrap_or_default(),
            request.url().path()
        );
        log::debug!("{method} {endpoint} (timeout {}s)", timeout.as_secs());

        let response = self
            .client
            .execute(request)
            .await
            .map_err(SearchError::from_transport)?;
        let status = response.status();
        let body = response.text().await.map_err(SearchError::from_transport)?;
        log::debug!("{endpoint} answered {status} with {} bytes", body.len());

        if !status.is_success() {
            log::warn!("{endpoint} returned status {status}");
            return Err(ApiError::from_body(status.as_u16(), &body).into());
        }
        Ok(body)
    }
}
