use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Longest slice of a raw error body kept for diagnostics.
const RAW_BODY_LIMIT: usize = 500;

/// Every way a single invocation can fail. None of them are retried.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Validation(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Failed to make request - {0}")]
    Connection(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Invalid response from API - {0}")]
    InvalidResponse(String),

    #[error("Cannot encode output - {0}")]
    Encode(#[from] serde_json::Error),
}

impl SearchError {
    /// Maps a reqwest failure onto the transport half of the taxonomy.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SearchError::Timeout
        } else if err.is_decode() {
            SearchError::InvalidResponse(err.to_string())
        } else {
            SearchError::Connection(err.to_string())
        }
    }

    pub fn missing_credential(var: &str, signup_url: &str) -> Self {
        SearchError::Configuration(format!(
            "{var} environment variable not set.\n\
             Get your API key from: {signup_url}\n\
             Set it with: export {var}='your-api-key-here'"
        ))
    }

    /// Upstream status code, when the failure came from a non-2xx response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SearchError::Api(api) => Some(api.status_code),
            _ => None,
        }
    }
}

/// A non-2xx answer from the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status_code: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }

    /// Pulls the most specific message the body offers.
    ///
    /// Linkup reports `{"error": {"message": ..}}`, Brave reports
    /// `{"errors": [{"detail": ..}]}`. Anything else falls back to the head of
    /// the raw body.
    pub fn from_body(status_code: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| extract_message(&v))
            .unwrap_or_else(|| {
                let head: String = body.trim().chars().take(RAW_BODY_LIMIT).collect();
                if head.is_empty() {
                    reqwest::StatusCode::from_u16(status_code)
                        .ok()
                        .and_then(|s| s.canonical_reason())
                        .unwrap_or("empty response body")
                        .to_string()
                } else {
                    head
                }
            });
        Self::new(status_code, message)
    }
}

fn extract_message(body: &Value) -> Option<String> {
    let candidates = [
        body.pointer("/error/message"),
        body.pointer("/errors/0/detail"),
        body.get("message"),
        body.get("error"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API returned status code {}\nDetails: {}",
            self.status_code, self.message
        )
    }
}

impl std::error::Error for ApiError {}

#[test]
fn test_api_error_message_extraction() {
    let linkup = ApiError::from_body(401, r#"{"error":{"message":"invalid key"}}"#);
    assert_eq!(linkup.message, "invalid key");

    let brave = ApiError::from_body(422, r#"{"errors":[{"detail":"count too large"}]}"#);
    assert_eq!(brave.message, "count too large");

    let plain = ApiError::from_body(502, "upstream exploded");
    assert_eq!(plain.message, "upstream exploded");

    let empty = ApiError::from_body(503, "");
    assert_eq!(empty.message, "Service Unavailable");

    let long = "x".repeat(2_000);
    assert_eq!(ApiError::from_body(500, &long).message.len(), RAW_BODY_LIMIT);
}

#[test]
fn test_api_error_display_carries_status() {
    let err = SearchError::from(ApiError::new(429, "slow down"));
    assert_eq!(err.status_code(), Some(429));
    assert!(err.to_string().contains("429"));
    assert!(err.to_string().contains("slow down"));
}
