//! One client per upstream. Each client owns the request builder for its
//! provider and hands the response to the normalizer.

use reqwest::header::HeaderValue;
use reqwest::{Request, RequestBuilder, Url};

use crate::error::SearchError;

pub mod brave;
pub mod brave_web;
pub mod linkup;

pub use brave::BraveClient;
pub use brave_web::BraveWebClient;
pub use linkup::LinkupClient;

pub(crate) fn endpoint(base_url: &str, path: &str) -> Result<Url, SearchError> {
    let joined = format!("{}{}", base_url.trim_end_matches('/'), path);
    Url::parse(&joined)
        .map_err(|e| SearchError::Configuration(format!("invalid API base URL '{base_url}': {e}")))
}

/// Header value for a credential; marked sensitive so it never shows up in
/// `Debug` output of the request.
pub(crate) fn credential_header(value: &str) -> Result<HeaderValue, SearchError> {
    let mut header = HeaderValue::from_str(value).map_err(|_| {
        SearchError::Configuration(
            "API key contains characters that are not allowed in an HTTP header".to_string(),
        )
    })?;
    header.set_sensitive(true);
    Ok(header)
}

pub(crate) fn build(builder: RequestBuilder) -> Result<Request, SearchError> {
    builder
        .build()
        .map_err(|e| SearchError::Validation(format!("cannot build request: {e}")))
}
