use reqwest::header::ACCEPT;
use reqwest::{Request, Url};

use crate::config::{ApiKey, Config};
use crate::data_models::{BraveSearchRequest, ResultPage};
use crate::error::SearchError;
use crate::normalize;
use crate::transport::{SEARCH_TIMEOUT, Transport};

use super::{build, credential_header, endpoint};

pub const BRAVE_SEARCH_PATH: &str = "/res/v1/web/search";
const SUBSCRIPTION_TOKEN: &str = "X-Subscription-Token";

/// Client for the Brave Search web-search endpoint.
#[derive(Debug)]
pub struct BraveClient {
    transport: Transport,
    api_key: ApiKey,
    endpoint: Url,
}

impl BraveClient {
    /// Fails before touching the network when `BRAVE_API_KEY` is absent.
    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        let api_key = config.require_brave_key()?.clone();
        let endpoint = endpoint(&config.brave_api_base_url, BRAVE_SEARCH_PATH)?;
        Ok(Self {
            transport: Transport::new()?,
            api_key,
            endpoint,
        })
    }

    pub fn build_request(&self, request: &BraveSearchRequest) -> Result<Request, SearchError> {
        let count = request.upstream_count().to_string();
        let mut params = vec![("q", request.query.as_str()), ("count", count.as_str())];
        if !request.country.is_empty() {
            params.push(("country", request.country.as_str()));
        }
        if !request.language.is_empty() {
            params.push(("language", request.language.as_str()));
        }

        build(
            self.transport
                .client()
                .get(self.endpoint.clone())
                .query(&params)
                .header(SUBSCRIPTION_TOKEN, credential_header(self.api_key.expose())?)
                .header(ACCEPT, "application/json"),
        )
    }

    pub async fn search(&self, request: &BraveSearchRequest) -> Result<ResultPage, SearchError> {
        let http = self.build_request(request)?;
        log::debug!(
            "brave search: {:?} (count {})",
            request.query,
            request.upstream_count()
        );
        let body = self.transport.send_json(http, SEARCH_TIMEOUT).await?;
        normalize::brave_results(body, request.result_limit as usize)
    }
}
