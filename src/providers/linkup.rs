use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Request, Url};
use serde::Serialize;

use crate::config::{ApiKey, Config};
use crate::data_models::{
    Depth, FetchRequest, FetchResult, LinkupOutcome, LinkupSearchRequest, OutputFormat, OutputType,
};
use crate::error::SearchError;
use crate::normalize;
use crate::transport::{LONG_TIMEOUT, SEARCH_TIMEOUT, Transport};
use crate::validate::format_date;

use super::{build, credential_header, endpoint};

pub const LINKUP_SEARCH_PATH: &str = "/v1/search";
pub const LINKUP_FETCH_PATH: &str = "/v1/fetch";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody<'a> {
    q: &'a str,
    depth: Depth,
    output_type: OutputType,
    max_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    from_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_domains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exclude_domains: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchBody<'a> {
    url: &'a str,
    output_format: OutputFormat,
    #[serde(rename = "renderJS", skip_serializing_if = "std::ops::Not::not")]
    render_js: bool,
}

fn comma_joined(domains: &[String]) -> Option<String> {
    if domains.is_empty() {
        None
    } else {
        Some(domains.join(","))
    }
}

pub fn search_timeout(depth: Depth) -> Duration {
    match depth {
        Depth::Standard => SEARCH_TIMEOUT,
        Depth::Deep => LONG_TIMEOUT,
    }
}

/// Client for Linkup's `/search` and `/fetch` endpoints.
#[derive(Debug)]
pub struct LinkupClient {
    transport: Transport,
    api_key: ApiKey,
    search_endpoint: Url,
    fetch_endpoint: Url,
}

impl LinkupClient {
    /// Fails before touching the network when `LINKUP_API_KEY` is absent.
    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        let api_key = config.require_linkup_key()?.clone();
        Ok(Self {
            transport: Transport::new()?,
            api_key,
            search_endpoint: endpoint(&config.linkup_api_base_url, LINKUP_SEARCH_PATH)?,
            fetch_endpoint: endpoint(&config.linkup_api_base_url, LINKUP_FETCH_PATH)?,
        })
    }

    fn post<T: Serialize>(&self, url: &Url, body: &T) -> Result<Request, SearchError> {
        let bearer = format!("Bearer {}", self.api_key.expose());
        build(
            self.transport
                .client()
                .post(url.clone())
                .header(AUTHORIZATION, credential_header(&bearer)?)
                .header(ACCEPT, "application/json")
                // `.json` also sets Content-Type: application/json
                .json(body),
        )
    }

    pub fn build_search_request(
        &self,
        request: &LinkupSearchRequest,
    ) -> Result<Request, SearchError> {
        let body = SearchBody {
            q: &request.query,
            depth: request.depth,
            output_type: request.output_type,
            max_results: request.upstream_max_results(),
            from_date: request.from_date.map(format_date),
            to_date: request.to_date.map(format_date),
            include_domains: comma_joined(&request.include_domains),
            exclude_domains: comma_joined(&request.exclude_domains),
        };
        self.post(&self.search_endpoint, &body)
    }

    pub fn build_fetch_request(&self, request: &FetchRequest) -> Result<Request, SearchError> {
        let body = FetchBody {
            url: &request.url,
            output_format: request.output_format,
            render_js: request.render_js,
        };
        self.post(&self.fetch_endpoint, &body)
    }

    pub async fn search(&self, request: &LinkupSearchRequest) -> Result<LinkupOutcome, SearchError> {
        let http = self.build_search_request(request)?;
        log::debug!(
            "linkup search: {:?} depth={} outputType={}",
            request.query,
            request.depth.as_str(),
            request.output_type.as_str()
        );
        let body = self
            .transport
            .send_json(http, search_timeout(request.depth))
            .await?;
        normalize::linkup_outcome(body, request.output_type, request.result_limit as usize)
    }

    pub async fn fetch(&self, request: &FetchRequest) -> Result<FetchResult, SearchError> {
        let http = self.build_fetch_request(request)?;
        log::debug!(
            "linkup fetch: {} format={} renderJS={}",
            request.url,
            request.output_format.as_str(),
            request.render_js
        );
        let body = self.transport.send_json(http, LONG_TIMEOUT).await?;
        normalize::linkup_fetch(body, request)
    }
}
