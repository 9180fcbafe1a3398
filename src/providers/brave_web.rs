use std::collections::HashSet;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Request, Url};
use scraper::{ElementRef, Html, Selector};

use crate::config::Config;
use crate::data_models::{ResultPage, SearchResult, WebSearchRequest};
use crate::error::SearchError;
use crate::normalize::{collapse_whitespace, truncate_results};
use crate::transport::{SEARCH_TIMEOUT, Transport};

use super::{build, endpoint};

pub const BRAVE_WEB_SEARCH_PATH: &str = "/search";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// Result containers, then the pieces inside one.
const CONTAINER: &str = "[data-type='web'], [class*='result']";
// Tried one at a time, first match wins. A selector list would match in
// document order and let a site link ahead of the title link win.
const TITLE_LINKS: [&str; 3] = ["a.l1", "a.result-header", "a[href]"];
const TITLE_TEXT: &str = ".title, .snippet-title";
const DESCRIPTION: &str = ".snippet-description, .description, .snippet-content, p:not(.site-name)";

/// Reads the public result page of search.brave.com. No API key involved.
#[derive(Debug)]
pub struct BraveWebClient {
    transport: Transport,
    endpoint: Url,
}

impl BraveWebClient {
    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        Ok(Self {
            transport: Transport::new()?,
            endpoint: endpoint(&config.brave_web_base_url, BRAVE_WEB_SEARCH_PATH)?,
        })
    }

    pub fn build_request(&self, request: &WebSearchRequest) -> Result<Request, SearchError> {
        build(
            self.transport
                .client()
                .get(self.endpoint.clone())
                .query(&[("q", request.query.as_str()), ("source", "web")])
                .header(USER_AGENT, BROWSER_USER_AGENT)
                .header(ACCEPT, "text/html,application/xhtml+xml")
                .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9"),
        )
    }

    pub async fn search(&self, request: &WebSearchRequest) -> Result<ResultPage, SearchError> {
        let http = self.build_request(request)?;
        let page_url = http.url().clone();
        let html = self.transport.send_text(http, SEARCH_TIMEOUT).await?;
        parse_results(&html, &page_url, request.result_limit as usize)
    }
}

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css)
        .map_err(|e| SearchError::InvalidResponse(format!("bad selector '{css}': {e}")))
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Extracts results from a result page in document order.
///
/// Links are resolved against `page_url`; anything that is not http(s) is
/// skipped, as is a container without both a title and a URL. Nested
/// containers yield the same link more than once, so results are deduped by
/// URL.
pub fn parse_results(
    html: &str,
    page_url: &Url,
    limit: usize,
) -> Result<ResultPage, SearchError> {
    let document = Html::parse_document(html);
    let container_selector = selector(CONTAINER)?;
    let link_selectors = TITLE_LINKS
        .iter()
        .map(|css| selector(css))
        .collect::<Result<Vec<_>, _>>()?;
    let title_selector = selector(TITLE_TEXT)?;
    let description_selector = selector(DESCRIPTION)?;

    let mut seen = HashSet::new();
    let mut results = Vec::new();

    for container in document.select(&container_selector) {
        let Some(link) = link_selectors
            .iter()
            .find_map(|link_selector| container.select(link_selector).next())
        else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Ok(resolved) = page_url.join(href) else {
            continue;
        };
        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            continue;
        }
        // links back into the result page itself are navigation, not results
        if resolved.host_str() == page_url.host_str() && resolved.path() == page_url.path() {
            continue;
        }

        let title = container
            .select(&title_selector)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| element_text(link));
        if title.is_empty() {
            continue;
        }

        let url = resolved.to_string();
        if !seen.insert(url.clone()) {
            continue;
        }

        let snippet = container
            .select(&description_selector)
            .next()
            .map(element_text)
            .unwrap_or_default();

        results.push(SearchResult {
            title,
            url,
            snippet,
        });
    }

    log::debug!("parsed {} results from result page", results.len());
    Ok(truncate_results(results, limit))
}
