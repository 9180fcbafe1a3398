//! Text and JSON rendering of normalized results.
//!
//! Both modes read the same report value, so they always agree on which
//! results were returned. The text mode collapses whitespace in snippets
//! (and, for some providers, caps their length); the JSON mode carries the
//! full content.

use serde::Serialize;
use serde_json::Value;

use crate::data_models::{
    BRAVE_MAX_COUNT, Depth, FetchRequest, FetchResult, LinkupOutcome, LinkupSearchRequest, OutputFormat,
    OutputType, ResultPage, SearchResult,
};
use crate::error::SearchError;
use crate::normalize::{SNIPPET_CHAR_LIMIT, display_snippet};

const BANNER_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json { OutputMode::Json } else { OutputMode::Text }
    }
}

pub trait Render {
    fn to_json(&self) -> Result<String, SearchError>;
    fn to_text(&self) -> String;

    fn render(&self, mode: OutputMode) -> Result<String, SearchError> {
        match mode {
            OutputMode::Json => self.to_json(),
            OutputMode::Text => Ok(self.to_text()),
        }
    }
}

fn pretty<T: Serialize>(value: &T) -> Result<String, SearchError> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn banner(lines: &[String]) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    format!("\n{rule}\n{}\n{rule}\n\n", lines.join("\n"))
}

fn or_placeholder<'a>(text: &'a str, placeholder: &'a str) -> &'a str {
    if text.is_empty() { placeholder } else { text }
}

/// `1. title / URL / snippet` blocks followed by the count trailer.
fn numbered_results(
    results: &[SearchResult],
    snippet_label: &str,
    snippet_cap: Option<usize>,
) -> String {
    if results.is_empty() {
        return "No results found.\n".to_string();
    }
    let mut out = String::new();
    for (i, result) in results.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, or_placeholder(&result.title, "No title")));
        out.push_str(&format!("   URL: {}\n", result.url));
        let snippet = display_snippet(&result.snippet, snippet_cap);
        if !snippet.is_empty() {
            out.push_str(&format!("   {snippet_label}: {snippet}\n"));
        }
        out.push('\n');
    }
    out.push_str(&format!("Total results displayed: {}\n", results.len()));
    out
}

/// Where a plain result list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    BraveApi,
    BraveWeb,
}

impl Engine {
    pub fn json_name(&self) -> &'static str {
        match self {
            Engine::BraveApi => "brave_search",
            Engine::BraveWeb => "brave_web",
        }
    }

    /// How many results the engine is asked for. The API caps `count`.
    fn requested(&self, result_limit: u32) -> u32 {
        match self {
            Engine::BraveApi => result_limit.min(BRAVE_MAX_COUNT),
            Engine::BraveWeb => result_limit,
        }
    }

    fn source_line(&self) -> &'static str {
        match self {
            Engine::BraveApi => "Using Brave Search API",
            Engine::BraveWeb => "Using search.brave.com result page",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResultListReport {
    pub engine: Engine,
    pub query: String,
    pub result_limit: u32,
    pub page: ResultPage,
}

#[derive(Serialize)]
struct ResultListJson<'a> {
    query: &'a str,
    num_results_requested: u32,
    num_results_found: usize,
    results: Vec<ResultEntryJson<'a>>,
}

#[derive(Serialize)]
struct ResultEntryJson<'a> {
    title: &'a str,
    url: &'a str,
    description: &'a str,
    engine: &'static str,
}

impl Render for ResultListReport {
    fn to_json(&self) -> Result<String, SearchError> {
        pretty(&ResultListJson {
            query: &self.query,
            num_results_requested: self.result_limit,
            num_results_found: self.page.total_found,
            results: self
                .page
                .results
                .iter()
                .map(|r| ResultEntryJson {
                    title: &r.title,
                    url: &r.url,
                    description: &r.snippet,
                    engine: self.engine.json_name(),
                })
                .collect(),
        })
    }

    fn to_text(&self) -> String {
        let mut out = banner(&[
            format!("Brave Search Results for: {}", self.query),
            self.engine.source_line().to_string(),
            format!(
                "Showing up to {} results",
                self.engine.requested(self.result_limit)
            ),
        ]);
        out.push_str(&numbered_results(&self.page.results, "Description", None));
        out
    }
}

#[derive(Debug, Clone)]
pub struct LinkupSearchReport {
    pub request: LinkupSearchRequest,
    pub outcome: LinkupOutcome,
}

#[derive(Serialize)]
struct LinkupSearchJson<'a> {
    mode: &'static str,
    query: &'a str,
    parameters: LinkupParametersJson,
    results: Vec<LinkupResultJson<'a>>,
    error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_found: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    answer: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sources: Option<Vec<LinkupSourceJson<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    structured_data: Option<&'a Value>,
}

#[derive(Serialize)]
struct LinkupParametersJson {
    num_results_requested: u32,
    depth: Depth,
    output_type: OutputType,
}

#[derive(Serialize)]
struct LinkupResultJson<'a> {
    name: &'a str,
    url: &'a str,
    content: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct LinkupSourceJson<'a> {
    name: &'a str,
    url: &'a str,
    content: &'a str,
}

impl<'a> From<&'a SearchResult> for LinkupSourceJson<'a> {
    fn from(r: &'a SearchResult) -> Self {
        LinkupSourceJson {
            name: &r.title,
            url: &r.url,
            content: &r.snippet,
        }
    }
}

impl Render for LinkupSearchReport {
    fn to_json(&self) -> Result<String, SearchError> {
        let mut json = LinkupSearchJson {
            mode: "search",
            query: &self.request.query,
            parameters: LinkupParametersJson {
                num_results_requested: self.request.result_limit,
                depth: self.request.depth,
                output_type: self.request.output_type,
            },
            results: Vec::new(),
            error: false,
            total_found: None,
            answer: None,
            sources: None,
            structured_data: None,
        };
        match &self.outcome {
            LinkupOutcome::Results(page) => {
                json.results = page
                    .results
                    .iter()
                    .map(|r| LinkupResultJson {
                        name: &r.title,
                        url: &r.url,
                        content: &r.snippet,
                        kind: "source",
                    })
                    .collect();
                json.total_found = Some(page.total_found);
            }
            LinkupOutcome::Answer(answer) => {
                json.answer = Some(answer.answer.as_str());
                json.sources = Some(answer.sources.iter().map(LinkupSourceJson::from).collect());
            }
            LinkupOutcome::Structured(data) => json.structured_data = Some(data),
        }
        pretty(&json)
    }

    fn to_text(&self) -> String {
        let request = &self.request;
        let mut out = banner(&[
            format!("Linkup Search Results for: {}", request.query),
            format!(
                "Depth: {}, Output Type: {}",
                request.depth.as_str(),
                request.output_type.as_str()
            ),
            format!("Showing up to {} results", request.upstream_max_results()),
        ]);
        match &self.outcome {
            LinkupOutcome::Results(page) => {
                out.push_str(&numbered_results(
                    &page.results,
                    "Content",
                    Some(SNIPPET_CHAR_LIMIT),
                ));
            }
            LinkupOutcome::Answer(answer) => {
                out.push_str(&format!("Answer:\n{}\n\n", answer.answer));
                if !answer.sources.is_empty() {
                    out.push_str("Sources:\n");
                    for (i, source) in answer.sources.iter().enumerate() {
                        out.push_str(&format!(
                            "  {}. {} ({})\n",
                            i + 1,
                            or_placeholder(&source.title, "Unknown"),
                            source.url
                        ));
                    }
                }
            }
            LinkupOutcome::Structured(data) => out.push_str(&format!("{data:#}\n")),
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct FetchReport {
    pub request: FetchRequest,
    pub result: FetchResult,
}

#[derive(Serialize)]
struct FetchJson<'a> {
    mode: &'static str,
    url: &'a str,
    parameters: FetchParametersJson,
    content: &'a str,
    error: bool,
    output_format: &'a str,
    timestamp: &'a str,
}

#[derive(Serialize)]
struct FetchParametersJson {
    output_format: OutputFormat,
    render_js: bool,
}

impl Render for FetchReport {
    fn to_json(&self) -> Result<String, SearchError> {
        pretty(&FetchJson {
            mode: "fetch",
            url: &self.result.url,
            parameters: FetchParametersJson {
                output_format: self.request.output_format,
                render_js: self.request.render_js,
            },
            content: &self.result.content,
            error: false,
            output_format: &self.result.format,
            timestamp: self.result.timestamp.as_deref().unwrap_or_default(),
        })
    }

    fn to_text(&self) -> String {
        let rule = "-".repeat(BANNER_WIDTH);
        let mut out = banner(&[
            format!("Fetching: {}", self.request.url),
            format!(
                "Format: {}, Render JS: {}",
                self.request.output_format.as_str(),
                self.request.render_js
            ),
        ]);
        out.push_str(&format!("URL: {}\n", self.result.url));
        out.push_str(&format!("Format: {}\n", self.result.format));
        out.push_str(&format!(
            "Timestamp: {}\n",
            self.result.timestamp.as_deref().unwrap_or_default()
        ));
        out.push_str(&format!("\n{rule}\n\n{}\n\n{rule}\n", self.result.content));
        out
    }
}

/// What the failed invocation was about; picks the error's JSON shape.
#[derive(Debug, Clone)]
pub enum ErrorContext {
    Brave { query: String },
    LinkupSearch { query: String },
    LinkupFetch { url: String },
}

#[derive(Debug)]
pub struct ErrorReport<'a> {
    pub context: ErrorContext,
    pub error: &'a SearchError,
}

#[derive(Serialize)]
struct BraveErrorJson<'a> {
    error: bool,
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    message: String,
}

#[derive(Serialize)]
struct LinkupErrorJson<'a> {
    mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    error: bool,
    error_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
}

impl ErrorReport<'_> {
    /// The JSON message leaves the status code to its own key.
    fn message(&self) -> String {
        match self.error {
            SearchError::Api(api) => api.message.clone(),
            other => other.to_string(),
        }
    }
}

impl Render for ErrorReport<'_> {
    fn to_json(&self) -> Result<String, SearchError> {
        let status_code = self.error.status_code();
        match &self.context {
            ErrorContext::Brave { query } => pretty(&BraveErrorJson {
                error: true,
                query: query.as_str(),
                status_code,
                message: self.message(),
            }),
            ErrorContext::LinkupSearch { query } => pretty(&LinkupErrorJson {
                mode: "search",
                query: Some(query.as_str()),
                url: None,
                error: true,
                error_message: self.message(),
                status_code,
            }),
            ErrorContext::LinkupFetch { url } => pretty(&LinkupErrorJson {
                mode: "fetch",
                query: None,
                url: Some(url.as_str()),
                error: true,
                error_message: self.message(),
                status_code,
            }),
        }
    }

    fn to_text(&self) -> String {
        format!("Error: {}\n", self.error)
    }
}
