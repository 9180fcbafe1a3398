use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SearchError;
use crate::validate;

pub const DEFAULT_RESULT_LIMIT: u32 = 10;

/// Largest `count` the Brave Search API accepts.
pub const BRAVE_MAX_COUNT: u32 = 50;
/// Largest `maxResults` the Linkup API accepts.
pub const LINKUP_MAX_RESULTS: u32 = 100;
/// Linkup rejects longer `includeDomains` lists.
pub const LINKUP_MAX_INCLUDE_DOMAINS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    #[default]
    Standard,
    Deep,
}

impl Depth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Depth::Standard => "standard",
            Depth::Deep => "deep",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputType {
    #[default]
    #[value(name = "searchResults")]
    SearchResults,
    #[value(name = "sourcedAnswer")]
    SourcedAnswer,
    #[value(name = "structured")]
    Structured,
}

impl OutputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputType::SearchResults => "searchResults",
            OutputType::SourcedAnswer => "sourcedAnswer",
            OutputType::Structured => "structured",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Html,
    #[default]
    Markdown,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Markdown => "markdown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BraveSearchRequest {
    pub query: String,
    pub result_limit: u32,
    pub country: String,
    pub language: String,
}

impl BraveSearchRequest {
    pub fn new(query: &str, result_limit: u32) -> Result<Self, SearchError> {
        Ok(Self {
            query: validate::query(query)?,
            result_limit: validate::result_limit(result_limit)?,
            country: "us".to_string(),
            language: "en".to_string(),
        })
    }

    /// `count` as transmitted; the rest is cut client-side.
    pub fn upstream_count(&self) -> u32 {
        self.result_limit.min(BRAVE_MAX_COUNT)
    }
}

/// A query against the search engine's public result page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebSearchRequest {
    pub query: String,
    pub result_limit: u32,
}

impl WebSearchRequest {
    pub fn new(query: &str, result_limit: u32) -> Result<Self, SearchError> {
        Ok(Self {
            query: validate::query(query)?,
            result_limit: validate::result_limit(result_limit)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkupSearchRequest {
    pub query: String,
    pub result_limit: u32,
    pub depth: Depth,
    pub output_type: OutputType,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub include_domains: Vec<String>,
    pub exclude_domains: Vec<String>,
}

impl LinkupSearchRequest {
    pub fn new(query: &str, result_limit: u32) -> Result<Self, SearchError> {
        Ok(Self {
            query: validate::query(query)?,
            result_limit: validate::result_limit(result_limit)?,
            depth: Depth::default(),
            output_type: OutputType::default(),
            from_date: None,
            to_date: None,
            include_domains: Vec::new(),
            exclude_domains: Vec::new(),
        })
    }

    pub fn with_depth(mut self, depth: Depth) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_output_type(mut self, output_type: OutputType) -> Self {
        self.output_type = output_type;
        self
    }

    pub fn with_date_range(
        mut self,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> Result<Self, SearchError> {
        validate::date_range(from_date, to_date)?;
        self.from_date = from_date;
        self.to_date = to_date;
        Ok(self)
    }

    pub fn with_domains(mut self, include: Vec<String>, exclude: Vec<String>) -> Self {
        self.include_domains = validate::include_domains(include);
        self.exclude_domains = validate::domains(exclude);
        self
    }

    pub fn upstream_max_results(&self) -> u32 {
        self.result_limit.min(LINKUP_MAX_RESULTS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub output_format: OutputFormat,
    pub render_js: bool,
}

impl FetchRequest {
    pub fn new(url: &str) -> Result<Self, SearchError> {
        Ok(Self {
            url: validate::fetch_url(url)?,
            output_format: OutputFormat::default(),
            render_js: false,
        })
    }

    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    pub fn with_render_js(mut self, render_js: bool) -> Self {
        self.render_js = render_js;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl SearchResult {
    pub fn new(
        title: Option<String>,
        url: Option<String>,
        snippet: Option<String>,
    ) -> SearchResult {
        SearchResult {
            title: title.unwrap_or_default(),
            url: url.unwrap_or_default(),
            snippet: snippet.unwrap_or_default(),
        }
    }
}

/// Results kept after the client-side cut, plus how many the provider sent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultPage {
    pub results: Vec<SearchResult>,
    pub total_found: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourcedAnswer {
    pub answer: String,
    pub sources: Vec<SearchResult>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LinkupOutcome {
    Results(ResultPage),
    Answer(SourcedAnswer),
    Structured(Value),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub url: String,
    pub format: String,
    pub timestamp: Option<String>,
    pub content: String,
}
