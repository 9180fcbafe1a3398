//! Provider payloads in, uniform result shapes out.
//!
//! Every provider field is optional on the wire. A missing list is an empty
//! list and a missing string is `""`; only a body of the wrong overall shape
//! is an error.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::data_models::{
    FetchRequest, FetchResult, LinkupOutcome, OutputType, ResultPage, SearchResult, SourcedAnswer,
};
use crate::error::SearchError;

/// Human-readable snippets are cut to this many characters.
pub const SNIPPET_CHAR_LIMIT: usize = 200;

#[derive(Debug, Default, Deserialize)]
struct BraveResponse {
    web: Option<BraveWeb>,
}

#[derive(Debug, Default, Deserialize)]
struct BraveWeb {
    results: Option<Vec<BraveWebResult>>,
}

#[derive(Debug, Default, Deserialize)]
struct BraveWebResult {
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LinkupSearchResponse {
    results: Option<Vec<LinkupSource>>,
}

#[derive(Debug, Default, Deserialize)]
struct LinkupAnswerResponse {
    answer: Option<String>,
    sources: Option<Vec<LinkupSource>>,
}

#[derive(Debug, Default, Deserialize)]
struct LinkupSource {
    name: Option<String>,
    url: Option<String>,
    content: Option<String>,
}

impl From<LinkupSource> for SearchResult {
    fn from(source: LinkupSource) -> Self {
        SearchResult::new(source.name, source.url, source.content)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkupFetchResponse {
    url: Option<String>,
    output_format: Option<String>,
    timestamp: Option<Value>,
    content: Option<String>,
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, SearchError> {
    if !body.is_object() {
        return Err(SearchError::InvalidResponse(format!(
            "expected a JSON object, got {}",
            json_kind(&body)
        )));
    }
    serde_json::from_value(body).map_err(|e| SearchError::InvalidResponse(e.to_string()))
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Keeps provider order and cuts to `limit`.
pub fn truncate_results(results: Vec<SearchResult>, limit: usize) -> ResultPage {
    let total_found = results.len();
    let results = results.into_iter().take(limit).collect();
    ResultPage {
        results,
        total_found,
    }
}

pub fn brave_results(body: Value, limit: usize) -> Result<ResultPage, SearchError> {
    let response: BraveResponse = decode(body)?;
    let results = response
        .web
        .and_then(|w| w.results)
        .unwrap_or_default()
        .into_iter()
        .map(|r| SearchResult::new(r.title, r.url, r.description))
        .collect();
    Ok(truncate_results(results, limit))
}

pub fn linkup_outcome(
    body: Value,
    output_type: OutputType,
    limit: usize,
) -> Result<LinkupOutcome, SearchError> {
    match output_type {
        OutputType::SearchResults => {
            let response: LinkupSearchResponse = decode(body)?;
            let results = response
                .results
                .unwrap_or_default()
                .into_iter()
                .map(SearchResult::from)
                .collect();
            Ok(LinkupOutcome::Results(truncate_results(results, limit)))
        }
        OutputType::SourcedAnswer => {
            let response: LinkupAnswerResponse = decode(body)?;
            let sources = response
                .sources
                .unwrap_or_default()
                .into_iter()
                .take(limit)
                .map(SearchResult::from)
                .collect();
            Ok(LinkupOutcome::Answer(SourcedAnswer {
                answer: response.answer.unwrap_or_default(),
                sources,
            }))
        }
        // Shape is dictated by the caller's schema, so pass it through.
        OutputType::Structured => Ok(LinkupOutcome::Structured(body)),
    }
}

pub fn linkup_fetch(body: Value, request: &FetchRequest) -> Result<FetchResult, SearchError> {
    let response: LinkupFetchResponse = decode(body)?;
    let timestamp = response.timestamp.and_then(|t| match t {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });
    Ok(FetchResult {
        url: response
            .url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| request.url.clone()),
        format: response
            .output_format
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| request.output_format.as_str().to_string()),
        timestamp,
        content: response.content.unwrap_or_default(),
    })
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts on a char boundary and marks the cut with `...`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// The snippet as the text renderer shows it.
pub fn display_snippet(text: &str, max_chars: Option<usize>) -> String {
    let collapsed = collapse_whitespace(text);
    match max_chars {
        Some(max) => truncate_chars(&collapsed, max),
        None => collapsed,
    }
}

#[test]
fn test_truncate_chars_respects_char_boundaries() {
    assert_eq!(truncate_chars("hello", 10), "hello");
    assert_eq!(truncate_chars("hello", 5), "hello");
    assert_eq!(truncate_chars("hello world", 5), "hello...");
    assert_eq!(truncate_chars("ééééé", 2), "éé...");
    assert_eq!(truncate_chars("", 3), "");
}

#[test]
fn test_display_snippet() {
    assert_eq!(display_snippet("  a \n\t b  ", None), "a b");
    let long = "word ".repeat(100);
    let shown = display_snippet(&long, Some(SNIPPET_CHAR_LIMIT));
    assert_eq!(shown.chars().count(), SNIPPET_CHAR_LIMIT + 3);
    assert!(shown.ends_with("..."));
}
