//! Turns raw CLI tokens into values the request types accept.
//!
//! The `parse_*` functions have the shape clap's `value_parser` expects, so
//! the binaries reject bad input before any client is built.

use chrono::NaiveDate;
use reqwest::Url;

use crate::data_models::LINKUP_MAX_INCLUDE_DOMAINS;
use crate::error::SearchError;

pub const MIN_RESULT_LIMIT: u32 = 1;
pub const MAX_RESULT_LIMIT: u32 = 100;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Trims the ends only; whitespace inside the query is sent as typed.
pub fn query(raw: &str) -> Result<String, SearchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SearchError::Validation("Query cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Multi-token positional queries are joined with single spaces.
pub fn join_query(tokens: &[String]) -> Result<String, SearchError> {
    query(&tokens.join(" "))
}

pub fn result_limit(n: u32) -> Result<u32, SearchError> {
    if n < MIN_RESULT_LIMIT {
        return Err(SearchError::Validation(
            "Number of results must be at least 1".to_string(),
        ));
    }
    if n > MAX_RESULT_LIMIT {
        return Err(SearchError::Validation(
            "Number of results cannot exceed 100".to_string(),
        ));
    }
    Ok(n)
}

pub fn parse_result_limit(raw: &str) -> Result<u32, SearchError> {
    let n = raw.trim().parse::<i64>().map_err(|_| {
        SearchError::Validation(format!("Number of results must be an integer, got '{raw}'"))
    })?;
    if n < MIN_RESULT_LIMIT as i64 {
        return result_limit(0);
    }
    result_limit(u32::try_from(n).unwrap_or(u32::MAX))
}

/// Accepts exactly `YYYY-MM-DD` naming a real calendar day.
pub fn parse_date(raw: &str) -> Result<NaiveDate, SearchError> {
    let invalid = || SearchError::Validation(format!("Invalid date '{raw}'. Use YYYY-MM-DD"));
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<(), SearchError> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(SearchError::Validation(format!(
            "from-date {} is after to-date {}",
            format_date(from),
            format_date(to)
        ))),
        _ => Ok(()),
    }
}

/// Trims each entry and drops blanks.
pub fn domains(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect()
}

/// Linkup accepts at most 100 included domains; exclusions are not capped.
pub fn include_domains(raw: Vec<String>) -> Vec<String> {
    let mut kept = domains(raw);
    kept.truncate(LINKUP_MAX_INCLUDE_DOMAINS);
    kept
}

pub fn fetch_url(raw: &str) -> Result<String, SearchError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| SearchError::Validation(format!("Invalid URL '{raw}': {e}")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(SearchError::Validation(format!(
            "Unsupported URL scheme '{}', expected http or https",
            url.scheme()
        )));
    }
    Ok(url.to_string())
}

#[test]
fn test_parse_date() {
    assert_eq!(
        parse_date("2024-01-01").ok(),
        NaiveDate::from_ymd_opt(2024, 1, 1)
    );
    assert!(parse_date("01-01-2024").is_err());
    assert!(parse_date("2024-1-1").is_err());
    assert!(parse_date("2024-02-30").is_err());
    assert!(parse_date("2024/01/01").is_err());
    assert!(parse_date("").is_err());
}

#[test]
fn test_parse_result_limit() {
    assert_eq!(parse_result_limit("1").ok(), Some(1));
    assert_eq!(parse_result_limit("100").ok(), Some(100));
    assert!(parse_result_limit("0").is_err());
    assert!(parse_result_limit("-3").is_err());
    assert!(parse_result_limit("101").is_err());
    assert!(parse_result_limit("99999999999").is_err());
    assert!(parse_result_limit("ten").is_err());
}
