use std::collections::HashMap;

use chrono::NaiveDate;
use reqwest::Request;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use agent_web_search::SearchError;
use agent_web_search::config::{ApiKey, Config};
use agent_web_search::data_models::*;
use agent_web_search::providers::{BraveClient, BraveWebClient, LinkupClient};

mod test_helpers {
    use super::*;

    pub const TEST_KEY: &str = "test-secret-key";

    pub fn test_config() -> Config {
        Config {
            brave_api_key: Some(ApiKey::new(TEST_KEY)),
            linkup_api_key: Some(ApiKey::new(TEST_KEY)),
            brave_api_base_url: "https://api.search.brave.com".to_string(),
            linkup_api_base_url: "https://api.linkup.so/".to_string(),
            brave_web_base_url: "https://search.brave.com".to_string(),
        }
    }

    pub fn query_pairs(request: &Request) -> HashMap<String, String> {
        request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn json_body(request: &Request) -> Value {
        let bytes = request
            .body()
            .and_then(|b| b.as_bytes())
            .expect("request should carry an in-memory body");
        serde_json::from_slice(bytes).unwrap()
    }
}

use test_helpers::*;

#[cfg(test)]
mod brave_request {
    use super::*;

    #[test]
    fn test_get_with_query_params_and_token() {
        let client = BraveClient::from_config(&test_config()).unwrap();
        let request = BraveSearchRequest::new("python tutorials", 5).unwrap();
        let http = client.build_request(&request).unwrap();

        assert_eq!(http.method(), reqwest::Method::GET);
        assert_eq!(http.url().path(), "/res/v1/web/search");
        let params = query_pairs(&http);
        assert_eq!(params["q"], "python tutorials");
        assert_eq!(params["count"], "5");
        assert_eq!(params["country"], "us");
        assert_eq!(params["language"], "en");
        assert_eq!(http.headers()["X-Subscription-Token"], TEST_KEY);
        assert_eq!(http.headers()[ACCEPT], "application/json");
        assert!(http.body().is_none());
    }

    #[test]
    fn test_count_is_clamped_to_provider_max() {
        let client = BraveClient::from_config(&test_config()).unwrap();
        let request = BraveSearchRequest::new("rust", 100).unwrap();
        let http = client.build_request(&request).unwrap();
        assert_eq!(query_pairs(&http)["count"], "50");
    }

    #[test]
    fn test_empty_locale_is_omitted() {
        let client = BraveClient::from_config(&test_config()).unwrap();
        let mut request = BraveSearchRequest::new("rust", 10).unwrap();
        request.country = String::new();
        request.language = String::new();
        let params = query_pairs(&client.build_request(&request).unwrap());
        assert!(!params.contains_key("country"));
        assert!(!params.contains_key("language"));
    }

    #[test]
    fn test_credential_is_sensitive_and_not_in_debug_output() {
        let client = BraveClient::from_config(&test_config()).unwrap();
        let request = BraveSearchRequest::new("rust", 10).unwrap();
        let http = client.build_request(&request).unwrap();
        assert!(http.headers()["X-Subscription-Token"].is_sensitive());
        assert!(!format!("{http:?}").contains(TEST_KEY));
        assert!(!format!("{client:?}").contains(TEST_KEY));
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let mut config = test_config();
        config.brave_api_key = None;
        let err = BraveClient::from_config(&config).unwrap_err();
        assert!(matches!(err, SearchError::Configuration(_)));
        assert!(err.to_string().contains("BRAVE_API_KEY"));
    }

    #[test]
    fn test_key_with_newline_is_rejected() {
        let mut config = test_config();
        config.brave_api_key = Some(ApiKey::new("abc\ndef"));
        let client = BraveClient::from_config(&config).unwrap();
        let request = BraveSearchRequest::new("rust", 10).unwrap();
        assert!(matches!(
            client.build_request(&request),
            Err(SearchError::Configuration(_))
        ));
    }

    #[test]
    fn test_bad_base_url_is_configuration_error() {
        let mut config = test_config();
        config.brave_api_base_url = "not a url".to_string();
        assert!(matches!(
            BraveClient::from_config(&config),
            Err(SearchError::Configuration(_))
        ));
    }
}

#[cfg(test)]
mod linkup_request {
    use super::*;

    #[test]
    fn test_minimal_search_body() {
        let client = LinkupClient::from_config(&test_config()).unwrap();
        let request = LinkupSearchRequest::new("open source licenses", 5).unwrap();
        let http = client.build_search_request(&request).unwrap();

        assert_eq!(http.method(), reqwest::Method::POST);
        assert_eq!(http.url().as_str(), "https://api.linkup.so/v1/search");
        assert_eq!(
            http.headers()[AUTHORIZATION],
            format!("Bearer {TEST_KEY}").as_str()
        );
        assert!(http.headers()[AUTHORIZATION].is_sensitive());
        assert_eq!(http.headers()[CONTENT_TYPE], "application/json");

        let body = json_body(&http);
        assert_eq!(body["q"], "open source licenses");
        assert_eq!(body["depth"], "standard");
        assert_eq!(body["outputType"], "searchResults");
        assert_eq!(body["maxResults"], 5);
        let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 4, "optional filters must be omitted: {keys:?}");
    }

    #[test]
    fn test_full_search_body() {
        let client = LinkupClient::from_config(&test_config()).unwrap();
        let request = LinkupSearchRequest::new("machine learning", 100)
            .unwrap()
            .with_depth(Depth::Deep)
            .with_output_type(OutputType::SourcedAnswer)
            .with_date_range(
                NaiveDate::from_ymd_opt(2024, 1, 1),
                NaiveDate::from_ymd_opt(2024, 12, 31),
            )
            .unwrap()
            .with_domains(
                vec!["arxiv.org".into(), " nature.com ".into(), "".into()],
                vec!["pinterest.com".into()],
            );
        let body = json_body(&client.build_search_request(&request).unwrap());

        assert_eq!(body["depth"], "deep");
        assert_eq!(body["outputType"], "sourcedAnswer");
        assert_eq!(body["maxResults"], 100);
        assert_eq!(body["fromDate"], "2024-01-01");
        assert_eq!(body["toDate"], "2024-12-31");
        assert_eq!(body["includeDomains"], "arxiv.org,nature.com");
        assert_eq!(body["excludeDomains"], "pinterest.com");
    }

    #[test]
    fn test_include_domains_capped_at_100() {
        let client = LinkupClient::from_config(&test_config()).unwrap();
        let domains = (0..150).map(|i| format!("d{i}.example")).collect();
        let request = LinkupSearchRequest::new("q", 10)
            .unwrap()
            .with_domains(domains, Vec::new());
        let body = json_body(&client.build_search_request(&request).unwrap());
        let sent = body["includeDomains"].as_str().unwrap();
        assert_eq!(sent.split(',').count(), 100);
        assert!(body.get("excludeDomains").is_none());
    }

    #[test]
    fn test_exclude_domains_are_not_capped() {
        let client = LinkupClient::from_config(&test_config()).unwrap();
        let excluded: Vec<String> = (0..150).map(|i| format!("x{i}.example")).collect();
        let request = LinkupSearchRequest::new("q", 10)
            .unwrap()
            .with_domains(Vec::new(), excluded);
        assert_eq!(request.exclude_domains.len(), 150);
        let body = json_body(&client.build_search_request(&request).unwrap());
        let sent = body["excludeDomains"].as_str().unwrap();
        assert_eq!(sent.split(',').count(), 150);
        assert!(body.get("includeDomains").is_none());
    }

    #[test]
    fn test_fetch_body_omits_render_js_when_false() {
        let client = LinkupClient::from_config(&test_config()).unwrap();
        let request = FetchRequest::new("https://example.com").unwrap();
        let http = client.build_fetch_request(&request).unwrap();
        assert_eq!(http.url().path(), "/v1/fetch");

        let body = json_body(&http);
        assert_eq!(body["url"], "https://example.com/");
        assert_eq!(body["outputFormat"], "markdown");
        assert!(body.get("renderJS").is_none());
    }

    #[test]
    fn test_fetch_body_with_render_js() {
        let client = LinkupClient::from_config(&test_config()).unwrap();
        let request = FetchRequest::new("https://example.com/page")
            .unwrap()
            .with_output_format(OutputFormat::Html)
            .with_render_js(true);
        let body = json_body(&client.build_fetch_request(&request).unwrap());
        assert_eq!(body["outputFormat"], "html");
        assert_eq!(body["renderJS"], true);
    }

    #[test]
    fn test_deep_search_gets_the_long_timeout() {
        use agent_web_search::providers::linkup::search_timeout;
        use agent_web_search::transport::{LONG_TIMEOUT, SEARCH_TIMEOUT};
        assert_eq!(search_timeout(Depth::Standard), SEARCH_TIMEOUT);
        assert_eq!(search_timeout(Depth::Deep), LONG_TIMEOUT);
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let mut config = test_config();
        config.linkup_api_key = None;
        let err = LinkupClient::from_config(&config).unwrap_err();
        assert!(matches!(err, SearchError::Configuration(_)));
        assert!(err.to_string().contains("LINKUP_API_KEY"));
    }
}

#[cfg(test)]
mod request_validation {
    use super::*;

    #[test]
    fn test_result_limit_bounds() {
        assert!(BraveSearchRequest::new("q", 0).is_err());
        assert!(BraveSearchRequest::new("q", 1).is_ok());
        assert!(BraveSearchRequest::new("q", 100).is_ok());
        assert!(LinkupSearchRequest::new("q", 101).is_err());
    }

    #[test]
    fn test_empty_query_rejected() {
        assert!(matches!(
            WebSearchRequest::new("   ", 10),
            Err(SearchError::Validation(_))
        ));
    }

    #[test]
    fn test_query_is_trimmed_but_inner_whitespace_kept() {
        let request = BraveSearchRequest::new("  a\t\tb  ", 10).unwrap();
        assert_eq!(request.query, "a\t\tb");
    }

    #[test]
    fn test_inverted_date_range_rejected() {
        let result = LinkupSearchRequest::new("q", 10).unwrap().with_date_range(
            NaiveDate::from_ymd_opt(2025, 1, 1),
            NaiveDate::from_ymd_opt(2024, 1, 1),
        );
        assert!(matches!(result, Err(SearchError::Validation(_))));
    }

    #[test]
    fn test_fetch_url_must_be_http() {
        assert!(FetchRequest::new("ftp://example.com/file").is_err());
        assert!(FetchRequest::new("example.com").is_err());
        assert!(FetchRequest::new("http://example.com").is_ok());
    }
}

#[test]
fn test_web_request_has_browser_headers_and_no_credential() {
    let client = BraveWebClient::from_config(&test_config()).unwrap();
    let request = WebSearchRequest::new("rust async", 10).unwrap();
    let http = client.build_request(&request).unwrap();
    assert_eq!(http.url().path(), "/search");
    assert_eq!(query_pairs(&http)["q"], "rust async");
    assert!(
        http.headers()[reqwest::header::USER_AGENT]
            .to_str()
            .unwrap()
            .starts_with("Mozilla/5.0")
    );
    assert!(!http.headers().contains_key("X-Subscription-Token"));
    assert!(!http.headers().contains_key(AUTHORIZATION));
}
