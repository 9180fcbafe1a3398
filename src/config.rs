use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::fmt;

use crate::error::SearchError;

pub const BRAVE_API_KEY_VAR: &str = "BRAVE_API_KEY";
pub const LINKUP_API_KEY_VAR: &str = "LINKUP_API_KEY";

pub const BRAVE_SIGNUP_URL: &str = "https://api-dashboard.search.brave.com/";
pub const LINKUP_SIGNUP_URL: &str = "https://app.linkup.so/";

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        brave_api_key: get_env_opt(BRAVE_API_KEY_VAR).map(ApiKey::new),
        linkup_api_key: get_env_opt(LINKUP_API_KEY_VAR).map(ApiKey::new),
        brave_api_base_url: get_env_or_default(
            "BRAVE_API_BASE_URL",
            "https://api.search.brave.com",
        ),
        linkup_api_base_url: get_env_or_default("LINKUP_API_BASE_URL", "https://api.linkup.so"),
        brave_web_base_url: get_env_or_default("BRAVE_WEB_BASE_URL", "https://search.brave.com"),
    }
});

#[derive(Debug, Clone)]
pub struct Config {
    pub brave_api_key: Option<ApiKey>,
    pub linkup_api_key: Option<ApiKey>,
    pub brave_api_base_url: String,
    pub linkup_api_base_url: String,
    pub brave_web_base_url: String,
}

impl Config {
    pub fn require_brave_key(&self) -> Result<&ApiKey, SearchError> {
        self.brave_api_key
            .as_ref()
            .ok_or_else(|| SearchError::missing_credential(BRAVE_API_KEY_VAR, BRAVE_SIGNUP_URL))
    }

    pub fn require_linkup_key(&self) -> Result<&ApiKey, SearchError> {
        self.linkup_api_key
            .as_ref()
            .ok_or_else(|| SearchError::missing_credential(LINKUP_API_KEY_VAR, LINKUP_SIGNUP_URL))
    }
}

/// An API credential. Never printed, not even through `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

fn get_env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_env_opt(key).unwrap_or_else(|| default.to_string())
}

#[test]
fn test_api_key_debug_is_redacted() {
    let key = ApiKey::new("sk-very-secret");
    assert_eq!(format!("{key:?}"), "ApiKey(***)");
    assert_eq!(key.expose(), "sk-very-secret");
}
