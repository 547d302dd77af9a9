use std::env;

/// Environment variable naming the catalog API base URL.
pub const API_URL_VAR: &str = "CATVIEW_API_URL";

const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
}

impl Config {
    /// Resolves configuration from the environment. Read once at startup
    /// and never re-resolved.
    pub fn from_env() -> Self {
        let base_url = env::var(API_URL_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self { base_url }
    }
}
