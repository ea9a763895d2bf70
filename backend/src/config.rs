//! Store connection settings, read from the environment.

use std::time::Duration;

pub const STORE_URL_VAR: &str = "COLLEGE_STORE_URL";
pub const STORE_TIMEOUT_VAR: &str = "COLLEGE_STORE_TIMEOUT_MS";

const DEFAULT_STORE_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_STORE_URL.to_string(), timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS) }
    }
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank or unparsable values
    /// fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let base_url = lookup(STORE_URL_VAR)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.base_url);
        let timeout = lookup(STORE_TIMEOUT_VAR)
            .and_then(|ms| ms.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.timeout);
        Self { base_url, timeout }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
