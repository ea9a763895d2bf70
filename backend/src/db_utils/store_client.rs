//! JSON-over-HTTP client for the college data store.

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use anyhow::Context;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::db_utils::in_flight::InFlight;

static STORE_CLIENT: LazyLock<StoreClient> = LazyLock::new(|| StoreClient::new(StoreConfig::from_env()));

/// Process-wide client configured from the environment.
pub fn store_client() -> &'static StoreClient {
    &STORE_CLIENT
}

pub struct StoreClient {
    config: StoreConfig,
    http: reqwest::Client,
    in_flight: InFlight,
}

impl StoreClient {
    pub fn new(config: StoreConfig) -> Self {
        info!(base_url = %config.base_url, timeout_ms = config.timeout.as_millis() as u64, "college store client");
        Self { config, http: reqwest::Client::new(), in_flight: InFlight::new() }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// POSTs `request` as JSON and decodes the JSON answer. Identical
    /// requests that overlap in time are sent once.
    pub async fn post_json<Req, Resp>(&self, path: &str, request: &Req) -> anyhow::Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let body = serde_json::to_string(request)?;
        let url = self.config.endpoint(path);
        let key = request_key(&url, &body);

        let t0 = Instant::now();
        let http = self.http.clone();
        let timeout = self.config.timeout;
        let text = self.in_flight.run(&key, move || send(http, url, body, timeout)).await?;
        let short_key = &key[..12];
        debug!(path, key = short_key, len = text.len(), dt_ms = t0.elapsed().as_millis() as u64, "store response");

        decode_body(&text)
    }
}

pub fn request_key(url: &str, body: &str) -> String {
    sha256::digest(format!("{url}\n{body}"))
}

async fn send(http: reqwest::Client, url: String, body: String, timeout: Duration) -> anyhow::Result<String> {
    let response = http
        .post(&url)
        .header(CONTENT_TYPE, "application/json")
        .timeout(timeout)
        .body(body)
        .send()
        .await?;
    let status = response.status();
    let text = response.text().await?;
    check_status(status, text)
}

fn check_status(status: StatusCode, text: String) -> anyhow::Result<String> {
    if status.is_client_error() || status.is_server_error() {
        anyhow::bail!("Error: {}: {}", status, text);
    }
    Ok(text)
}

fn decode_body<Resp: DeserializeOwned>(text: &str) -> anyhow::Result<Resp> {
    serde_json::from_str(text).with_context(|| format!("malformed store response ({} bytes)", text.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::search_result::SearchResponse;
    use pretty_assertions::assert_eq;

    #[test]
    fn error_status_carries_body() {
        let err = check_status(StatusCode::BAD_GATEWAY, "upstream down".into()).unwrap_err();
        assert_eq!(err.to_string(), "Error: 502 Bad Gateway: upstream down");
        assert_eq!(check_status(StatusCode::OK, "{}".into()).unwrap(), "{}");
    }

    #[test]
    fn decodes_search_envelope() {
        let text = r#"{
            "success": true,
            "data": [{"id": "coep", "name": "COEP Technological University", "city": "Pune", "state": "Maharashtra", "annualFees": 90000}],
            "pagination": {"page": 1, "pages": 3, "total": 41}
        }"#;
        let response: SearchResponse = decode_body(text).unwrap();
        assert!(response.success);
        assert_eq!(response.data[0].location().as_deref(), Some("Pune, Maharashtra"));
        assert_eq!(response.pagination.total, 41);
    }

    #[test]
    fn malformed_body_is_an_error() {
        let err = decode_body::<SearchResponse>("<html>").unwrap_err();
        assert!(err.to_string().starts_with("malformed store response"));
    }

    #[test]
    fn key_depends_on_url_and_body() {
        let a = request_key("http://s/api/search", r#"{"page":1}"#);
        assert_eq!(a, request_key("http://s/api/search", r#"{"page":1}"#));
        assert_ne!(a, request_key("http://s/api/search", r#"{"page":2}"#));
        assert_ne!(a, request_key("http://s/api/suggest", r#"{"page":1}"#));
        assert_eq!(a.len(), 64);
    }
}
