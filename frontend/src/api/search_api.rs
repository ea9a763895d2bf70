//! Client API calls for search endpoints.

use common::search_result::{SearchRequest, SearchResponse, SuggestionRequest, SuggestionResponse};
use controller::{FetchError, FetchResult, SearchBackend};
use dioxus::prelude::*;

#[server]
pub async fn search_colleges(request: SearchRequest) -> Result<SearchResponse, ServerFnError> {
    let x = backend::api::search::search_colleges(request).await;
    x.map_err(store_error)
}

#[server]
pub async fn suggest_colleges(request: SuggestionRequest) -> Result<SuggestionResponse, ServerFnError> {
    let x = backend::api::search::suggest_colleges(request).await;
    x.map_err(store_error)
}

#[cfg(feature = "server")]
fn store_error(e: anyhow::Error) -> ServerFnError {
    let code = if backend::db_utils::in_flight::is_timeout(&e) { 504 } else { 500 };
    ServerFnError::ServerError { message: format!("{e:#}"), code, details: None }
}

fn fetch_error(e: ServerFnError) -> FetchError {
    match e {
        ServerFnError::ServerError { code: 504, .. } => FetchError::TimedOut,
        ServerFnError::ServerError { message, .. } => FetchError::Rejected(message),
        other => FetchError::Transport(other.to_string()),
    }
}

/// Sends controller fetches through the server functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerFnBackend;

impl SearchBackend for ServerFnBackend {
    async fn search(&self, request: SearchRequest) -> FetchResult<SearchResponse> {
        search_colleges(request).await.map_err(fetch_error)
    }

    async fn suggest(&self, request: SuggestionRequest) -> FetchResult<SuggestionResponse> {
        suggest_colleges(request).await.map_err(fetch_error)
    }
}
