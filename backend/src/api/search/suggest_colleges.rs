//! Type-ahead suggestions from the store.

use common::search_const::SUGGESTION_MIN_PREFIX_LEN;
use common::search_result::{SuggestionRequest, SuggestionResponse};
use tracing::debug;

use crate::api::search::SUGGEST_PATH;
use crate::db_utils::store_client::store_client;

pub async fn suggest_colleges(request: SuggestionRequest) -> anyhow::Result<SuggestionResponse> {
    let Some(request) = prepare(request) else {
        return Ok(SuggestionResponse { success: true, data: Vec::new(), message: None });
    };
    let response: SuggestionResponse = store_client().post_json(SUGGEST_PATH, &request).await?;
    if !response.success {
        anyhow::bail!("store rejected suggestions: {}", response.message.as_deref().unwrap_or("no message"));
    }
    debug!(prefix = %request.prefix, count = response.data.len(), "college suggestions");
    Ok(response)
}

/// Short prefixes never reach the store.
fn prepare(request: SuggestionRequest) -> Option<SuggestionRequest> {
    let prefix = request.prefix.trim();
    (prefix.chars().count() >= SUGGESTION_MIN_PREFIX_LEN).then(|| SuggestionRequest { prefix: prefix.to_string() })
}
