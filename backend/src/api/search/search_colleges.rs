//! Paged college search against the store.

use common::search_const::MAX_PAGE_SIZE;
use common::search_result::{SearchRequest, SearchResponse};
use tracing::info;

use crate::api::search::SEARCH_PATH;
use crate::db_utils::store_client::store_client;

pub async fn search_colleges(request: SearchRequest) -> anyhow::Result<SearchResponse> {
    let request = sanitize(request);
    let response: SearchResponse = store_client().post_json(SEARCH_PATH, &request).await?;
    if !response.success {
        anyhow::bail!("store rejected search: {}", response.message.as_deref().unwrap_or("no message"));
    }
    info!(
        page = request.page,
        limit = request.limit,
        hits = response.data.len(),
        total = response.pagination.total,
        "college search"
    );
    Ok(response)
}

/// Keeps requests the store would reject out of the network.
fn sanitize(mut request: SearchRequest) -> SearchRequest {
    request.search = request.search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    request.facets.retain(|_, values| !values.is_empty());
    request.page = request.page.max(1);
    request.limit = request.limit.clamp(1, MAX_PAGE_SIZE);
    request
}
