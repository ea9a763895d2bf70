//! Network half of the effects, shared by every host.

use std::future::Future;

use common::search_result::{SearchRequest, SearchResponse, SuggestionRequest, SuggestionResponse};

use crate::error::FetchResult;
use crate::event::{ControllerEvent, Effect};

/// The two store contracts a search context consumes.
pub trait SearchBackend {
    fn search(&self, request: SearchRequest) -> impl Future<Output = FetchResult<SearchResponse>>;

    fn suggest(&self, request: SuggestionRequest) -> impl Future<Output = FetchResult<SuggestionResponse>>;
}

/// Runs a fetch effect and returns the event that completes it.
///
/// Address writes, timers and cancellations belong to the host and yield
/// `None`.
pub async fn run_fetch<B: SearchBackend>(backend: &B, effect: Effect) -> Option<ControllerEvent> {
    match effect {
        Effect::FetchPage { ticket, request } => {
            let outcome = backend.search(request).await;
            Some(ControllerEvent::SearchCompleted { ticket, outcome })
        }
        Effect::FetchSuggestions { request_id, request } => {
            let outcome = backend.suggest(request).await;
            Some(ControllerEvent::SuggestionsCompleted { request_id, outcome })
        }
        Effect::WriteAddress { .. } | Effect::CancelFetch { .. } | Effect::StartSuggestionTimer { .. } => None,
    }
}
