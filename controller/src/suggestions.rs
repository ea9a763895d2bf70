//! Debounced type-ahead suggestions.
//!
//! Each qualifying keystroke arms a new timer and forgets the previous one;
//! only the newest timer may issue a fetch. Each fetch gets a strictly
//! increasing [`RequestId`] and only the newest response is shown.

use std::time::Duration;

use common::search_result::{Suggestion, SuggestionRequest, SuggestionResponse};
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};
use crate::event::{Effect, RequestId, TimerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionOutcome {
    Applied,
    /// Newest response, but the dropdown is closed so nothing is rendered.
    Hidden,
    /// Degraded to an empty list.
    Failed,
    Discarded,
}

#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    min_prefix_len: usize,
    debounce: Duration,
    prefix: String,
    next_timer: u64,
    armed_timer: Option<TimerId>,
    next_request: u64,
    latest_request: Option<RequestId>,
    open: bool,
    suggestions: Vec<Suggestion>,
}

impl SuggestionEngine {
    pub fn new(min_prefix_len: usize, debounce: Duration) -> Self {
        Self {
            min_prefix_len,
            debounce,
            prefix: String::new(),
            next_timer: 0,
            armed_timer: None,
            next_request: 0,
            latest_request: None,
            open: false,
            suggestions: Vec::new(),
        }
    }

    pub fn on_prefix_change(&mut self, prefix: &str) -> Option<Effect> {
        self.prefix = prefix.to_string();
        if prefix.trim().chars().count() < self.min_prefix_len {
            self.armed_timer = None;
            self.suggestions.clear();
            self.open = false;
            return None;
        }
        self.next_timer += 1;
        let timer = TimerId(self.next_timer);
        self.armed_timer = Some(timer);
        self.open = true;
        Some(Effect::StartSuggestionTimer { timer, delay: self.debounce })
    }

    pub fn on_timer_elapsed(&mut self, timer: TimerId) -> Option<Effect> {
        if self.armed_timer != Some(timer) {
            return None;
        }
        self.armed_timer = None;
        self.next_request += 1;
        let request_id = RequestId(self.next_request);
        self.latest_request = Some(request_id);
        let prefix = self.prefix.trim().to_string();
        debug!(request_id = request_id.0, %prefix, "issuing suggestion fetch");
        Some(Effect::FetchSuggestions { request_id, request: SuggestionRequest { prefix } })
    }

    pub fn on_response(&mut self, request_id: RequestId, outcome: FetchResult<SuggestionResponse>) -> SuggestionOutcome {
        if self.latest_request != Some(request_id) {
            debug!(request_id = request_id.0, "discarding stale suggestions");
            return SuggestionOutcome::Discarded;
        }
        if !self.open {
            return SuggestionOutcome::Hidden;
        }
        let outcome = outcome.and_then(|response| {
            if response.success {
                Ok(response.data)
            } else {
                Err(FetchError::Rejected(response.message.unwrap_or_else(|| "unsuccessful response".to_string())))
            }
        });
        match outcome {
            Ok(data) => {
                self.suggestions = data;
                SuggestionOutcome::Applied
            }
            Err(error) => {
                warn!(request_id = request_id.0, %error, "suggestion fetch failed");
                self.suggestions.clear();
                SuggestionOutcome::Failed
            }
        }
    }

    /// Closes the dropdown. A pending debounce is dropped, in-flight fetches
    /// are left alone.
    pub fn dismiss(&mut self) {
        self.open = false;
        self.armed_timer = None;
    }

    /// Commits a suggestion and returns the label to search for.
    pub fn select(&mut self, suggestion: &Suggestion) -> String {
        self.dismiss();
        self.suggestions.clear();
        self.prefix = suggestion.label.clone();
        suggestion.label.clone()
    }

    /// Mirrors committed free text into the input without fetching.
    pub fn sync_prefix(&mut self, text: &str) {
        self.prefix = text.to_string();
        self.dismiss();
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// What the dropdown should show right now.
    pub fn visible(&self) -> &[Suggestion] {
        if self.open { &self.suggestions } else { &[] }
    }
}
