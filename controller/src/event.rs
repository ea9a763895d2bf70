//! Inputs and outputs of the controller.
//!
//! The controller never performs IO. Hosts feed it [`ControllerEvent`]s and
//! carry out the [`Effect`]s it returns; completions come back as events.

use std::time::Duration;

use common::search_query::{FilterChange, QueryFingerprint};
use common::search_result::{SearchRequest, SearchResponse, Suggestion, SuggestionRequest, SuggestionResponse};

use crate::address::{AddressChange, WriteId, WriteMode};
use crate::error::FetchResult;

/// Identifies one suggestion fetch. Strictly increasing per engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

/// Identifies one armed debounce timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

/// Identifies one paged search fetch and the state it was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub seq: u64,
    pub fingerprint: QueryFingerprint,
}

/// Something the user did on a search surface.
#[derive(Debug, Clone, PartialEq)]
pub enum UserIntent {
    /// Facet toggles, range and sort changes, page changes, clears.
    Filter(FilterChange),
    /// Commit the text typed in the search box.
    SubmitSearch(String),
    /// A keystroke in the search box. Does not touch the filter state.
    PrefixChanged(String),
    SelectSuggestion(Suggestion),
    /// Outside click or escape on the suggestion dropdown.
    DismissSuggestions,
    /// Re-issue the fetch for the current state after a failure.
    Retry,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    User(UserIntent),
    AddressChanged(AddressChange),
    SearchCompleted { ticket: FetchTicket, outcome: FetchResult<SearchResponse> },
    SuggestionTimerElapsed(TimerId),
    SuggestionsCompleted { request_id: RequestId, outcome: FetchResult<SuggestionResponse> },
}

impl From<UserIntent> for ControllerEvent {
    fn from(intent: UserIntent) -> Self {
        ControllerEvent::User(intent)
    }
}

impl From<AddressChange> for ControllerEvent {
    fn from(change: AddressChange) -> Self {
        ControllerEvent::AddressChanged(change)
    }
}

/// Work the host must carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Write `query` to the address. Always self-originated: the host must
    /// deliver the resulting change notification tagged with `write`.
    WriteAddress { query: String, write: WriteId, mode: WriteMode },
    FetchPage { ticket: FetchTicket, request: SearchRequest },
    /// The ticket was superseded. Aborting it is optional; its response is
    /// discarded either way.
    CancelFetch { ticket: FetchTicket },
    StartSuggestionTimer { timer: TimerId, delay: Duration },
    FetchSuggestions { request_id: RequestId, request: SuggestionRequest },
}

impl Effect {
    pub fn is_fetch_page(&self) -> bool {
        matches!(self, Effect::FetchPage { .. })
    }

    pub fn is_address_write(&self) -> bool {
        matches!(self, Effect::WriteAddress { .. })
    }
}
