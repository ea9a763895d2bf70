//! Keeps the filter state, the address and the result pager in step.
//!
//! The synchronizer owns the only [`FilterState`] of a search context. User
//! intents produce a new version, one self-originated address write and one
//! fetch. Address changes tagged with the synchronizer's own pending write
//! are echoes and are dropped; any other address change is decoded and
//! replaces the state. Fetch completions never write the address.

use std::sync::Arc;

use common::query_codec::QueryCodec;
use common::search_query::{normalize_free_text, FilterChange, FilterState};
use common::search_result::SearchResponse;
use tracing::debug;

use crate::address::{bare_query, AddressChange, AddressOrigin, WriteId, WriteMode};
use crate::config::ControllerConfig;
use crate::error::FetchResult;
use crate::event::{ControllerEvent, Effect, FetchTicket, UserIntent};
use crate::pager::{PagerOutcome, ResultPager};
use crate::suggestions::SuggestionEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    ApplyingUserChange,
    ApplyingExternalChange,
    Fetching,
}

/// One immutable version of the filter state.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub version: u64,
    pub state: Arc<FilterState>,
}

#[derive(Debug, Clone)]
pub struct Synchronizer {
    codec: QueryCodec,
    current: Snapshot,
    phase: SyncPhase,
    next_write: u64,
    pending_write: Option<(WriteId, String)>,
    pager: ResultPager,
    suggestions: SuggestionEngine,
}

impl Synchronizer {
    pub fn new(config: &ControllerConfig) -> Self {
        let codec = config.codec();
        let state = Arc::new(codec.empty_state());
        Self {
            codec,
            current: Snapshot { version: 0, state },
            phase: SyncPhase::Idle,
            next_write: 0,
            pending_write: None,
            pager: ResultPager::new(),
            suggestions: SuggestionEngine::new(config.suggestion_min_prefix_len, config.suggestion_debounce()),
        }
    }

    /// Loads the state from the address the page was opened with and issues
    /// the first fetch. A non-canonical address is replaced by its
    /// canonical form.
    pub fn start(&mut self, address: &str) -> Vec<Effect> {
        self.apply_external(address)
    }

    pub fn handle(&mut self, event: impl Into<ControllerEvent>) -> Vec<Effect> {
        match event.into() {
            ControllerEvent::User(intent) => self.on_user_intent(intent),
            ControllerEvent::AddressChanged(change) => self.on_address_change(change),
            ControllerEvent::SearchCompleted { ticket, outcome } => self.on_search_completed(ticket, outcome),
            ControllerEvent::SuggestionTimerElapsed(timer) => self.suggestions.on_timer_elapsed(timer).into_iter().collect(),
            ControllerEvent::SuggestionsCompleted { request_id, outcome } => {
                self.suggestions.on_response(request_id, outcome);
                Vec::new()
            }
        }
    }

    fn on_user_intent(&mut self, intent: UserIntent) -> Vec<Effect> {
        match intent {
            UserIntent::Filter(change) => self.apply_user_change(change),
            UserIntent::SubmitSearch(text) => {
                self.suggestions.sync_prefix(&normalize_free_text(&text));
                self.apply_user_change(FilterChange::SetFreeText(text))
            }
            UserIntent::PrefixChanged(prefix) => self.suggestions.on_prefix_change(&prefix).into_iter().collect(),
            UserIntent::SelectSuggestion(suggestion) => {
                let label = self.suggestions.select(&suggestion);
                self.apply_user_change(FilterChange::SetFreeText(label))
            }
            UserIntent::DismissSuggestions => {
                self.suggestions.dismiss();
                Vec::new()
            }
            UserIntent::Retry => self.begin_fetch(),
        }
    }

    fn apply_user_change(&mut self, change: FilterChange) -> Vec<Effect> {
        let resume = self.phase;
        self.transition(SyncPhase::ApplyingUserChange);

        let change = self.clamp_page(change);
        let next = self.current.state.apply(&change, self.codec.vocabulary());
        if next == *self.current.state {
            debug!(?change, "change leaves state untouched");
            self.transition(resume);
            return Vec::new();
        }

        self.commit(next);
        let query = self.codec.encode(&self.current.state);
        let mut effects = vec![self.write_address(query, WriteMode::Push)];
        effects.extend(self.begin_fetch());
        effects
    }

    fn on_address_change(&mut self, change: AddressChange) -> Vec<Effect> {
        match change.origin {
            AddressOrigin::SelfOriginated(write) => {
                match &self.pending_write {
                    Some((pending, _)) if *pending == write => {
                        debug!(write = write.0, "consumed own address write");
                        self.pending_write = None;
                    }
                    _ => debug!(write = write.0, "ignoring echo of superseded address write"),
                }
                Vec::new()
            }
            AddressOrigin::External(kind) => {
                debug!(?kind, query = %change.query, "external address change");
                self.apply_external(&change.query)
            }
        }
    }

    fn apply_external(&mut self, query: &str) -> Vec<Effect> {
        let resume = self.phase;
        self.transition(SyncPhase::ApplyingExternalChange);

        let (decoded, anomalies) = self.codec.decode_reporting(query);
        for anomaly in &anomalies {
            debug!(%anomaly, "dropped from address");
        }

        let canonical = self.codec.encode(&decoded);
        let mut effects = Vec::new();
        let changed = decoded != *self.current.state || self.current.version == 0;
        if changed {
            self.commit(decoded);
            self.suggestions.sync_prefix(&self.current.state.free_text);
        }
        if canonical != bare_query(query) {
            effects.push(self.write_address(canonical, WriteMode::Replace));
        }
        if changed {
            effects.extend(self.begin_fetch());
        } else {
            self.transition(resume);
        }
        effects
    }

    fn on_search_completed(&mut self, ticket: FetchTicket, outcome: FetchResult<SearchResponse>) -> Vec<Effect> {
        let current = self.current.state.fingerprint();
        let result = self.pager.complete(&ticket, outcome, &current);
        debug!(seq = ticket.seq, ?result, "page fetch completed");
        if result != PagerOutcome::Discarded && !self.pager.is_loading() {
            self.transition(SyncPhase::Idle);
        }
        Vec::new()
    }

    fn begin_fetch(&mut self) -> Vec<Effect> {
        let issued = self.pager.issue(&self.current.state);
        let mut effects = issued
            .superseded
            .into_iter()
            .map(|ticket| Effect::CancelFetch { ticket })
            .collect::<Vec<_>>();
        effects.push(Effect::FetchPage { ticket: issued.ticket, request: issued.request });
        self.transition(SyncPhase::Fetching);
        effects
    }

    fn write_address(&mut self, query: String, mode: WriteMode) -> Effect {
        self.next_write += 1;
        let write = WriteId(self.next_write);
        self.pending_write = Some((write, query.clone()));
        Effect::WriteAddress { query, write, mode }
    }

    fn commit(&mut self, state: FilterState) {
        self.current = Snapshot { version: self.current.version + 1, state: Arc::new(state) };
        debug!(version = self.current.version, fingerprint = %self.current.state.fingerprint(), "committed filter state");
    }

    fn clamp_page(&self, change: FilterChange) -> FilterChange {
        let FilterChange::SetPage(page) = change else {
            return change;
        };
        let total = self.pager.total_pages_for(&self.current.state.fingerprint()).filter(|total| *total > 0);
        FilterChange::SetPage(match total {
            Some(total) => page.clamp(1, total),
            None => page.max(1),
        })
    }

    fn transition(&mut self, next: SyncPhase) {
        if self.phase != next {
            debug!(from = ?self.phase, to = ?next, "phase");
            self.phase = next;
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn snapshot(&self) -> Snapshot {
        self.current.clone()
    }

    pub fn state(&self) -> Arc<FilterState> {
        Arc::clone(&self.current.state)
    }

    pub fn version(&self) -> u64 {
        self.current.version
    }

    /// Encoded form of the current state, as it should appear in the address.
    pub fn current_query(&self) -> String {
        self.codec.encode(&self.current.state)
    }

    pub fn codec(&self) -> &QueryCodec {
        &self.codec
    }

    pub fn pager(&self) -> &ResultPager {
        &self.pager
    }

    pub fn suggestions(&self) -> &SuggestionEngine {
        &self.suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::facets::{CategoricalFacet, SortMode};
    use common::search_result::{Pagination, Suggestion};
    use pretty_assertions::assert_eq;

    fn started(address: &str) -> (Synchronizer, Vec<Effect>) {
        let mut sync = Synchronizer::new(&ControllerConfig::default());
        let effects = sync.start(address);
        (sync, effects)
    }

    fn fetch_ticket(effects: &[Effect]) -> FetchTicket {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::FetchPage { ticket, .. } => Some(ticket.clone()),
                _ => None,
            })
            .expect("a page fetch")
    }

    fn pages(total: u32) -> SearchResponse {
        SearchResponse {
            success: true,
            data: vec![],
            pagination: Pagination { page: 1, pages: total, total: u64::from(total) * 20 },
            message: None,
        }
    }

    fn toggle(facet: CategoricalFacet, value: &str) -> UserIntent {
        UserIntent::Filter(FilterChange::ToggleValue { facet, value: value.into() })
    }

    #[test]
    fn start_fetches_once_without_writing_canonical_address() {
        let (sync, effects) = started("?stream=Engineering");
        assert_eq!(effects.len(), 1);
        assert!(effects[0].is_fetch_page());
        assert_eq!(sync.phase(), SyncPhase::Fetching);
        assert_eq!(sync.version(), 1);
    }

    #[test]
    fn start_replaces_non_canonical_address() {
        let (_, effects) = started("?sort=bogus&city=pune");
        assert_eq!(
            effects[0],
            Effect::WriteAddress { query: "city=Pune".into(), write: WriteId(1), mode: WriteMode::Replace }
        );
        assert!(effects[1].is_fetch_page());
    }

    #[test]
    fn completion_returns_to_idle() {
        let (mut sync, effects) = started("");
        let ticket = fetch_ticket(&effects);
        let follow_up = sync.handle(ControllerEvent::SearchCompleted { ticket, outcome: Ok(pages(3)) });
        assert!(follow_up.is_empty());
        assert_eq!(sync.phase(), SyncPhase::Idle);
        assert_eq!(sync.pager().page().map(|p| p.total_pages), Some(3));
    }

    #[test]
    fn no_op_change_emits_nothing() {
        let (mut sync, _) = started("city=Pune");
        let version = sync.version();
        assert!(sync.handle(toggle(CategoricalFacet::City, "Gotham")).is_empty());
        assert!(sync.handle(UserIntent::Filter(FilterChange::SetSort(SortMode::Popularity))).is_empty());
        assert_eq!(sync.version(), version);
    }

    #[test]
    fn page_requests_are_clamped_to_known_total() {
        let (mut sync, effects) = started("stream=Law");
        sync.handle(ControllerEvent::SearchCompleted { ticket: fetch_ticket(&effects), outcome: Ok(pages(4)) });

        let effects = sync.handle(UserIntent::Filter(FilterChange::SetPage(9)));
        assert_eq!(sync.state().page, 4);
        assert_eq!(
            effects[0],
            Effect::WriteAddress { query: "stream=Law&page=4".into(), write: WriteId(1), mode: WriteMode::Push }
        );
    }

    #[test]
    fn retry_refetches_without_writing() {
        let (mut sync, effects) = started("");
        let ticket = fetch_ticket(&effects);
        sync.handle(ControllerEvent::SearchCompleted {
            ticket,
            outcome: Err(crate::error::FetchError::Transport("down".into())),
        });
        assert!(sync.pager().failure().is_some());
        assert_eq!(sync.phase(), SyncPhase::Idle);

        let effects = sync.handle(UserIntent::Retry);
        assert_eq!(effects.len(), 1);
        assert!(effects[0].is_fetch_page());
        assert!(sync.pager().failure().is_none());
    }

    #[test]
    fn selecting_suggestion_commits_label_on_page_one() {
        let (mut sync, _) = started("page=3&stream=Medical");
        let effects = sync.handle(UserIntent::SelectSuggestion(Suggestion {
            id: "aiims-delhi".into(),
            label: "AIIMS New Delhi".into(),
            location_hint: Some("New Delhi".into()),
            type_hint: Some("college".into()),
        }));

        assert_eq!(sync.state().free_text, "AIIMS New Delhi");
        assert_eq!(sync.state().page, 1);
        assert_eq!(effects.iter().filter(|e| e.is_address_write()).count(), 1);
        assert_eq!(effects.iter().filter(|e| e.is_fetch_page()).count(), 1);
        assert!(!sync.suggestions().is_open());
    }

    #[test]
    fn keystrokes_do_not_touch_filter_state() {
        let (mut sync, _) = started("");
        let effects = sync.handle(UserIntent::PrefixChanged("iit".into()));
        assert!(matches!(effects.as_slice(), [Effect::StartSuggestionTimer { .. }]));
        assert_eq!(sync.version(), 1);
        assert_eq!(sync.state().free_text, "");
    }

    #[test]
    fn snapshots_are_not_affected_by_later_changes() {
        let (mut sync, _) = started("");
        let before = sync.snapshot();
        sync.handle(toggle(CategoricalFacet::State, "Kerala"));
        assert!(before.state.categorical.is_empty());
        assert_eq!(sync.snapshot().version, before.version + 1);
    }

    #[test]
    fn submitted_text_is_mirrored_in_its_stored_form() {
        let (mut sync, _) = started("");
        sync.handle(UserIntent::PrefixChanged("  iit   bombay ".into()));
        let effects = sync.handle(UserIntent::SubmitSearch("  iit   bombay ".into()));

        assert_eq!(sync.state().free_text, "iit bombay");
        assert_eq!(sync.suggestions().prefix(), "iit bombay");
        assert_eq!(effects.iter().filter(|e| e.is_fetch_page()).count(), 1);
    }
}
