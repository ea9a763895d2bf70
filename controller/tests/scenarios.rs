//! End-to-end behaviour of a search context against an in-memory history.

use std::collections::BTreeMap;

use common::facets::{CategoricalFacet, SortMode};
use common::search_query::FilterChange;
use common::search_result::{CollegeSummary, Pagination, SearchRequest, SearchResponse, SuggestionRequest};
use controller::{
    Address, ControllerConfig, ControllerEvent, Effect, FetchTicket, MemoryAddress, RequestId, SyncPhase, Synchronizer,
    TimerId, UserIntent, WriteMode,
};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct Recorded {
    writes: Vec<(String, WriteMode)>,
    fetches: Vec<(FetchTicket, SearchRequest)>,
    cancelled: Vec<FetchTicket>,
    timers: Vec<TimerId>,
    suggestion_fetches: Vec<(RequestId, SuggestionRequest)>,
}

struct Harness {
    sync: Synchronizer,
    address: MemoryAddress,
    recorded: Recorded,
}

impl Harness {
    fn open(initial: &str) -> Self {
        let address = MemoryAddress::new(initial);
        let mut sync = Synchronizer::new(&ControllerConfig::default());
        let effects = sync.start(&address.read_current());
        let mut harness = Self { sync, address, recorded: Recorded::default() };
        harness.run(effects);
        harness
    }

    fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::WriteAddress { query, write, mode } => {
                    self.address.write(&query, write, mode);
                    self.recorded.writes.push((query, mode));
                }
                Effect::FetchPage { ticket, request } => self.recorded.fetches.push((ticket, request)),
                Effect::CancelFetch { ticket } => self.recorded.cancelled.push(ticket),
                Effect::StartSuggestionTimer { timer, .. } => self.recorded.timers.push(timer),
                Effect::FetchSuggestions { request_id, request } => {
                    self.recorded.suggestion_fetches.push((request_id, request))
                }
            }
        }
        // Navigation callbacks fire after the current handler returns.
        for change in self.address.take_changes() {
            let effects = self.sync.handle(change);
            self.run(effects);
        }
    }

    fn user(&mut self, intent: UserIntent) {
        let effects = self.sync.handle(intent);
        self.run(effects);
    }

    fn toggle(&mut self, facet: CategoricalFacet, value: &str) {
        self.user(UserIntent::Filter(FilterChange::ToggleValue { facet, value: value.into() }));
    }

    fn back(&mut self) {
        assert!(self.address.back());
        self.run(Vec::new());
    }

    fn forward(&mut self) {
        assert!(self.address.forward());
        self.run(Vec::new());
    }

    fn complete(&mut self, ticket: &FetchTicket, label: &str) {
        let effects = self.sync.handle(ControllerEvent::SearchCompleted { ticket: ticket.clone(), outcome: Ok(page_of(label)) });
        self.run(effects);
    }

    fn last_fetch(&self) -> &(FetchTicket, SearchRequest) {
        self.recorded.fetches.last().expect("at least one fetch")
    }

    fn shown(&self) -> Option<String> {
        self.sync.pager().page().map(|page| page.items[0].name.clone())
    }
}

fn page_of(label: &str) -> SearchResponse {
    SearchResponse {
        success: true,
        data: vec![CollegeSummary {
            id: label.to_lowercase(),
            name: label.to_string(),
            city: None,
            state: None,
            ownership: None,
            rating: Some(4.2),
            annual_fees: Some(150_000),
            streams: vec!["Engineering".into()],
        }],
        pagination: Pagination { page: 1, pages: 5, total: 96 },
        message: None,
    }
}

fn facets(pairs: &[(CategoricalFacet, &[&str])]) -> BTreeMap<CategoricalFacet, Vec<String>> {
    pairs
        .iter()
        .map(|(facet, values)| (*facet, values.iter().map(|v| v.to_string()).collect()))
        .collect()
}

#[test]
fn user_change_writes_once_and_fetches_once() {
    let mut harness = Harness::open("");
    let writes_before = harness.recorded.writes.len();
    let fetches_before = harness.recorded.fetches.len();

    harness.toggle(CategoricalFacet::Degree, "MBA");

    assert_eq!(harness.recorded.writes.len() - writes_before, 1);
    assert_eq!(harness.recorded.fetches.len() - fetches_before, 1);
    assert_eq!(harness.address.read_current(), "degree=MBA");
    assert_eq!(harness.sync.phase(), SyncPhase::Fetching);
}

#[test]
fn stale_response_never_overwrites_newer_one() {
    let mut harness = Harness::open("");
    harness.toggle(CategoricalFacet::City, "Pune");
    let pune = harness.last_fetch().0.clone();
    harness.toggle(CategoricalFacet::City, "Mumbai");
    let pune_and_mumbai = harness.last_fetch().0.clone();

    harness.complete(&pune_and_mumbai, "Newest");
    harness.complete(&pune, "Stale");

    assert_eq!(harness.shown(), Some("Newest".to_string()));
    assert!(harness.recorded.cancelled.contains(&pune));
    assert_eq!(harness.sync.phase(), SyncPhase::Idle);
}

#[test]
fn facet_toggle_resets_page_but_page_change_keeps_facets() {
    let mut harness = Harness::open("stream=Engineering&page=3");
    assert_eq!(harness.sync.state().page, 3);

    harness.toggle(CategoricalFacet::Ownership, "Private");
    assert_eq!(harness.sync.state().page, 1);
    assert_eq!(harness.address.read_current(), "stream=Engineering&ownership=Private");

    let before = harness.sync.state();
    harness.user(UserIntent::Filter(FilterChange::SetPage(2)));
    let after = harness.sync.state();
    assert_eq!(after.page, 2);
    assert_eq!(after.categorical, before.categorical);
    assert_eq!(harness.last_fetch().1.page, 2);
}

#[test]
fn unknown_address_input_is_tolerated_and_canonicalized() {
    let harness = Harness::open("?state=Atlantis&sort=bogus");
    let state = harness.sync.state();
    assert!(state.values(CategoricalFacet::State).is_none());
    assert_eq!(state.sort, SortMode::Popularity);
    assert_eq!(harness.recorded.writes, vec![(String::new(), WriteMode::Replace)]);
    assert_eq!(harness.address.history(), &[String::new()]);
    assert_eq!(harness.recorded.fetches.len(), 1);
}

#[test]
fn typing_burst_collapses_into_one_suggestion_fetch() {
    let mut harness = Harness::open("");
    for prefix in ["e", "en", "eng"] {
        harness.user(UserIntent::PrefixChanged(prefix.into()));
    }
    for timer in harness.recorded.timers.clone() {
        let effects = harness.sync.handle(ControllerEvent::SuggestionTimerElapsed(timer));
        harness.run(effects);
    }

    assert_eq!(harness.recorded.suggestion_fetches.len(), 1);
    assert_eq!(harness.recorded.suggestion_fetches[0].1.prefix, "eng");
    assert_eq!(harness.sync.state().free_text, "");
}

#[test]
fn back_navigation_restores_state_and_discards_in_flight_fetch() {
    let mut harness = Harness::open("?stream=Engineering");
    let initial = harness.last_fetch().0.clone();
    harness.complete(&initial, "Engineering colleges");

    harness.toggle(CategoricalFacet::City, "Pune");
    assert_eq!(harness.address.read_current(), "stream=Engineering&city=Pune");
    let (city_ticket, city_request) = harness.last_fetch().clone();
    assert_eq!(
        city_request.facets,
        facets(&[(CategoricalFacet::Stream, &["Engineering"]), (CategoricalFacet::City, &["Pune"])])
    );
    assert_eq!(city_request.page, 1);

    harness.back();
    assert_eq!(harness.address.read_current(), "stream=Engineering");
    assert!(harness.sync.state().values(CategoricalFacet::City).is_none());
    let (back_ticket, back_request) = harness.last_fetch().clone();
    assert_ne!(back_ticket, city_ticket);
    assert_eq!(back_request.facets, facets(&[(CategoricalFacet::Stream, &["Engineering"])]));
    assert_eq!(back_request.page, 1);
    assert_eq!(harness.recorded.fetches.len(), 3);

    harness.complete(&city_ticket, "Pune engineering colleges");
    assert_eq!(harness.shown(), Some("Engineering colleges".to_string()));
    harness.complete(&back_ticket, "Engineering colleges, again");
    assert_eq!(harness.shown(), Some("Engineering colleges, again".to_string()));
}

#[test]
fn forward_navigation_reapplies_the_newer_entry() {
    let mut harness = Harness::open("");
    harness.toggle(CategoricalFacet::State, "Kerala");
    harness.back();
    harness.forward();

    assert!(harness.sync.state().is_selected(CategoricalFacet::State, "Kerala"));
    assert_eq!(harness.recorded.fetches.len(), 4);
    assert_eq!(harness.recorded.writes.len(), 1);
}

#[test]
fn equivalent_external_address_does_not_refetch() {
    let mut harness = Harness::open("stream=Law&city=Pune");
    let fetches = harness.recorded.fetches.len();

    harness.address.open("city=pune&stream=Law");
    harness.run(Vec::new());

    assert_eq!(harness.recorded.fetches.len(), fetches);
    assert_eq!(harness.address.read_current(), "stream=Law&city=Pune");
}

#[test]
fn submit_and_retry_paths() {
    let mut harness = Harness::open("");
    harness.user(UserIntent::PrefixChanged("iit bombay".into()));
    harness.user(UserIntent::SubmitSearch("  iit   bombay ".into()));
    assert_eq!(harness.address.read_current(), "q=iit%20bombay");
    assert!(!harness.sync.suggestions().is_open());

    let ticket = harness.last_fetch().0.clone();
    let effects = harness.sync.handle(ControllerEvent::SearchCompleted {
        ticket,
        outcome: Err(controller::FetchError::TimedOut),
    });
    harness.run(effects);
    assert!(harness.sync.pager().failure().is_some());

    let writes = harness.recorded.writes.len();
    harness.user(UserIntent::Retry);
    assert_eq!(harness.recorded.writes.len(), writes);
    assert!(harness.sync.pager().failure().is_none());
    assert_eq!(harness.last_fetch().1.search.as_deref(), Some("iit bombay"));
}
