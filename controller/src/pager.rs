//! Paged search fetches with last-request-wins.
//!
//! Superseded fetches are not aborted here. Their responses are dropped on
//! arrival because their fingerprint no longer matches the current state.

use common::search_query::{FilterState, QueryFingerprint};
use common::search_result::{ResultPage, SearchRequest, SearchResponse};
use tracing::{debug, warn};

use crate::error::{FetchError, FetchFailure, FetchResult};
use crate::event::FetchTicket;

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerOutcome {
    Applied,
    Failed,
    Discarded,
}

/// A fetch ready to be sent, plus the in-flight tickets it supersedes.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedFetch {
    pub ticket: FetchTicket,
    pub request: SearchRequest,
    pub superseded: Vec<FetchTicket>,
}

#[derive(Debug, Clone, Default)]
pub struct ResultPager {
    next_seq: u64,
    latest: Option<FetchTicket>,
    in_flight: Vec<FetchTicket>,
    applied_seq: u64,
    page: Option<ResultPage>,
    failure: Option<FetchFailure>,
}

impl ResultPager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, state: &FilterState) -> IssuedFetch {
        self.next_seq += 1;
        let ticket = FetchTicket { seq: self.next_seq, fingerprint: state.fingerprint() };
        let superseded = std::mem::take(&mut self.in_flight);
        self.in_flight.push(ticket.clone());
        self.latest = Some(ticket.clone());
        self.failure = None;
        debug!(seq = ticket.seq, fingerprint = %ticket.fingerprint, superseded = superseded.len(), "issuing page fetch");
        IssuedFetch { ticket, request: SearchRequest::from(state), superseded }
    }

    /// Applies a completion if it still belongs to `current`.
    ///
    /// A success is applied when its fingerprint matches and it is newer than
    /// the page on display. A failure is only shown for the latest ticket, so
    /// an old error cannot hide a newer fetch still in flight.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        outcome: FetchResult<SearchResponse>,
        current: &QueryFingerprint,
    ) -> PagerOutcome {
        self.in_flight.retain(|pending| pending.seq != ticket.seq);

        if &ticket.fingerprint != current || ticket.seq <= self.applied_seq {
            debug!(seq = ticket.seq, fingerprint = %ticket.fingerprint, "discarding stale page response");
            return PagerOutcome::Discarded;
        }

        let outcome = outcome.and_then(|response| {
            if response.success {
                Ok(response)
            } else {
                Err(FetchError::Rejected(response.message.unwrap_or_else(|| "unsuccessful response".to_string())))
            }
        });

        match outcome {
            Ok(response) => {
                self.page = Some(ResultPage::from_response(response, ticket.fingerprint.clone()));
                self.applied_seq = ticket.seq;
                if self.is_latest(ticket) {
                    self.failure = None;
                }
                PagerOutcome::Applied
            }
            Err(error) if self.is_latest(ticket) => {
                warn!(seq = ticket.seq, fingerprint = %ticket.fingerprint, %error, "page fetch failed");
                self.failure = Some(FetchFailure { fingerprint: ticket.fingerprint.clone(), error });
                PagerOutcome::Failed
            }
            Err(error) => {
                debug!(seq = ticket.seq, %error, "ignoring failure of superseded fetch");
                PagerOutcome::Discarded
            }
        }
    }

    fn is_latest(&self, ticket: &FetchTicket) -> bool {
        self.latest.as_ref().is_some_and(|latest| latest.seq == ticket.seq)
    }

    /// True while the most recent fetch has not completed.
    pub fn is_loading(&self) -> bool {
        self.latest.as_ref().is_some_and(|latest| self.in_flight.iter().any(|t| t.seq == latest.seq))
    }

    /// Last successfully applied page. Kept on failure.
    pub fn page(&self) -> Option<&ResultPage> {
        self.page.as_ref()
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        self.failure.as_ref()
    }

    pub fn latest(&self) -> Option<&FetchTicket> {
        self.latest.as_ref()
    }

    pub fn in_flight(&self) -> &[FetchTicket] {
        &self.in_flight
    }

    /// Page count reported for the current filters, if a page of them has
    /// been applied.
    pub fn total_pages_for(&self, filters: &QueryFingerprint) -> Option<u32> {
        self.page
            .as_ref()
            .filter(|page| page.fingerprint.filters == filters.filters && page.fingerprint.page_size == filters.page_size)
            .map(|page| page.total_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::facets::{CategoricalFacet, FacetVocabulary};
    use common::search_query::FilterChange;
    use common::search_result::{CollegeSummary, Pagination};
    use pretty_assertions::assert_eq;

    fn state_with_city(city: &str) -> FilterState {
        FilterState::default().apply(
            &FilterChange::ToggleValue { facet: CategoricalFacet::City, value: city.into() },
            &FacetVocabulary::builtin(),
        )
    }

    fn response(name: &str, pages: u32) -> SearchResponse {
        SearchResponse {
            success: true,
            data: vec![CollegeSummary {
                id: name.to_lowercase(),
                name: name.into(),
                city: None,
                state: None,
                ownership: None,
                rating: None,
                annual_fees: None,
                streams: vec![],
            }],
            pagination: Pagination { page: 1, pages, total: u64::from(pages) * 20 },
            message: None,
        }
    }

    #[test]
    fn newer_fingerprint_wins_regardless_of_arrival_order() {
        let mut pager = ResultPager::new();
        let pune = state_with_city("Pune");
        let mumbai = state_with_city("Mumbai");

        let first = pager.issue(&pune);
        let second = pager.issue(&mumbai);
        assert_eq!(second.superseded, vec![first.ticket.clone()]);

        let current = mumbai.fingerprint();
        assert_eq!(pager.complete(&second.ticket, Ok(response("Mumbai College", 2)), &current), PagerOutcome::Applied);
        assert_eq!(pager.complete(&first.ticket, Ok(response("Pune College", 3)), &current), PagerOutcome::Discarded);

        let page = pager.page().unwrap();
        assert_eq!(page.items[0].name, "Mumbai College");
        assert_eq!(page.fingerprint, current);
        assert!(!pager.is_loading());
    }

    #[test]
    fn failure_keeps_previous_page_and_is_cleared_by_next_issue() {
        let mut pager = ResultPager::new();
        let pune = state_with_city("Pune");
        let current = pune.fingerprint();

        let ok = pager.issue(&pune);
        pager.complete(&ok.ticket, Ok(response("Pune College", 1)), &current);

        let retry = pager.issue(&pune);
        let outcome = pager.complete(&retry.ticket, Err(FetchError::TimedOut), &current);
        assert_eq!(outcome, PagerOutcome::Failed);
        assert_eq!(pager.failure().map(|f| f.error.clone()), Some(FetchError::TimedOut));
        assert_eq!(pager.page().unwrap().items[0].name, "Pune College");

        pager.issue(&pune);
        assert!(pager.failure().is_none());
        assert!(pager.is_loading());
    }

    #[test]
    fn unsuccessful_response_is_a_failure() {
        let mut pager = ResultPager::new();
        let state = FilterState::default();
        let issued = pager.issue(&state);
        let rejected = SearchResponse { success: false, message: Some("index offline".into()), ..response("x", 0) };

        assert_eq!(pager.complete(&issued.ticket, Ok(rejected), &state.fingerprint()), PagerOutcome::Failed);
        assert_eq!(pager.failure().unwrap().error, FetchError::Rejected("index offline".into()));
        assert!(pager.page().is_none());
    }

    #[test]
    fn stale_failure_does_not_mask_in_flight_fetch() {
        let mut pager = ResultPager::new();
        let state = FilterState::default();
        let first = pager.issue(&state);
        let _second = pager.issue(&state);

        let outcome = pager.complete(&first.ticket, Err(FetchError::Transport("reset".into())), &state.fingerprint());
        assert_eq!(outcome, PagerOutcome::Discarded);
        assert!(pager.failure().is_none());
        assert!(pager.is_loading());
    }

    #[test]
    fn older_success_never_replaces_newer_page() {
        let mut pager = ResultPager::new();
        let state = FilterState::default();
        let current = state.fingerprint();
        let first = pager.issue(&state);
        let second = pager.issue(&state);

        pager.complete(&second.ticket, Ok(response("Fresh", 1)), &current);
        assert_eq!(pager.complete(&first.ticket, Ok(response("Old", 1)), &current), PagerOutcome::Discarded);
        assert_eq!(pager.page().unwrap().items[0].name, "Fresh");
        assert_eq!(pager.total_pages_for(&current), Some(1));
    }
}
