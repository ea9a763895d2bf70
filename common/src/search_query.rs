//! Shared search query models and helpers.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::facets::{CategoricalFacet, FacetVocabulary, RangeFacet, RangeToken, SortMode};
use crate::query_codec;
use crate::search_const::DEFAULT_PAGE_SIZE;

/// Every active facet of one search context.
///
/// Values are normalized: free text has collapsed whitespace, facet sets are
/// never empty (an empty facet is simply absent) and `page` is at least 1.
/// A state is never edited in place once shared; [`FilterState::apply`]
/// returns the next version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub free_text: String,
    pub categorical: BTreeMap<CategoricalFacet, BTreeSet<String>>,
    pub ranges: BTreeMap<RangeFacet, RangeToken>,
    pub sort: SortMode,
    pub page: u32,
    pub page_size: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// One logical edit of a [`FilterState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterChange {
    ToggleValue { facet: CategoricalFacet, value: String },
    SetValues { facet: CategoricalFacet, values: Vec<String> },
    ClearFacet(CategoricalFacet),
    SetRange(RangeToken),
    ClearRange(RangeFacet),
    SetFreeText(String),
    SetSort(SortMode),
    SetPage(u32),
    ClearAll,
}

impl FilterState {
    pub fn new(page_size: u32) -> Self {
        Self {
            free_text: String::new(),
            categorical: BTreeMap::new(),
            ranges: BTreeMap::new(),
            sort: SortMode::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn values(&self, facet: CategoricalFacet) -> Option<&BTreeSet<String>> {
        self.categorical.get(&facet)
    }

    pub fn is_selected(&self, facet: CategoricalFacet, value: &str) -> bool {
        self.values(facet).is_some_and(|values| values.contains(value))
    }

    pub fn range(&self, facet: RangeFacet) -> Option<RangeToken> {
        self.ranges.get(&facet).copied()
    }

    /// Number of selected facet values and range buckets (free text and sort excluded).
    pub fn active_filter_count(&self) -> usize {
        self.categorical.values().map(BTreeSet::len).sum::<usize>() + self.ranges.len()
    }

    /// True when everything except `page` is equal.
    pub fn same_filters(&self, other: &FilterState) -> bool {
        self.free_text == other.free_text
            && self.categorical == other.categorical
            && self.ranges == other.ranges
            && self.sort == other.sort
            && self.page_size == other.page_size
    }

    /// Produces the next version of the state.
    ///
    /// Values outside the vocabulary are ignored. If anything other than the
    /// page changed, the page goes back to 1.
    pub fn apply(&self, change: &FilterChange, vocabulary: &FacetVocabulary) -> FilterState {
        let mut next = self.clone();
        match change {
            FilterChange::ToggleValue { facet, value } => {
                if let Some(canonical) = vocabulary.canonicalize(*facet, value) {
                    let entry = next.categorical.entry(*facet).or_default();
                    if !entry.remove(canonical) {
                        entry.insert(canonical.to_string());
                    }
                    if entry.is_empty() {
                        next.categorical.remove(facet);
                    }
                }
            }
            FilterChange::SetValues { facet, values } => {
                let values = values
                    .iter()
                    .filter_map(|value| vocabulary.canonicalize(*facet, value))
                    .map(str::to_string)
                    .collect::<BTreeSet<_>>();
                if values.is_empty() {
                    next.categorical.remove(facet);
                } else {
                    next.categorical.insert(*facet, values);
                }
            }
            FilterChange::ClearFacet(facet) => {
                next.categorical.remove(facet);
            }
            FilterChange::SetRange(token) => {
                next.ranges.insert(token.facet(), *token);
            }
            FilterChange::ClearRange(facet) => {
                next.ranges.remove(facet);
            }
            FilterChange::SetFreeText(text) => {
                next.free_text = normalize_free_text(text);
            }
            FilterChange::SetSort(sort) => {
                next.sort = *sort;
            }
            FilterChange::SetPage(page) => {
                next.page = (*page).max(1);
            }
            FilterChange::ClearAll => {
                next = FilterState::new(self.page_size);
            }
        }
        if !next.same_filters(self) {
            next.page = 1;
        }
        next
    }

    /// Relevance key for a paged fetch of this state.
    pub fn fingerprint(&self) -> QueryFingerprint {
        QueryFingerprint {
            filters: query_codec::encode_filters(self),
            page_size: self.page_size,
            page: self.page,
        }
    }
}

/// Collapses runs of whitespace and trims the ends.
pub fn normalize_free_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical encoding of a [`FilterState`] without its page, plus the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFingerprint {
    pub filters: String,
    pub page_size: u32,
    pub page: u32,
}

impl std::fmt::Display for QueryFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]#{}x{}", self.filters, self.page, self.page_size)
    }
}
