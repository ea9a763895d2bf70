//! Flat query-string encoding of [`FilterState`].
//!
//! Encoding only emits non-default fields, in a fixed key order:
//! `q`, categorical facets (in [`CategoricalFacet`] order), range facets,
//! `sort`, `page`. Multi-valued facets are comma-joined after each value is
//! percent-encoded, so a literal comma inside a value never splits it.
//!
//! Decoding never fails. Anything it cannot use is reported as a
//! [`DecodeAnomaly`] and replaced by the default.

use std::borrow::Cow;

use thiserror::Error;

use crate::facets::{CategoricalFacet, FacetVocabulary, RangeFacet, RangeToken, SortMode};
use crate::search_const::{KEY_FREE_TEXT, KEY_PAGE, KEY_SORT};
use crate::search_query::{normalize_free_text, FilterState};

/// Something in an address that was ignored while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeAnomaly {
    #[error("unknown query parameter `{0}`")]
    UnknownKey(String),
    #[error("`{value}` is not a known {facet} value")]
    UnknownFacetValue { facet: CategoricalFacet, value: String },
    #[error("`{token}` is not a valid {facet} bucket")]
    InvalidRangeToken { facet: RangeFacet, token: String },
    #[error("unknown sort mode `{0}`")]
    InvalidSort(String),
    #[error("invalid page number `{0}`")]
    InvalidPage(String),
    #[error("`{0}` is not valid percent-encoded UTF-8")]
    Undecodable(String),
}

/// Encodes the full state, page included.
pub fn encode(state: &FilterState) -> String {
    join_pairs(encode_pairs(state, true))
}

/// Encodes everything except the page. Used as the fingerprint body.
pub fn encode_filters(state: &FilterState) -> String {
    join_pairs(encode_pairs(state, false))
}

fn encode_pairs(state: &FilterState, include_page: bool) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if !state.free_text.is_empty() {
        pairs.push((KEY_FREE_TEXT, urlencoding::encode(&state.free_text).into_owned()));
    }
    for (facet, values) in state.categorical.iter() {
        if values.is_empty() {
            continue;
        }
        let joined = values
            .iter()
            .map(|value| urlencoding::encode(value).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        pairs.push((facet.key(), joined));
    }
    for (facet, token) in state.ranges.iter() {
        pairs.push((facet.key(), token.token().to_string()));
    }
    if state.sort != SortMode::default() {
        pairs.push((KEY_SORT, state.sort.token().to_string()));
    }
    if include_page && state.page > 1 {
        pairs.push((KEY_PAGE, state.page.to_string()));
    }
    pairs
}

fn join_pairs(pairs: Vec<(&'static str, String)>) -> String {
    pairs
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// `+` is accepted as a space, as HTML forms produce it. [`encode`] never
/// emits a bare `+`.
fn decode_component(raw: &str) -> Option<String> {
    let spaced: Cow<'_, str> = if raw.contains('+') { Cow::Owned(raw.replace('+', " ")) } else { Cow::Borrowed(raw) };
    urlencoding::decode(&spaced).ok().map(Cow::into_owned)
}

/// Decoder bound to one search context: its vocabulary and fixed page size.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCodec {
    vocabulary: FacetVocabulary,
    page_size: u32,
}

impl QueryCodec {
    pub fn new(vocabulary: FacetVocabulary, page_size: u32) -> Self {
        Self { vocabulary, page_size: page_size.max(1) }
    }

    pub fn vocabulary(&self) -> &FacetVocabulary {
        &self.vocabulary
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn empty_state(&self) -> FilterState {
        FilterState::new(self.page_size)
    }

    pub fn encode(&self, state: &FilterState) -> String {
        encode(state)
    }

    pub fn decode(&self, query: &str) -> FilterState {
        self.decode_reporting(query).0
    }

    /// Decodes `query` (with or without a leading `?`), returning the state
    /// and everything that was dropped along the way.
    pub fn decode_reporting(&self, query: &str) -> (FilterState, Vec<DecodeAnomaly>) {
        let mut state = self.empty_state();
        let mut anomalies = Vec::new();
        let query = query.trim();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let Some(key) = decode_component(raw_key) else {
                anomalies.push(DecodeAnomaly::Undecodable(raw_key.to_string()));
                continue;
            };

            if let Some(facet) = CategoricalFacet::from_key(&key) {
                for raw_piece in raw_value.split(',').filter(|piece| !piece.is_empty()) {
                    let Some(piece) = decode_component(raw_piece) else {
                        anomalies.push(DecodeAnomaly::Undecodable(raw_piece.to_string()));
                        continue;
                    };
                    match self.vocabulary.canonicalize(facet, &piece) {
                        Some(canonical) => {
                            state.categorical.entry(facet).or_default().insert(canonical.to_string());
                        }
                        None => anomalies.push(DecodeAnomaly::UnknownFacetValue { facet, value: piece }),
                    }
                }
                continue;
            }

            if let Some(facet) = RangeFacet::from_key(&key) {
                let token = decode_component(raw_value).unwrap_or_default();
                match RangeToken::parse(facet, token.trim()) {
                    Some(parsed) => {
                        state.ranges.insert(facet, parsed);
                    }
                    None => anomalies.push(DecodeAnomaly::InvalidRangeToken { facet, token }),
                }
                continue;
            }

            match key.as_str() {
                KEY_FREE_TEXT => match decode_component(raw_value) {
                    Some(text) => state.free_text = normalize_free_text(&text),
                    None => anomalies.push(DecodeAnomaly::Undecodable(raw_value.to_string())),
                },
                KEY_SORT => {
                    let token = decode_component(raw_value).unwrap_or_default();
                    match SortMode::from_token(token.trim()) {
                        Some(sort) => state.sort = sort,
                        None => {
                            state.sort = SortMode::default();
                            anomalies.push(DecodeAnomaly::InvalidSort(token));
                        }
                    }
                }
                KEY_PAGE => match raw_value.trim().parse::<u32>() {
                    Ok(page) if page >= 1 => state.page = page,
                    _ => {
                        state.page = 1;
                        anomalies.push(DecodeAnomaly::InvalidPage(raw_value.to_string()));
                    }
                },
                _ => anomalies.push(DecodeAnomaly::UnknownKey(key)),
            }
        }

        state.categorical.retain(|_, values| !values.is_empty());
        (state, anomalies)
    }
}

impl Default for QueryCodec {
    fn default() -> Self {
        Self::new(FacetVocabulary::builtin(), crate::search_const::DEFAULT_PAGE_SIZE)
    }
}
