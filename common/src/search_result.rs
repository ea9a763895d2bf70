//! Wire types for the two store contracts: paged search and suggestions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::facets::{CategoricalFacet, RangeFacet, SortMode};
use crate::search_query::{FilterState, QueryFingerprint};

/// Paged search request. Carries the whole filter state of one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default)]
    pub facets: BTreeMap<CategoricalFacet, Vec<String>>,
    #[serde(default)]
    pub ranges: BTreeMap<RangeFacet, String>,
    #[serde(default)]
    pub sort: SortMode,
    pub page: u32,
    pub limit: u32,
}

impl From<&FilterState> for SearchRequest {
    fn from(state: &FilterState) -> Self {
        Self {
            search: (!state.free_text.is_empty()).then(|| state.free_text.clone()),
            facets: state
                .categorical
                .iter()
                .map(|(facet, values)| (*facet, values.iter().cloned().collect()))
                .collect(),
            ranges: state.ranges.iter().map(|(facet, token)| (*facet, token.token().to_string())).collect(),
            sort: state.sort,
            page: state.page,
            limit: state.page_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<CollegeSummary>,
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
    pub total: u64,
}

/// One listing row. Only the fields the listing surface shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub ownership: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub annual_fees: Option<u64>,
    #[serde(default)]
    pub streams: Vec<String>,
}

impl CollegeSummary {
    pub fn location(&self) -> Option<String> {
        match (&self.city, &self.state) {
            (Some(city), Some(state)) => Some(format!("{city}, {state}")),
            (Some(only), None) | (None, Some(only)) => Some(only.clone()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<Suggestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub location_hint: Option<String>,
    #[serde(default)]
    pub type_hint: Option<String>,
}

/// A page as displayed. Always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage {
    pub items: Vec<CollegeSummary>,
    pub total_count: u64,
    pub total_pages: u32,
    pub fingerprint: QueryFingerprint,
}

impl ResultPage {
    pub fn from_response(response: SearchResponse, fingerprint: QueryFingerprint) -> Self {
        Self {
            items: response.data,
            total_count: response.pagination.total,
            total_pages: response.pagination.pages,
            fingerprint,
        }
    }

    pub fn page(&self) -> u32 {
        self.fingerprint.page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets::{FacetVocabulary, FeeBracket, RangeToken};
    use crate::search_query::FilterChange;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_carries_every_active_facet() {
        let vocabulary = FacetVocabulary::builtin();
        let state = FilterState::default()
            .apply(&FilterChange::SetFreeText("nit".into()), &vocabulary)
            .apply(&FilterChange::ToggleValue { facet: CategoricalFacet::City, value: "Pune".into() }, &vocabulary)
            .apply(&FilterChange::SetRange(RangeToken::Fees(FeeBracket::ThreeToFiveLakh)), &vocabulary)
            .apply(&FilterChange::SetPage(2), &vocabulary);

        let request = SearchRequest::from(&state);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "search": "nit",
                "facets": { "city": ["Pune"] },
                "ranges": { "fees": "3l-5l" },
                "sort": "popularity",
                "page": 2,
                "limit": 20,
            })
        );
    }

    #[test]
    fn response_tolerates_missing_optional_fields() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"success":true,"data":[{"id":"c1","name":"College of Engineering","city":"Pune"}],"pagination":{"page":1,"pages":4,"total":61}}"#,
        )
        .unwrap();
        assert_eq!(response.data[0].location(), Some("Pune".to_string()));
        assert_eq!(response.pagination.total, 61);

        let failed: SuggestionResponse = serde_json::from_str(r#"{"success":false,"message":"down"}"#).unwrap();
        assert!(failed.data.is_empty());
    }
}
