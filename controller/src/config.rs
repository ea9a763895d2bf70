use std::time::Duration;

use common::facets::FacetVocabulary;
use common::query_codec::QueryCodec;
use common::search_const::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SUGGESTION_DEBOUNCE_MS, SUGGESTION_MIN_PREFIX_LEN};
use serde::{Deserialize, Serialize};

/// Configuration for one search context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Results per page. Fixed for the lifetime of the context.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Quiet period before a type-ahead fetch.
    #[serde(default = "default_suggestion_debounce_ms")]
    pub suggestion_debounce_ms: u64,

    /// Shorter prefixes clear the dropdown instead of fetching.
    #[serde(default = "default_suggestion_min_prefix_len")]
    pub suggestion_min_prefix_len: usize,

    /// Replaces the built-in facet catalog.
    #[serde(default)]
    pub vocabulary: Option<FacetVocabulary>,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_suggestion_debounce_ms() -> u64 {
    SUGGESTION_DEBOUNCE_MS
}

fn default_suggestion_min_prefix_len() -> usize {
    SUGGESTION_MIN_PREFIX_LEN
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            suggestion_debounce_ms: default_suggestion_debounce_ms(),
            suggestion_min_prefix_len: default_suggestion_min_prefix_len(),
            vocabulary: None,
        }
    }
}

impl ControllerConfig {
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn suggestion_debounce(&self) -> Duration {
        Duration::from_millis(self.suggestion_debounce_ms)
    }

    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn codec(&self) -> QueryCodec {
        QueryCodec::new(self.vocabulary.clone().unwrap_or_default(), self.effective_page_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::facets::CategoricalFacet;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_fields_take_defaults() {
        let config: ControllerConfig = serde_json::from_str(r#"{"page_size": 50}"#).unwrap();
        assert_eq!(config, ControllerConfig::default().with_page_size(50));
        assert_eq!(config.suggestion_debounce(), Duration::from_millis(300));
    }

    #[test]
    fn page_size_is_clamped_for_the_codec() {
        assert_eq!(ControllerConfig::default().with_page_size(0).codec().page_size(), 1);
        assert_eq!(ControllerConfig::default().with_page_size(10_000).codec().page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn configured_vocabulary_is_cleaned_on_load() {
        let config: ControllerConfig =
            serde_json::from_str(r#"{"vocabulary": {"city": [" Pune", "pune", "", "Nashik "]}}"#).unwrap();
        let codec = config.codec();
        let vocabulary = codec.vocabulary();

        assert_eq!(vocabulary.values(CategoricalFacet::City), &["Pune".to_string(), "Nashik".to_string()]);
        assert_eq!(vocabulary.canonicalize(CategoricalFacet::City, "pune"), Some("Pune"));
        assert_eq!(codec.decode("city=Pune").values(CategoricalFacet::City).map(|v| v.len()), Some(1));
    }
}
