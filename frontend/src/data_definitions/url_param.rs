//! Query-string route parameter.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The raw query string of the listing route, without the leading `?`.
///
/// The router hands over whatever is in the address bar; decoding and
/// canonicalisation happen in the controller's codec.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ListingQuery(pub String);

impl ListingQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ListingQuery {
    fn from(value: &str) -> Self {
        ListingQuery(value.trim_start_matches('?').to_string())
    }
}

impl From<String> for ListingQuery {
    fn from(value: String) -> Self {
        ListingQuery::from(value.as_str())
    }
}

// Display the state in a way that can be parsed back by From<&str>
impl Display for ListingQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
