//! Constants shared by the controller, the backend client and the UI.

/// Results per page on listing surfaces unless a context overrides it.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound accepted by the college store for a single page.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Type-ahead stays quiet below this many characters.
pub const SUGGESTION_MIN_PREFIX_LEN: usize = 2;

/// Quiet period before a suggestion fetch is issued.
pub const SUGGESTION_DEBOUNCE_MS: u64 = 300;

/// Query string keys that are not facets.
pub const KEY_FREE_TEXT: &str = "q";
pub const KEY_SORT: &str = "sort";
pub const KEY_PAGE: &str = "page";
