//! Faceted-search state controller.
//!
//! A [`Synchronizer`] owns the filter state of one search context and keeps
//! it in step with the address bar, the result pager and the type-ahead
//! suggestion engine. It performs no IO: hosts feed it events and carry out
//! the effects it returns.

pub mod address;
pub mod config;
pub mod error;
pub mod event;
pub mod pager;
pub mod runtime;
pub mod suggestions;
pub mod synchronizer;

pub use address::{
    Address, AddressChange, AddressOrigin, MemoryAddress, NavigationKind, PendingWrites, WriteId, WriteMode,
};
pub use config::ControllerConfig;
pub use error::{FetchError, FetchFailure, FetchResult};
pub use event::{ControllerEvent, Effect, FetchTicket, RequestId, TimerId, UserIntent};
pub use pager::{PagerOutcome, ResultPager};
pub use runtime::{run_fetch, SearchBackend};
pub use suggestions::{SuggestionEngine, SuggestionOutcome};
pub use synchronizer::{Snapshot, SyncPhase, Synchronizer};
