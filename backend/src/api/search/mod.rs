//! Store endpoints backing the college listing.

mod search_colleges;
pub use search_colleges::search_colleges;

mod suggest_colleges;
pub use suggest_colleges::suggest_colleges;

pub const SEARCH_PATH: &str = "api/colleges/search";
pub const SUGGEST_PATH: &str = "api/colleges/suggestions";
