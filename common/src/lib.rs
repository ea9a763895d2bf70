//! Common library exports shared between frontend, controller and backend.

extern crate serde;

pub mod facets;
pub mod query_codec;
pub mod search_const;
pub mod search_query;
pub mod search_result;
