//! Server-side access to the remote college data store.

pub mod api;
pub mod config;
pub mod db_utils;
