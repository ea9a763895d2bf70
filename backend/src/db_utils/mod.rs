pub mod in_flight;
pub mod store_client;
