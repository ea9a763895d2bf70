pub mod search_context;
pub mod url_param;
