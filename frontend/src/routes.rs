use dioxus::prelude::*;

use crate::components::navbar::Navbar;
use crate::data_definitions::url_param::ListingQuery;
use crate::pages::college_listing_page::CollegeListingPage;
use crate::pages::home_page::HomePage;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Navbar)]


    #[route("/")]
    HomePage {},


    // the whole query string is the encoded filter state
    #[route("/colleges?:..query")]
    CollegeListingPage { query: ListingQuery },

}

impl Route {
    pub fn listing_from_query(query: impl Into<String>) -> Self {
        Self::CollegeListingPage { query: ListingQuery::from(query.into()) }
    }
}
