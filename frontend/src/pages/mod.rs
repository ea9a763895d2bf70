pub mod college_listing_page;
pub mod home_page;
