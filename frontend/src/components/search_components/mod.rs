pub mod search_facets;
pub mod search_input_top_bar;
pub mod search_panel_left_view;
pub mod search_result_item_card;
pub mod search_result_list_controls;
