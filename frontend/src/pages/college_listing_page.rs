use dioxus::prelude::*;

use crate::{
    components::search_components::{search_facets::FacetButtonStrip, search_input_top_bar::SearchInputTopBar, search_panel_left_view::SearchPanelLeftView},
    data_definitions::{search_context::use_search_context, url_param::ListingQuery},
};

fn title_ellipsis(title: String) -> String {
    if title.chars().count() > 20 {
        title.chars().take(18).collect::<String>() + "..."
    } else {
        title
    }
}

/// College listing. The query string carries the whole filter state.
#[component]
pub fn CollegeListingPage(query: ListingQuery) -> Element {
    rsx! {
        CollegeListingRootComponent { query }
    }
}

#[component]
fn CollegeListingRootComponent(query: ReadSignal<ListingQuery>) -> Element {
    let ctx = use_search_context(query);
    let sync = ctx.sync;
    let title = use_memo(move || {
        let free_text = sync.read().state().free_text.clone();
        if free_text.is_empty() { "Colleges".to_string() } else { title_ellipsis(free_text) }
    });

    rsx! {
        Title { "College Finder: {title}" }
        div {
            id: "x-search-page-root-component",
            style: r#"
                height: 100%;
                width: 100%;
                display: flex;
                flex-direction: column;
            "#,
            div {
                id: "x-search-input-top-bar",
                style: "
                    border-bottom: 1px solid rgb(164, 164, 164);
                    background-color: #F8FCFF;
                    flex-shrink: 0;
                    display: flex;
                    flex-direction: column;
                    padding-top: 16px;
                    width: 100%;
                ",

                SearchInputTopBar {}
                FacetButtonStrip {}
            }

            div {
                id: "x-search-results-panel",
                style: "
                    flex-grow: 1;
                    min-height: 0;
                    width: 100%;
                    max-width: 1200px;
                    background-color: #ECEEF2;
                ",
                SearchPanelLeftView {}
            }
        }
    }
}
