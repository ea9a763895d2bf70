//! Result list panel: controls, the current page of colleges, load and
//! failure states.

use controller::UserIntent;
use dioxus::prelude::*;

use crate::components::error_boundary::{ComponentErrorBoundary, FetchFailureDisplay, LoadingIndicator};
use crate::components::search_components::search_result_item_card::SearchResultItemCard;
use crate::components::search_components::search_result_list_controls::SearchResultListControls;
use crate::data_definitions::search_context::SearchContext;

#[component]
pub fn SearchPanelLeftView() -> Element {
    rsx! {
        div {
            id: "x-search-panel-left-wrapper",
            style: "
                display: flex;
                flex-direction: column;
                gap: 1px;
                margin: 1px;
                padding: 7px;
                padding-top: 0px;
                height: 100%;
                width: 100%;
            ",
            SearchResultListControls {}

            div {
                style: "
                flex-grow: 1;
                width: 100%;
                max-height: calc(100% - 56px);
                ",
                ComponentErrorBoundary {
                    SearchResultsView { }
                }
            }
        }
    }
}

#[component]
fn SearchResultsView() -> Element {
    let ctx = use_context::<SearchContext>();
    let sync = ctx.sync.read();
    let pager = sync.pager();
    let is_loading = pager.is_loading();
    let failure = pager.failure().cloned();
    let Some(page) = pager.page() else {
        return rsx! {
            if let Some(failure) = failure {
                FetchFailureDisplay { failure, on_retry: move |_| ctx.dispatch(UserIntent::Retry) }
            } else {
                LoadingIndicator {}
            }
        };
    };

    // previous results stay visible (dimmed) while the next page loads or after a failure
    let first_index = u64::from(page.page().saturating_sub(1)) * u64::from(page.fingerprint.page_size);
    let opacity = if is_loading { "0.5" } else { "1" };
    let items = page.items.clone();

    rsx! {
        if let Some(failure) = failure {
            FetchFailureDisplay { failure, on_retry: move |_| ctx.dispatch(UserIntent::Retry) }
        }
        if is_loading {
            LoadingIndicator {}
        }
        if items.is_empty() && !is_loading {
            div {
                class: "x-no-results",
                "No colleges match these filters."
            }
        }
        ul {
            id: "x-search-panel-results-wrapper",
            style: "
                width: 100%;
                height: 100%;
                overflow-y: auto;
                opacity: {opacity};
            ",
            for (position, result) in items.into_iter().enumerate() {
                li {
                    key: "{result.id}",
                    SearchResultItemCard { result, item_index: first_index + position as u64 + 1 }
                }
            }
        }
    }
}
