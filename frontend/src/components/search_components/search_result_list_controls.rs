//! Hit count, pagination and copy-link controls above the result list.

use common::search_query::FilterChange;
use controller::UserIntent;
use dioxus::logger::tracing::{info, warn};
use dioxus::prelude::*;
use dioxus_free_icons::{Icon, icons::{md_editor_icons::MdInsertLink, md_navigation_icons::{MdArrowBack, MdArrowForward}}};

use crate::data_definitions::search_context::SearchContext;

#[component]
pub fn SearchResultListControls() -> Element {
    rsx! {
        div {
            id: "x-search-panel-left-title-row",
            style: "
                display: flex;
                flex-direction: row;
                align-items: center;
                gap: 6px;
                padding: 7px;
                margin: 1px;
                height: 56px;
                width: 100%;
            ",
            h1 {
                style: "font-size: 20px; font-weight: 300; color:rgb(75, 87, 112);  border-bottom: 1px solid rgb(75, 87, 112);",
                HitCountString { }
            }
            // empty space
            div {
                style: "
                flex-grow: 1;"
            }
            CopyLinkButton {}
            ControlNextPrevPage {}
        }
    }
}

#[component]
fn ControlNextPrevPage() -> Element {
    let ctx = use_context::<SearchContext>();
    let sync = ctx.sync;
    let current_page = use_memo(move || sync.read().state().page);
    let max_pages = use_memo(move || {
        let sync = sync.read();
        sync.pager().total_pages_for(&sync.state().fingerprint())
    });
    let can_go_to_previous_page = use_memo(move || current_page() > 1);
    let can_go_to_next_page = use_memo(move || max_pages().is_some_and(|max| current_page() < max));
    let max_pages_txt = use_memo(move || max_pages().map(|max| max.to_string()).unwrap_or("-".to_string()));

    let set_current_page = move |page: u32| ctx.dispatch(UserIntent::Filter(FilterChange::SetPage(page)));

    rsx! {
        div {
            style: "
                display: flex;
                flex-direction: row;
                align-items: center;
                justify-content: center;
                gap: 16px;
            ",
            // prev page
            NavigationButton {
                icon: MdArrowBack,
                label: "Previous Page",
                disabled: !can_go_to_previous_page(),
                onclick: move |_| set_current_page(current_page().saturating_sub(1)),
            }
            // current page counter
            div {
                class: "x-page-counter",
                "{current_page}"
                span {
                    style: "color: rgba(0,0,0,0.5);",
                    "/{max_pages_txt}"
                }
            }
            // next page
            NavigationButton {
                icon: MdArrowForward,
                label: "Next Page",
                disabled: !can_go_to_next_page(),
                onclick: move |_| set_current_page(current_page() + 1),
            }
        }
    }
}

#[component]
pub fn NavigationButton<I: dioxus_free_icons::IconShape + Clone + PartialEq + 'static>(icon: I, label: String, disabled: ReadSignal<bool>, onclick: Callback<()>) -> Element {
    let btn_color = use_memo(move || if *disabled.read() { "rgba(0,0,0,0.3)" } else { "rgba(0,0,0,1)" });
    let btn_cursor = use_memo(move || if *disabled.read() { "not-allowed" } else { "pointer" });
    rsx! {
        button {
            title: "{label}",
            disabled: *disabled.read(),
            style: "
                width: 32px;
                height: 32px;
                background: white;
                border-radius: 8px;
                padding: 4px;
                box-shadow: 0 2px 4px 0 rgba(0, 0, 0, 0.16);
                cursor: {btn_cursor};
            ",
            onclick: move |_| {
                if !*disabled.read() {
                    onclick(());
                }
            },
            Icon { icon: icon, style: "width: 24px; height: 24px; color: {btn_color};" }
        }
    }
}

/// Copies the shareable address of the current search.
#[component]
fn CopyLinkButton() -> Element {
    let mut copied = use_signal(|| false);
    let do_copy_link = move |_: Event<MouseData>| {
        let Some(window) = web_sys::window() else { return };
        let Ok(url) = window.location().href() else { return };
        let promise = window.navigator().clipboard().write_text(&url);
        spawn(async move {
            match wasm_bindgen_futures::JsFuture::from(promise).await {
                Ok(_) => {
                    info!("Link copied to clipboard: {url}");
                    copied.set(true);
                }
                Err(e) => warn!("clipboard write failed: {}", describe_js(&e)),
            }
        });
    };

    rsx! {
        button {
            class: "x-copy-link",
            title: "Copy a link to this search",
            onclick: do_copy_link,
            onmouseleave: move |_| copied.set(false),
            Icon { icon: MdInsertLink, style: "width: 22px; height: 22px;" }
            if copied() { "Copied" } else { "Copy link" }
        }
    }
}

fn describe_js(value: &wasm_bindgen::JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

#[component]
fn HitCountString() -> Element {
    let ctx = use_context::<SearchContext>();
    let sync = ctx.sync.read();
    let pager = sync.pager();

    match (pager.page(), pager.is_loading()) {
        (Some(page), _) if page.total_count == 1 => rsx! { "1 college found" },
        (Some(page), _) => rsx! { "{page.total_count} colleges found" },
        (None, true) => rsx! { "..." },
        (None, false) => rsx! { "-" },
    }
}
