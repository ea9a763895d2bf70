use common::search_result::Suggestion;
use controller::UserIntent;
use dioxus::prelude::*;
use dioxus_free_icons::{Icon, icons::{md_action_icons::MdSearch, md_communication_icons::MdLocationOn, md_social_icons::MdSchool}};

use crate::data_definitions::search_context::SearchContext;

#[component]
pub fn SearchInputTopBar() -> Element {
    let ctx = use_context::<SearchContext>();
    let sync = ctx.sync;
    let typed_text = use_memo(move || sync.read().suggestions().prefix().to_string());
    let committed_text = use_memo(move || sync.read().state().free_text.clone());
    let query_has_changed = use_memo(move || typed_text.read().trim() != committed_text.read().as_str());
    let search_button_color = use_memo(move || if query_has_changed() { "blue" } else { "#6B7280" });

    let trigger_search = move |_: ()| {
        ctx.dispatch(UserIntent::SubmitSearch(typed_text()));
    };
    let search_oninput = move |event: Event<FormData>| {
        ctx.dispatch(UserIntent::PrefixChanged(event.value()));
    };
    let search_onkeydown = move |event: Event<KeyboardData>| match event.key() {
        Key::Enter => trigger_search(()),
        Key::Escape => ctx.dispatch(UserIntent::DismissSuggestions),
        _ => {}
    };

    rsx! {
        div {
            style: "position: relative; margin-left: 16px;",
            div {
                id: "x-search-input-search-box",
                style: "
                    display:flex;
                    align-items:center;
                    gap: 16px;
                    background-color: white;
                    border-radius: 9999px;
                    padding: 10px 14px;
                    height: 44px;
                    color: #111827;
                    border: 1px solid rgba(101, 101, 101, 0.8);
                    width: 500px;
                ",

                button {
                    style: "
                        border: none;
                        background: none;
                        cursor: pointer;
                    ",
                    onclick: move |_| {
                        trigger_search(())
                    },
                    Icon { icon: MdSearch, style: "width: 20px; height: 20px; color:{search_button_color()};" }
                }
                input {
                    r#type: "text",
                    placeholder: "Search colleges, courses or cities",
                    style: "
                        flex:1;
                        border: none;
                        outline: none;
                        background: transparent;
                        color: #111827;
                        font-size: 20px;
                        font-weight: 400;
                        font-family: Roboto, sans-serif;
                    ",
                    value: "{typed_text}",
                    oninput: search_oninput,
                    onkeydown: search_onkeydown,
                    onblur: move |_| ctx.dispatch(UserIntent::DismissSuggestions),
                }
            }
            SuggestionDropdown {}
        }
    }
}

#[component]
fn SuggestionDropdown() -> Element {
    let ctx = use_context::<SearchContext>();
    let sync = ctx.sync;
    let suggestions = use_memo(move || sync.read().suggestions().visible().to_vec());
    if suggestions.read().is_empty() {
        return rsx! {};
    }

    rsx! {
        ul {
            class: "x-suggestion-dropdown",
            for suggestion in suggestions() {
                li {
                    key: "{suggestion.id}",
                    SuggestionRow { suggestion }
                }
            }
        }
    }
}

#[component]
fn SuggestionRow(suggestion: Suggestion) -> Element {
    let ctx = use_context::<SearchContext>();
    let is_place = suggestion.type_hint.as_deref().is_some_and(|hint| hint.eq_ignore_ascii_case("location"));
    let label = suggestion.label.clone();
    let location_hint = suggestion.location_hint.clone();
    rsx! {
        div {
            class: "x-suggestion-row",
            // mousedown fires before the input's blur closes the dropdown
            onmousedown: move |event| {
                event.prevent_default();
                ctx.dispatch(UserIntent::SelectSuggestion(suggestion.clone()));
            },
            if is_place {
                Icon { icon: MdLocationOn, style: "width: 20px; height: 20px; flex-shrink: 0;" }
            } else {
                Icon { icon: MdSchool, style: "width: 20px; height: 20px; flex-shrink: 0;" }
            }
            span { class: "x-suggestion-label", "{label}" }
            if let Some(hint) = location_hint {
                span { class: "x-suggestion-hint", "{hint}" }
            }
        }
    }
}
