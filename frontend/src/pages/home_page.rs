use dioxus::prelude::*;
use dioxus_free_icons::icons::md_action_icons::MdSearch;
use dioxus_free_icons::Icon;

use common::facets::CategoricalFacet;
use common::query_codec::QueryCodec;
use common::search_query::FilterChange;
use crate::routes::Route;

/// Address of a listing with the given changes applied to an empty state.
fn listing_route(changes: &[FilterChange]) -> Route {
    let codec = QueryCodec::default();
    let state = changes
        .iter()
        .fold(codec.empty_state(), |state, change| state.apply(change, codec.vocabulary()));
    Route::listing_from_query(codec.encode(&state))
}

fn pick(facet: CategoricalFacet, value: &str) -> FilterChange {
    FilterChange::ToggleValue { facet, value: value.to_string() }
}

/// Home page
#[component]
pub fn HomePage() -> Element {
    rsx! {
        Title { "College Finder - Home" }
        div {
            id: "x-home-container",
            style: "
                display:flex;
                flex-direction: column;
                gap: 20px;
                width: 100%;
                height: 100%;
                padding: 36px 40px;
                background: #F5F6F8;
                box-sizing: border-box;
                overflow: auto;
            ",

            MainTitle {}
            SubText {}

            // Cards Row
            div {
                style: "
                    display:flex;
                    flex-direction: row;
                    gap: 20px;
                    flex-wrap: wrap;
                    align-items: stretch;
                    margin-top: 10px;
                ",
                TextSearchCard {}
                QuickStartCard {}
            }
        }
    }
}

#[component]
fn MainTitle() -> Element {
    rsx! {
        div {
            style: "
                display:flex;
                align-items: center;
                gap: 8px;
                color: #0F172A;
                font-size: 46px;
                font-weight: 500;
                letter-spacing: -0.02em;
            ",
            span { "Find your" }
            span { style: "color:#4F46E5;", "college" }
        }
    }
}

#[component]
fn SubText() -> Element {
    rsx! {
        div {
            style: "
                color: #111827;
                font-size: 26px;
                line-height: 1.6;
                max-width: 620px;
                font-weight: 500;
            ",
            "Browse colleges by stream, degree, location, fees and rating. Every search is a link you can share."
        }
    }
}

#[component]
fn TextSearchCard() -> Element {
    rsx! {
        div {
            id: "x-card-text-search",
            style: "
                display:flex;
                flex-direction: column;
                gap: 14px;
                width: 520px;
                min-height: 240px;
                border-radius: 22px;
                padding: 22px 22px 26px 22px;
                background: linear-gradient(135deg, #2D208A 0%, #5B3DF5 100%);
                color: white;
                box-shadow: 0 8px 24px rgba(0,0,0,0.12);
            ",

            div {
                style: "font-size: 30px; font-weight: 500;",
                "Search"
            }
            div {
                style: "
                    font-size: 20px;
                    font-weight: 500;
                    line-height: 1.5;
                    color: rgba(255,255,255,0.92);
                ",
                "Look up a college by name, or start from a course or a city and narrow down with filters."
            }
            div { style: "height: 8px; padding-top: 7px; margin-top:7px; border-top: 1px solid white; width: 100%; " }
            SearchCardInput {}
        }
    }
}

#[component]
fn SearchCardInput() -> Element {
    let n2 = navigator();
    let mut search_q = use_signal(|| "".to_string());
    rsx! {
        div {
            style: "
                display:flex;
                align-items:center;
                gap: 10px;
                background-color: white;
                border-radius: 9999px;
                padding: 10px 14px;
                height: 42px;
                color: #111827;
            ",
            Icon { icon: MdSearch, style: "width: 20px; height: 20px; color:#6B7280;" }
            input {
                r#type: "text",
                placeholder: "e.g. IIT Bombay, MBBS, Pune",
                style: "
                    flex:1;
                    border: none;
                    outline: none;
                    background: transparent;
                    color: #111827;
                    font-size: 14px;
                ",
                oninput: move |e| {
                    *search_q.write() = e.value();
                },
                onkeypress: move |e| {
                    if e.key() == Key::Enter {
                        e.prevent_default();
                        n2.push(listing_route(&[FilterChange::SetFreeText(search_q.read().clone())]));
                    }
                },
            }
        }
    }
}

#[component]
fn QuickStartCard() -> Element {
    let shortcuts = [
        ("Engineering colleges in Pune", listing_route(&[pick(CategoricalFacet::Stream, "Engineering"), pick(CategoricalFacet::City, "Pune")])),
        ("Government medical colleges", listing_route(&[pick(CategoricalFacet::Stream, "Medical"), pick(CategoricalFacet::Ownership, "Government")])),
        ("MBA programs in Mumbai", listing_route(&[pick(CategoricalFacet::Degree, "MBA"), pick(CategoricalFacet::City, "Mumbai")])),
        ("Law schools in New Delhi", listing_route(&[pick(CategoricalFacet::Stream, "Law"), pick(CategoricalFacet::City, "New Delhi")])),
    ];

    rsx! {
        div {
            id: "x-card-quick-start",
            style: "
                display:flex;
                flex-direction: column;
                gap: 12px;
                width: 520px;
                min-height: 240px;
                border-radius: 22px;
                padding: 22px 22px 26px 22px;
                background: linear-gradient(135deg, #0B7A2B 0%, #23A340 60%, #178E35 100%);
                color: white;
                box-shadow: 0 8px 24px rgba(0,0,0,0.12);
            ",
            div {
                style: "font-size: 26px; font-weight: 500;",
                "Popular searches"
            }
            for (label, route) in shortcuts {
                Link {
                    key: "{label}",
                    to: route,
                    class: "x-quick-start-link",
                    "{label}"
                }
            }
        }
    }
}
