//! One college in the result list.

use common::search_result::CollegeSummary;
use dioxus::prelude::*;
use dioxus_free_icons::{Icon, icons::{md_communication_icons::{MdBusiness, MdLocationOn}, md_social_icons::MdSchool, md_toggle_icons::MdStar}};

#[component]
pub fn SearchResultItemCard(result: ReadSignal<CollegeSummary>, item_index: u64) -> Element {
    let CollegeSummary { name, ownership, rating, annual_fees, streams, .. } = result.read().clone();
    let location = result.read().location();

    rsx! {
        div {
            class: "x-college-card",
            // Row 1: INDEX - ICON - NAME - SPACER - RATING
            div {
                style: "
                    display: flex;
                    flex-direction: row;
                    align-items: center;
                    gap: 12px;
                    width: 100%;
                ",
                span {
                    style: "font-size: 20px; font-weight: 200; color: rgba(0, 0, 0, 0.5);",
                    "{item_index}."
                }
                Icon { icon: MdSchool, style: "width: 20px; height: 20px; color: rgba(0, 0, 0, 0.5); flex-shrink: 0;" }
                div {
                    class: "x-college-name",
                    "{name}"
                }
                div { style: "flex: 1 1 auto;" }
                if let Some(rating) = rating {
                    RatingBadge { rating }
                }
            }
            // Row 2: LOCATION - OWNERSHIP - FEES
            div {
                class: "x-college-facts",
                if let Some(location) = location {
                    span {
                        Icon { icon: MdLocationOn, style: "width: 18px; height: 18px;" }
                        "{location}"
                    }
                }
                if let Some(ownership) = ownership {
                    span {
                        Icon { icon: MdBusiness, style: "width: 18px; height: 18px;" }
                        "{ownership}"
                    }
                }
                if let Some(fees) = annual_fees {
                    span { "{format_fees(fees)} / year" }
                }
            }
            // Row 3: STREAMS
            if !streams.is_empty() {
                div {
                    class: "x-college-streams",
                    for stream in streams {
                        span { key: "{stream}", class: "x-stream-tag", "{stream}" }
                    }
                }
            }
        }
    }
}

#[component]
fn RatingBadge(rating: f32) -> Element {
    rsx! {
        span {
            class: "x-rating-badge",
            Icon { icon: MdStar, style: "width: 18px; height: 18px; color: #E0A100;" }
            "{rating:.1}"
        }
    }
}

/// Rupee amounts in lakh when large enough, plain otherwise.
fn format_fees(fees: u64) -> String {
    const LAKH: u64 = 100_000;
    if fees >= LAKH {
        let lakhs = fees as f64 / LAKH as f64;
        format!("₹{lakhs:.1} L")
    } else {
        format!("₹{fees}")
    }
}
