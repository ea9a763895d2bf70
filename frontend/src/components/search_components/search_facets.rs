//! Facet chips: multi-select facets, range facets, sort and clear-all.

use common::facets::{CategoricalFacet, RangeFacet, SortMode};
use common::search_query::FilterChange;
use controller::UserIntent;
use dioxus::prelude::*;
use dioxus_free_icons::icons::md_action_icons::{MdAccountBalance, MdAssignment, MdBook, MdClass};
use dioxus_free_icons::icons::md_communication_icons::{MdBusiness, MdLocationOn};
use dioxus_free_icons::icons::md_content_icons::{MdClear, MdSort};
use dioxus_free_icons::icons::md_editor_icons::MdAttachMoney;
use dioxus_free_icons::icons::md_maps_icons::{MdMap, MdPlace};
use dioxus_free_icons::icons::md_navigation_icons::MdArrowDropDown;
use dioxus_free_icons::icons::md_social_icons::{MdPeople, MdSchool};
use dioxus_free_icons::icons::md_toggle_icons::{MdCheckBox, MdCheckBoxOutlineBlank, MdRadioButtonChecked, MdRadioButtonUnchecked, MdStar};
use dioxus_free_icons::{Icon, IconShape};

use crate::data_definitions::search_context::SearchContext;

/// Which chip has its panel open. At most one at a time.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Chip {
    Categorical(CategoricalFacet),
    Range(RangeFacet),
    Sort,
}

#[derive(Clone, Copy)]
struct FacetContext {
    expanded: Signal<Option<Chip>>,
}

#[component]
pub fn FacetButtonStrip() -> Element {
    let ctx = use_context::<SearchContext>();
    let sync = ctx.sync;
    let expanded = use_signal(|| None);
    use_context_provider(|| FacetContext { expanded });
    let active_filter_count = use_memo(move || sync.read().state().active_filter_count());

    rsx! {
        div {
            id: "x-search-input-facet-chips-wrapper",
            style: "
                width: 100%;
                max-width: 100%;
                display: flex;
                flex-direction: row;
                flex-wrap: wrap;
                gap: 10px;
                padding: 10px 16px;
                align-items: center;
            ",

            FacetButton { facet: CategoricalFacet::Stream, facet_icon: MdSchool }
            FacetButton { facet: CategoricalFacet::Degree, facet_icon: MdAssignment }
            FacetButton { facet: CategoricalFacet::Specialization, facet_icon: MdBook }
            FacetButton { facet: CategoricalFacet::State, facet_icon: MdMap }
            FacetButton { facet: CategoricalFacet::City, facet_icon: MdLocationOn }
            FacetButton { facet: CategoricalFacet::LocationType, facet_icon: MdPlace }
            FacetButton { facet: CategoricalFacet::Ownership, facet_icon: MdBusiness }
            FacetButton { facet: CategoricalFacet::Management, facet_icon: MdPeople }
            FacetButton { facet: CategoricalFacet::InstitutionCategory, facet_icon: MdAccountBalance }
            FacetButton { facet: CategoricalFacet::CollegeType, facet_icon: MdClass }

            RangeButton { facet: RangeFacet::Fees, facet_icon: MdAttachMoney }
            RangeButton { facet: RangeFacet::Rating, facet_icon: MdStar }

            SortButton {}

            if active_filter_count() > 0 {
                button {
                    class: "x-facet-chip x-clear-all",
                    onclick: move |_| ctx.dispatch(UserIntent::Filter(FilterChange::ClearAll)),
                    Icon { icon: MdClear, style: "width: 20px; height: 20px;" }
                    "Clear all ({active_filter_count})"
                }
            }
        }
    }
}

/// A chip with a drop-down panel. Clicking outside the panel closes it.
#[component]
fn ChipShell<I: IconShape + Clone + PartialEq + 'static>(
    chip: Chip,
    label: String,
    is_filtered: bool,
    facet_icon: I,
    children: Element,
) -> Element {
    let mut facet_context = use_context::<FacetContext>();
    let is_expanded = *facet_context.expanded.read() == Some(chip);
    let border_color = if is_filtered { "rgba(0,0,255,0.9)" } else { "rgba(0,0,0,0.5)" };
    let button_z_level = if is_expanded { 1000 } else { 888 };

    rsx! {
        div {
            style: "position: relative;",
            button {
                class: "x-facet-chip",
                style: "border: 2px solid {border_color}; z-index: {button_z_level};",
                onclick: move |_| {
                    let next = if is_expanded { None } else { Some(chip) };
                    facet_context.expanded.set(next);
                },
                Icon { icon: facet_icon, style: "width: 20px; height: 20px; color:rgba(0,0,0,0.9);" }
                "{label}"
                Icon { icon: MdArrowDropDown, style: "width: 20px; height: 20px; color:rgba(0,0,0,0.9);" }
            }
            if is_expanded {
                div {
                    class: "x-facet-backdrop",
                    onclick: move |_| facet_context.expanded.set(None),
                }
                div {
                    class: "x-facet-panel",
                    {children}
                }
            }
        }
    }
}

#[component]
fn FacetButton<I: IconShape + Clone + PartialEq + 'static>(facet: CategoricalFacet, facet_icon: I) -> Element {
    let ctx = use_context::<SearchContext>();
    let sync = ctx.sync;
    let selected_count = use_memo(move || sync.read().state().values(facet).map_or(0, |values| values.len()));
    let label = match selected_count() {
        0 => facet.display_name().to_string(),
        n => format!("{} ({n})", facet.display_name()),
    };

    rsx! {
        ChipShell {
            chip: Chip::Categorical(facet),
            label,
            is_filtered: selected_count() > 0,
            facet_icon,
            FacetSelectorList { facet }
        }
    }
}

#[component]
fn FacetSelectorList(facet: CategoricalFacet) -> Element {
    let ctx = use_context::<SearchContext>();
    let sync = ctx.sync;
    let mut narrow = use_signal(String::new);
    let values = use_memo(move || {
        let needle = narrow.read().trim().to_lowercase();
        sync.read()
            .codec()
            .vocabulary()
            .values(facet)
            .iter()
            .filter(|value| needle.is_empty() || value.to_lowercase().contains(&needle))
            .cloned()
            .collect::<Vec<_>>()
    });
    let has_selection = use_memo(move || sync.read().state().values(facet).is_some());

    rsx! {
        div {
            style: "display: flex; flex-direction: row; gap: 8px; align-items: center;",
            input {
                r#type: "text",
                class: "x-facet-narrow",
                placeholder: "Filter {facet.display_name()}",
                value: "{narrow}",
                oninput: move |event: Event<FormData>| narrow.set(event.value()),
            }
            if has_selection() {
                button {
                    class: "x-facet-clear",
                    onclick: move |_| ctx.dispatch(UserIntent::Filter(FilterChange::ClearFacet(facet))),
                    "Clear"
                }
            }
        }
        ul {
            class: "x-facet-list",
            for value in values() {
                li {
                    key: "{value}",
                    FacetCheckbox { facet, value: value.clone() }
                }
            }
        }
    }
}

#[component]
fn FacetCheckbox(facet: CategoricalFacet, value: String) -> Element {
    let ctx = use_context::<SearchContext>();
    let sync = ctx.sync;
    let checked_value = value.clone();
    let is_checked = use_memo(move || sync.read().state().is_selected(facet, &checked_value));
    let toggled_value = value.clone();

    rsx! {
        div {
            class: "x-facet-list-item",
            onclick: move |_e| {
                ctx.dispatch(UserIntent::Filter(FilterChange::ToggleValue { facet, value: toggled_value.clone() }));
            },

            if is_checked() {
                Icon { icon: MdCheckBox, style: "width: 26px; height: 26px; color: rgb(28, 33, 45); flex-shrink: 0;" }
            } else {
                Icon { icon: MdCheckBoxOutlineBlank, style: "width: 26px; height: 26px; color: black; flex-shrink: 0;" }
            }
            div {
                class: "x-facet-value",
                "{value}"
            }
        }
    }
}

#[component]
fn RangeButton<I: IconShape + Clone + PartialEq + 'static>(facet: RangeFacet, facet_icon: I) -> Element {
    let ctx = use_context::<SearchContext>();
    let sync = ctx.sync;
    let active = use_memo(move || sync.read().state().range(facet));
    let label = match active() {
        Some(token) => format!("{}: {}", facet.display_name(), token.label()),
        None => facet.display_name().to_string(),
    };

    rsx! {
        ChipShell {
            chip: Chip::Range(facet),
            label,
            is_filtered: active().is_some(),
            facet_icon,
            ul {
                class: "x-facet-list",
                li {
                    RadioRow {
                        label: "Any".to_string(),
                        selected: active().is_none(),
                        onselect: move |_| ctx.dispatch(UserIntent::Filter(FilterChange::ClearRange(facet))),
                    }
                }
                for token in facet.tokens() {
                    li {
                        key: "{token.token()}",
                        RadioRow {
                            label: token.label().to_string(),
                            selected: active() == Some(token),
                            onselect: move |_| ctx.dispatch(UserIntent::Filter(FilterChange::SetRange(token))),
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn SortButton() -> Element {
    let ctx = use_context::<SearchContext>();
    let sync = ctx.sync;
    let sort = use_memo(move || sync.read().state().sort);

    rsx! {
        ChipShell {
            chip: Chip::Sort,
            label: format!("Sort: {}", sort().label()),
            is_filtered: sort() != SortMode::default(),
            facet_icon: MdSort,
            ul {
                class: "x-facet-list",
                for mode in SortMode::ALL {
                    li {
                        key: "{mode.token()}",
                        RadioRow {
                            label: mode.label().to_string(),
                            selected: sort() == mode,
                            onselect: move |_| ctx.dispatch(UserIntent::Filter(FilterChange::SetSort(mode))),
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn RadioRow(label: String, selected: bool, onselect: Callback<()>) -> Element {
    rsx! {
        div {
            class: "x-facet-list-item",
            onclick: move |_| onselect(()),
            if selected {
                Icon { icon: MdRadioButtonChecked, style: "width: 24px; height: 24px; flex-shrink: 0;" }
            } else {
                Icon { icon: MdRadioButtonUnchecked, style: "width: 24px; height: 24px; flex-shrink: 0;" }
            }
            div { class: "x-facet-value", "{label}" }
        }
    }
}
