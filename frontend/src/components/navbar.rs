//! Top navigation bar component.

use dioxus::prelude::*;
use dioxus_free_icons::icons::md_action_icons::MdHome;
use dioxus_free_icons::icons::md_social_icons::MdSchool;
use dioxus_free_icons::{Icon, IconShape};

use crate::components::error_boundary::GlobalErrorBoundary;
use crate::routes::Route;

/// Shared navbar component.
#[component]
pub fn Navbar() -> Element {
    rsx! {
        div {
            id: "x-nav-container",
            style: "
                display: flex;
                flex-direction: column;
                width: 100%;
                height: 100%;
            ",

            div {
                id: "x-nav-topbar",
                style: "
                    display: flex;
                    flex-direction: row;
                    align-items: center;
                    gap: 24px;
                    height: 56px;
                    padding: 0 20px;
                    background-color: #1C212D;
                    flex-shrink: 0;
                ",
                Link {
                    to: Route::HomePage {},
                    span {
                        style: "color: white; font-size: 22px; font-weight: 500; letter-spacing: -0.01em;",
                        "College Finder"
                    }
                }
                div { style: "flex-grow: 1;" }
                IconLink { to: Route::HomePage {}, icon: MdHome, label: "Home" }
                IconLink { to: Route::listing_from_query(""), icon: MdSchool, label: "Browse colleges" }
            }

            div {
                id: "x-page-container",
                style: "flex-grow: 1; min-height: 100px;",
                GlobalErrorBoundary {
                    boundary_name: "Navbar".to_string(),
                    Outlet::<Route> {}
                }
            }
        }
    }
}

#[component]
fn IconLink<T: IconShape + Clone + PartialEq + 'static>(to: Route, icon: T, label: String) -> Element {
    rsx! {
        Link {
            to: to,
            span {
                title: "{label}",
                style: "color: white; display: flex; align-items: center; gap: 6px; font-size: 15px;",
                Icon { icon: icon, style: "width: 24px; height: 24px;" }
                "{label}"
            }
        }
    }
}
