//! Error displays: render failures and failed fetches.

use controller::{FetchError, FetchFailure};
use dioxus::prelude::*;
use dioxus_free_icons::{Icon, icons::md_navigation_icons::MdRefresh};

#[component]
pub fn GlobalErrorBoundary(boundary_name: ReadSignal<String>, children: Element) -> Element {
    rsx! {
        ErrorBoundary {
            handle_error: move |_err: ErrorContext| {
                rsx! {
                    h1 {
                        style: "color:red; font-size: 54px; border: 1px solid red; padding: 10px; border-radius: 5px; margin: 15px;",
                        "Error",
                    }
                    p {
                        style: "color:darkred; font-size: 26px; border: 1px solid red; padding: 10px; border-radius: 5px; margin: 15px;",
                        "Boundary: {boundary_name}"
                    }
                    a {
                        href: "/",
                        style: "color:blue; font-size: 26px; border: 1px solid blue; padding: 10px; border-radius: 5px; margin: 15px;",
                        "Return to Home Page"
                    }
                    pre {
                        style: "color:black; border: 1px solid red; padding: 10px; border-radius: 5px; margin: 15px; text-wrap: auto;",
                        "{_err:#?}"
                    }
                }
            },
            children
        }
    }
}

#[component]
pub fn ComponentErrorBoundary(children: Element) -> Element {
    rsx! {
        ErrorBoundary {
            handle_error: |_err: ErrorContext| {
                let error_txt = match _err.error() {
                    Some(err) => format!("{:#?}", err.0),
                    None => "Unknown error".to_string(),
                };
                rsx! {
                    ComponentErrorDisplay {
                        title: "Component Error".to_string(),
                        error_txt,
                        button {
                            class: "x-retry-button",
                            onclick: move |_| {
                                _err.clear_errors();
                            },
                            "Try Again"
                        }
                    }
                }
            },
            div {
                width: "100%",
                height: "100%",
                {children}
            }
        }
    }
}

#[component]
pub fn ComponentErrorDisplay(title: ReadSignal<String>, error_txt: ReadSignal<String>, children: Element) -> Element {
    rsx! {
        div {
            width: "100%",
            display: "flex",
            flex_direction: "column",
            align_items: "center",
            justify_content: "center",
            padding: "24px 0",

            h1 {
                style: "color:red; font-size: 28px; border: 1px solid red; padding: 10px; border-radius: 5px; margin: 5px;",
                "{title}",
            }

            pre {
                style: "color:darkred; border: 1px solid red; padding: 10px; border-radius: 5px; margin: 5px; text-wrap: auto; max-width: 500px; max-height: 400px; overflow-y: auto;",
                "{error_txt}"
            }

            {children}
        }
    }
}

fn describe(error: &FetchError) -> String {
    match error {
        FetchError::TimedOut => "The college directory took too long to answer.".to_string(),
        FetchError::Rejected(message) => format!("The college directory could not answer this search: {message}"),
        FetchError::Transport(message) => format!("Could not reach the college directory: {message}"),
    }
}

/// A failed page fetch. Results on screen stay as they were.
#[component]
pub fn FetchFailureDisplay(failure: ReadSignal<FetchFailure>, on_retry: Callback<()>) -> Element {
    let error_txt = describe(&failure.read().error);
    rsx! {
        ComponentErrorDisplay {
            title: "Search failed".to_string(),
            error_txt,
            button {
                class: "x-retry-button",
                onclick: move |_| on_retry(()),
                Icon { icon: MdRefresh, style: "width: 20px; height: 20px;" }
                "Retry"
            }
        }
    }
}

#[component]
pub fn LoadingIndicator() -> Element {
    rsx! {
        div {
            class: "x-loading-indicator",
            "Loading..."
        }
    }
}
