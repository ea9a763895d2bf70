//! Runs the search controller inside the Dioxus runtime.
//!
//! The router is the address: the listing route's query string is the
//! encoded filter state. Route changes are reported to the controller,
//! tagged as echoes when they match a write we made ourselves, or as
//! history traversals when the browser fired `popstate` first. Fetches and
//! debounce timers run as spawned tasks that feed their completion back.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use controller::{
    ControllerConfig, ControllerEvent, Effect, NavigationKind, PendingWrites, Synchronizer, WriteMode, run_fetch,
};
use dioxus::logger::tracing::{debug, info, warn};
use dioxus::core::Task;
use dioxus::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::api::search_api::ServerFnBackend;
use crate::data_definitions::url_param::ListingQuery;
use crate::routes::Route;

#[derive(Clone, Copy)]
pub struct SearchContext {
    pub sync: Signal<Synchronizer>,
    started: Signal<bool>,
    own_writes: Signal<PendingWrites>,
    popped: Signal<Rc<Cell<bool>>>,
    fetch_tasks: Signal<HashMap<u64, Task>>,
}

/// Creates the search context for a listing page and provides it to the
/// page's children.
pub fn use_search_context(query: ReadSignal<ListingQuery>) -> SearchContext {
    let sync = use_signal(|| Synchronizer::new(&ControllerConfig::default()));
    let started = use_signal(|| false);
    let own_writes = use_signal(PendingWrites::default);
    let popped = use_signal(|| Rc::new(Cell::new(false)));
    let fetch_tasks = use_signal(HashMap::new);
    let ctx = use_context_provider(|| SearchContext { sync, started, own_writes, popped, fetch_tasks });
    use_popstate_listener(popped.peek().clone());

    // the route is not reset by navigation, so every new query string is an address change
    use_effect(move || {
        let query = query.read().to_string();
        ctx.on_address(query);
    });

    ctx
}

impl SearchContext {
    pub fn dispatch(mut self, event: impl Into<ControllerEvent>) {
        let effects = self.sync.write().handle(event);
        self.run(effects);
    }

    fn on_address(mut self, query: String) {
        if !*self.started.peek() {
            self.started.set(true);
            info!(%query, "starting search context");
            let effects = self.sync.write().start(&query);
            self.run(effects);
            return;
        }

        let kind = if self.popped.peek().replace(false) { NavigationKind::Traversal } else { NavigationKind::Load };
        let change = {
            let sync = self.sync.peek();
            self.own_writes.write().classify(&query, kind, sync.codec())
        };
        debug!(origin = ?change.origin, "route changed");
        self.dispatch(change);
    }

    fn run(mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::WriteAddress { query, write, mode } => {
                    self.own_writes.write().record(write, &query);
                    let route = Route::CollegeListingPage { query: ListingQuery::from(query.as_str()) };
                    match mode {
                        WriteMode::Push => navigator().push(route),
                        WriteMode::Replace => navigator().replace(route),
                    };
                }
                Effect::FetchPage { ticket, request } => {
                    let seq = ticket.seq;
                    let task = spawn(async move {
                        let effect = Effect::FetchPage { ticket, request };
                        if let Some(event) = run_fetch(&ServerFnBackend, effect).await {
                            let mut fetch_tasks = self.fetch_tasks;
                            fetch_tasks.write().remove(&seq);
                            self.dispatch(event);
                        }
                    });
                    self.fetch_tasks.write().insert(seq, task);
                }
                Effect::CancelFetch { ticket } => {
                    if let Some(task) = self.fetch_tasks.write().remove(&ticket.seq) {
                        debug!(seq = ticket.seq, "cancelling superseded fetch");
                        task.cancel();
                    }
                }
                Effect::StartSuggestionTimer { timer, delay } => {
                    spawn(async move {
                        sleep(delay).await;
                        self.dispatch(ControllerEvent::SuggestionTimerElapsed(timer));
                    });
                }
                effect @ Effect::FetchSuggestions { .. } => {
                    spawn(async move {
                        if let Some(event) = run_fetch(&ServerFnBackend, effect).await {
                            self.dispatch(event);
                        }
                    });
                }
            }
        }
    }
}

async fn sleep(delay: Duration) {
    #[cfg(not(feature = "server"))]
    gloo_timers::future::sleep(delay).await;
    #[cfg(feature = "server")]
    tokio::time::sleep(delay).await;
}

/// Sets `popped` whenever the browser fires `popstate`, i.e. on back and
/// forward. The route change that follows is then reported as a traversal.
fn use_popstate_listener(popped: Rc<Cell<bool>>) {
    let listener = use_hook(|| Rc::new(Closure::<dyn FnMut()>::new(move || popped.set(true))));
    let registered = use_hook(|| Rc::new(Cell::new(false)));

    let on_mount = (Rc::clone(&listener), Rc::clone(&registered));
    use_effect(move || {
        let (listener, registered) = &on_mount;
        if registered.get() {
            return;
        }
        let Some(window) = web_sys::window() else { return };
        match window.add_event_listener_with_callback("popstate", listener.as_ref().as_ref().unchecked_ref()) {
            Ok(()) => registered.set(true),
            Err(e) => warn!("popstate listener not registered: {e:?}"),
        }
    });

    use_drop(move || {
        if !registered.get() {
            return;
        }
        if let Some(window) = web_sys::window() {
            let _ = window.remove_event_listener_with_callback("popstate", listener.as_ref().as_ref().unchecked_ref());
        }
    });
}
