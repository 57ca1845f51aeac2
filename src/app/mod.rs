//! Dioxus web application.
//!
//! The UI layer holds no navigation state of its own. It draws the surface
//! snapshot and forwards every click/submit to [`Portal::handle`]; the
//! surface observer bumps a signal so the tree re-renders after each change.

use dioxus::prelude::*;
use std::rc::Rc;
use std::time::Duration;

use crate::api::HttpApi;
use crate::nav::{History, Portal};
use crate::view::{Screen, Surface, UiEvent};

pub mod components;
pub mod pages;

use components::DashboardShell;
use pages::{LoginPage, NotFoundPage};

const DEFAULT_API_BASE: &str = "http://localhost:3000";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// API origin: the page's own origin in the browser.
fn api_base_url() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(origin) = web_sys::window().and_then(|w| w.location().origin().ok()) {
            return origin;
        }
    }
    DEFAULT_API_BASE.to_string()
}

fn history() -> Rc<dyn History> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(crate::nav::BrowserHistory)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(crate::nav::MemoryHistory::default())
    }
}

fn build_portal() -> Result<Portal, String> {
    let api = Rc::new(HttpApi::new(&api_base_url(), REQUEST_TIMEOUT).map_err(|e| e.to_string())?);
    Ok(Portal::new(history(), api.clone(), api, Surface::new()))
}

/// Root app component.
#[component]
pub fn App() -> Element {
    let portal = use_hook(build_portal);
    let revision = use_signal(|| 0u64);

    let started = portal.clone();
    use_future(move || {
        let started = started.clone();
        async move {
            let Ok(portal) = started else {
                return;
            };
            portal.surface().observe(move |rev| {
                let mut revision = revision;
                revision.set(rev);
            });
            #[cfg(target_arch = "wasm32")]
            portal.listen_popstate();
            portal.start().await;
        }
    });

    let portal = match portal {
        Ok(portal) => portal,
        Err(message) => {
            return rsx! {
                div { class: "p-8 text-red-700", "Portal failed to start: {message}" }
            };
        }
    };

    // subscribe to surface changes
    let _ = revision();
    let screen = portal.surface().screen();

    let on_event = EventHandler::new(move |event: UiEvent| {
        let portal = portal.clone();
        spawn(async move {
            portal.handle(event).await;
        });
    });

    rsx! {
        document::Script { src: "https://cdn.tailwindcss.com" }
        match screen {
            Screen::Blank => rsx! {
                div { class: "flex h-screen items-center justify-center text-gray-500", aria_busy: "true", "Loading…" }
            },
            Screen::Login(view) => rsx! {
                LoginPage { view, on_event }
            },
            Screen::NotFound(view) => rsx! {
                NotFoundPage { view, on_event }
            },
            Screen::Dashboard(view) => rsx! {
                DashboardShell { view, on_event }
            },
        }
    }
}
