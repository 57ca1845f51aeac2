//! 404 page.

use dioxus::prelude::*;

use crate::view::{elements, NotFoundView, UiEvent};

#[component]
pub fn NotFoundPage(view: NotFoundView, on_event: EventHandler<UiEvent>) -> Element {
    rsx! {
        document::Title { "Page not found - Distribution Portal" }

        div { class: "min-h-screen flex items-center justify-center bg-gray-100",
            div { class: "text-center space-y-4",
                h1 { class: "text-6xl font-bold text-gray-900", "404" }
                p { class: "text-xl text-gray-600", "Page not found" }
                if let Some(path) = view.attempted.as_ref() {
                    p { class: "text-sm text-gray-500 font-mono", "{path}" }
                }
                button {
                    class: "px-4 py-2 bg-blue-600 hover:bg-blue-700 text-white rounded-lg font-medium",
                    r#type: "button",
                    onclick: move |_| on_event.call(UiEvent::click(elements::GO_BACK)),
                    "Go back"
                }
            }
        }
    }
}
