//! Dashboard sidebar with mobile toggle.

use dioxus::prelude::*;

use crate::view::{elements, NavItem, UiEvent};

#[derive(Props, Clone, PartialEq)]
pub struct SidebarProps {
    /// Role name shown above the navigation
    pub title: String,
    pub nav: Vec<NavItem>,
    /// The active section id
    pub active: String,
    pub on_event: EventHandler<UiEvent>,
}

#[component]
pub fn Sidebar(props: SidebarProps) -> Element {
    let mut menu_open = use_signal(|| false);
    let on_event = props.on_event;

    let item_class = |id: &str| {
        if props.active == id {
            "w-full flex items-center gap-3 px-4 py-3 rounded-lg bg-white text-gray-900 font-medium shadow"
        } else {
            "w-full flex items-center gap-3 px-4 py-3 rounded-lg text-gray-300 hover:bg-gray-700"
        }
    };

    let panel_class = if menu_open() {
        "translate-x-0"
    } else {
        "-translate-x-full lg:translate-x-0"
    };

    rsx! {
        button {
            class: "lg:hidden fixed top-4 left-4 z-40 p-2 bg-gray-800 text-white rounded-lg",
            r#type: "button",
            onclick: move |_| menu_open.toggle(),
            span { class: "sr-only", "Toggle menu" }
            if menu_open() { "✕" } else { "☰" }
        }

        div { class: "{panel_class} fixed lg:relative w-64 h-screen bg-gray-800 text-white flex flex-col z-30 overflow-y-auto",
            div { class: "p-6 border-b border-gray-700",
                h1 { class: "text-2xl font-bold", "{props.title}" }
                p { class: "text-gray-400 text-sm mt-1", "Distribution System" }
            }

            nav { class: "flex-1 p-4 space-y-2",
                for item in props.nav.iter() {
                    button {
                        key: "{item.id}",
                        class: item_class(&item.id),
                        r#type: "button",
                        "data-icon": item.icon,
                        onclick: {
                            let element = elements::nav(&item.id);
                            move |_| {
                                menu_open.set(false);
                                on_event.call(UiEvent::click(element.clone()));
                            }
                        },
                        span { "{item.label}" }
                    }
                }
            }

            div { class: "p-4 border-t border-gray-700",
                button {
                    class: "w-full px-4 py-2 bg-red-600 hover:bg-red-700 rounded-lg text-white font-medium",
                    r#type: "button",
                    onclick: move |_| on_event.call(UiEvent::click(elements::LOGOUT)),
                    "Logout"
                }
            }
        }
    }
}
