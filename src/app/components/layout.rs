//! Dashboard layout: sidebar, header and the content region.

use dioxus::prelude::*;

use super::nav::Sidebar;
use super::section::SectionView;
use crate::view::{elements, DashboardView, UiEvent};

#[derive(Props, Clone, PartialEq)]
pub struct DashboardShellProps {
    pub view: DashboardView,
    pub on_event: EventHandler<UiEvent>,
}

/// Full-screen dashboard for one role.
#[component]
pub fn DashboardShell(props: DashboardShellProps) -> Element {
    let view = props.view;
    let on_event = props.on_event;
    let full_title = format!("{} - Distribution Portal", view.title);

    rsx! {
        document::Title { "{full_title}" }

        div { class: "flex h-screen bg-gray-50",
            Sidebar {
                title: view.role.display_name().to_string(),
                nav: view.nav.clone(),
                active: view.active.clone(),
                on_event,
            }
            div { class: "flex-1 flex flex-col overflow-hidden",
                header { class: "bg-white border-b border-gray-200 px-8 py-4 flex items-center justify-between",
                    div {
                        h2 { class: "text-2xl font-bold text-gray-900", "{view.title}" }
                        p { class: "text-gray-600 text-sm mt-1", "{view.subtitle}" }
                    }
                    button {
                        class: "px-3 py-2 text-sm text-gray-600 hover:bg-gray-100 rounded-lg",
                        r#type: "button",
                        onclick: move |_| on_event.call(UiEvent::click(elements::REFRESH)),
                        "Refresh"
                    }
                }
                main { class: "flex-1 overflow-auto",
                    div { class: "p-8",
                        SectionView { content: view.content, on_event }
                    }
                }
            }
        }
    }
}
