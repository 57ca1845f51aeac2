//! Draws a section unit's [`Renderable`] output.

use dioxus::prelude::*;

use super::form::FormView;
use crate::view::{Block, Cell, Notice, Renderable, Stat, Table, Tone, Trigger, UiEvent};

#[derive(Props, Clone, PartialEq)]
pub struct SectionViewProps {
    pub content: Renderable,
    pub on_event: EventHandler<UiEvent>,
}

#[component]
pub fn SectionView(props: SectionViewProps) -> Element {
    let content = props.content;
    let on_event = props.on_event;

    rsx! {
        section { class: "space-y-6",
            div {
                h3 { class: "text-xl font-semibold text-gray-900", "{content.heading}" }
                if let Some(sub) = content.subheading.as_ref() {
                    p { class: "text-gray-600 text-sm", "{sub}" }
                }
            }
            for (i, block) in content.blocks.into_iter().enumerate() {
                BlockView { key: "{i}", block, on_event }
            }
        }
    }
}

#[component]
fn BlockView(block: Block, on_event: EventHandler<UiEvent>) -> Element {
    match block {
        Block::Notice(notice) => rsx! { NoticeBanner { notice } },
        Block::Stats(stats) => rsx! { StatGrid { stats } },
        Block::Table(table) => rsx! { DataTable { table, on_event } },
        Block::Form(form) => {
            // a cleared draft must remount with fresh inputs
            let key = form
                .fields
                .iter()
                .map(|f| f.value.as_str())
                .collect::<Vec<_>>()
                .join("\u{1f}");
            rsx! { FormView { key: "{form.element}-{key}", form, on_event } }
        }
        Block::Actions(triggers) => rsx! {
            div { class: "flex flex-wrap gap-3",
                for trigger in triggers {
                    TriggerButton { key: "{trigger.element}", trigger, primary: true, on_event }
                }
            }
        },
        Block::Empty(text) => rsx! {
            div { class: "bg-white rounded-lg shadow p-8 text-center text-gray-500", "{text}" }
        },
    }
}

#[component]
fn NoticeBanner(notice: Notice) -> Element {
    let class = match notice.tone {
        Tone::Success => "p-4 rounded-lg bg-green-50 text-green-800 border border-green-200",
        Tone::Error => "p-4 rounded-lg bg-red-50 text-red-800 border border-red-200",
        Tone::Info => "p-4 rounded-lg bg-blue-50 text-blue-800 border border-blue-200",
    };
    let role = if notice.tone == Tone::Error { "alert" } else { "status" };
    rsx! {
        div { class, role, "{notice.text}" }
    }
}

#[component]
fn StatGrid(stats: Vec<Stat>) -> Element {
    rsx! {
        div { class: "grid grid-cols-1 md:grid-cols-3 gap-4",
            for stat in stats {
                div { key: "{stat.label}", class: "bg-white rounded-lg shadow p-6",
                    p { class: "text-sm text-gray-500", "{stat.label}" }
                    p { class: "text-3xl font-bold text-gray-900 mt-2", "{stat.value}" }
                }
            }
        }
    }
}

#[component]
fn DataTable(table: Table, on_event: EventHandler<UiEvent>) -> Element {
    rsx! {
        div { class: "bg-white rounded-lg shadow overflow-x-auto",
            table { class: "min-w-full divide-y divide-gray-200",
                thead { class: "bg-gray-50",
                    tr {
                        for column in table.columns.iter() {
                            th { class: "px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase", "{column}" }
                        }
                    }
                }
                tbody { class: "divide-y divide-gray-200",
                    for (r, row) in table.rows.into_iter().enumerate() {
                        tr { key: "{r}", class: "hover:bg-gray-50",
                            for cell in row.cells {
                                td { class: "px-6 py-4 text-sm text-gray-900 whitespace-nowrap",
                                    match cell {
                                        Cell::Text(text) => rsx! { "{text}" },
                                        Cell::Badge(text) => rsx! {
                                            span { class: "px-2 py-1 rounded-full text-xs font-medium bg-gray-100 text-gray-800", "{text}" }
                                        },
                                        Cell::Actions(triggers) => rsx! {
                                            div { class: "flex gap-2",
                                                for trigger in triggers {
                                                    TriggerButton { key: "{trigger.element}", trigger, primary: false, on_event }
                                                }
                                            }
                                        },
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Button that reports a click on its trigger's element id.
#[component]
pub fn TriggerButton(trigger: Trigger, primary: bool, on_event: EventHandler<UiEvent>) -> Element {
    let class = if primary {
        "px-4 py-2 bg-blue-600 hover:bg-blue-700 text-white rounded-lg font-medium"
    } else {
        "px-3 py-1 text-sm text-blue-600 hover:bg-blue-50 rounded"
    };
    let element = trigger.element.clone();
    rsx! {
        button {
            class,
            r#type: "button",
            onclick: move |_| on_event.call(UiEvent::click(element.clone())),
            "{trigger.label}"
        }
    }
}
