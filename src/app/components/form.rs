//! Controlled form for section editors.

use dioxus::prelude::*;
use std::collections::BTreeMap;

use super::section::TriggerButton;
use crate::view::{FieldKind, Form, FormField, UiEvent};

#[derive(Props, Clone, PartialEq)]
pub struct FormViewProps {
    pub form: Form,
    pub on_event: EventHandler<UiEvent>,
}

fn input_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text | FieldKind::Select => "text",
        FieldKind::Number => "number",
        FieldKind::Email => "email",
        FieldKind::Password => "password",
        FieldKind::Date => "date",
    }
}

/// Inputs start from the rendered draft and are sent whole on submit.
#[component]
pub fn FormView(props: FormViewProps) -> Element {
    let form = props.form;
    let on_event = props.on_event;

    let initial: BTreeMap<String, String> = form
        .fields
        .iter()
        .map(|f| (f.name.clone(), f.value.clone()))
        .collect();
    let values = use_signal(move || initial);

    let element = form.element.clone();
    let submit = move |e: FormEvent| {
        e.prevent_default();
        on_event.call(UiEvent::submit(element.clone(), values()));
    };

    rsx! {
        form { class: "bg-white rounded-lg shadow p-6 space-y-4", onsubmit: submit,
            div { class: "grid grid-cols-1 md:grid-cols-2 gap-4",
                for field in form.fields.iter().cloned() {
                    FieldInput { key: "{field.name}", field, values }
                }
            }
            div { class: "flex gap-3 justify-end",
                if let Some(cancel) = form.cancel.clone() {
                    TriggerButton { trigger: cancel, primary: false, on_event }
                }
                button {
                    class: "px-4 py-2 bg-blue-600 hover:bg-blue-700 text-white rounded-lg font-medium",
                    r#type: "submit",
                    "{form.submit_label}"
                }
            }
        }
    }
}

#[component]
fn FieldInput(field: FormField, values: Signal<BTreeMap<String, String>>) -> Element {
    let mut values = values;
    let name = field.name.clone();
    let current = values.read().get(&name).cloned().unwrap_or_default();
    let star = if field.required { " *" } else { "" };

    rsx! {
        div {
            label { class: "block text-sm font-medium text-gray-700 mb-1", r#for: "{name}",
                "{field.label}{star}"
            }
            if field.kind == FieldKind::Select {
                select {
                    class: "w-full px-3 py-2 border border-gray-300 rounded-lg",
                    id: "{name}",
                    disabled: field.readonly,
                    onchange: {
                        let name = name.clone();
                        move |e: FormEvent| {
                            values.write().insert(name.clone(), e.value());
                        }
                    },
                    option { value: "", selected: current.is_empty(), "Select…" }
                    for (value, label) in field.options.iter() {
                        option { key: "{value}", value: "{value}", selected: *value == current, "{label}" }
                    }
                }
            } else {
                input {
                    class: "w-full px-3 py-2 border border-gray-300 rounded-lg",
                    id: "{name}",
                    r#type: input_type(field.kind),
                    step: if field.kind == FieldKind::Number { "0.01" } else { "" },
                    required: field.required,
                    readonly: field.readonly,
                    value: "{current}",
                    oninput: {
                        let name = name.clone();
                        move |e: FormEvent| {
                            values.write().insert(name.clone(), e.value());
                        }
                    },
                }
            }
        }
    }
}
