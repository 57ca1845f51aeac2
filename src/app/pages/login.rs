//! Login page.

use dioxus::prelude::*;

use crate::view::{elements, LoginView, UiEvent};

#[component]
pub fn LoginPage(view: LoginView, on_event: EventHandler<UiEvent>) -> Element {
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);

    rsx! {
        document::Title { "Login - Distribution Portal" }

        div { class: "min-h-screen flex items-center justify-center bg-gray-100",
            form {
                class: "bg-white rounded-lg shadow-lg p-8 w-full max-w-md space-y-6",
                onsubmit: move |e| {
                    e.prevent_default();
                    on_event.call(UiEvent::submit(
                        elements::LOGIN_FORM,
                        [("email", email()), ("password", password())],
                    ));
                },

                div { class: "text-center",
                    h1 { class: "text-3xl font-bold text-gray-900", "Distribution Portal" }
                    p { class: "text-gray-600 mt-2", "Sign in to your dashboard" }
                }

                if let Some(error) = view.error.as_ref() {
                    div { class: "p-3 rounded-lg bg-red-50 text-red-800 border border-red-200", role: "alert",
                        "{error}"
                    }
                }

                div {
                    label { class: "block text-sm font-medium text-gray-700 mb-1", r#for: "email", "Email" }
                    input {
                        class: "w-full px-3 py-2 border border-gray-300 rounded-lg",
                        id: "email",
                        r#type: "email",
                        autocomplete: "username",
                        value: "{email}",
                        oninput: move |e| email.set(e.value()),
                    }
                }
                div {
                    label { class: "block text-sm font-medium text-gray-700 mb-1", r#for: "password", "Password" }
                    input {
                        class: "w-full px-3 py-2 border border-gray-300 rounded-lg",
                        id: "password",
                        r#type: "password",
                        autocomplete: "current-password",
                        value: "{password}",
                        oninput: move |e| password.set(e.value()),
                    }
                }

                button {
                    class: "w-full py-2 bg-blue-600 hover:bg-blue-700 text-white rounded-lg font-medium",
                    r#type: "submit",
                    "Sign in"
                }
            }
        }
    }
}
