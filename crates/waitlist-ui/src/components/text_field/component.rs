use dioxus::prelude::*;

/// Labelled text input with an inline error slot.
#[component]
pub fn TextField(
    id: String,
    label: String,
    value: String,
    on_input: EventHandler<String>,
    #[props(default)] error: Option<String>,
    #[props(default)] placeholder: String,
    #[props(default = "text".to_string())] input_type: String,
    #[props(default)] autocomplete: String,
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
) -> Element {
    let invalid = error.is_some();
    let base = vec![Attribute::new("class", "waitlist-input", None, false)];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);
    let error_id = format!("{id}-error");

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div { class: "waitlist-field",
            label { class: "waitlist-label", r#for: "{id}", "{label}" }
            input {
                id: "{id}",
                r#type: "{input_type}",
                value: "{value}",
                placeholder: "{placeholder}",
                autocomplete: "{autocomplete}",
                aria_invalid: if invalid { "true" } else { "false" },
                aria_describedby: if invalid { "{error_id}" },
                oninput: move |evt: FormEvent| on_input.call(evt.value()),
                ..merged,
            }
            if let Some(message) = error {
                div { id: "{error_id}", class: "waitlist-field-error", "{message}" }
            }
        }
    }
}

/// Off-screen bot trap. Humans never see or tab into it.
#[component]
pub fn HoneypotField(name: String, value: String, on_input: EventHandler<String>) -> Element {
    rsx! {
        div { class: "waitlist-honeypot", aria_hidden: "true",
            input {
                r#type: "text",
                name: "{name}",
                value: "{value}",
                tabindex: "-1",
                autocomplete: "off",
                oninput: move |evt: FormEvent| on_input.call(evt.value()),
            }
        }
    }
}
