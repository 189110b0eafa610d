use dioxus::prelude::*;

/// Visual weight of a button.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Ghost,
}

impl ButtonVariant {
    fn class(&self) -> &'static str {
        match self {
            ButtonVariant::Primary => "primary",
            ButtonVariant::Ghost => "ghost",
        }
    }
}

/// Form submit button that swaps its label and disables itself while busy.
#[component]
pub fn SubmitButton(
    label: String,
    busy_label: String,
    #[props(default = false)] busy: bool,
) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        button {
            r#type: "submit",
            class: "waitlist-button",
            "data-style": ButtonVariant::Primary.class(),
            "data-busy": if busy { "true" } else { "false" },
            disabled: busy,
            if busy { "{busy_label}" } else { "{label}" }
        }
    }
}

/// Plain click button.
#[component]
pub fn ActionButton(
    label: String,
    #[props(default)] variant: ButtonVariant,
    #[props(default)] onclick: EventHandler<MouseEvent>,
) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        button {
            r#type: "button",
            class: "waitlist-button",
            "data-style": variant.class(),
            onclick: move |evt| onclick.call(evt),
            "{label}"
        }
    }
}
