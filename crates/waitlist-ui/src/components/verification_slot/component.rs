use dioxus::prelude::*;

/// Reserved container the challenge script renders into.
///
/// Managed widgets stay in the DOM (the script needs the node) but are
/// visually hidden, and their inline error is never shown.
#[component]
pub fn VerificationSlot(
    container_id: String,
    #[props(default = false)] managed: bool,
    #[props(default)] error: Option<String>,
) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div { class: "waitlist-verification",
            div {
                id: "{container_id}",
                class: "waitlist-verification-widget",
                "data-managed": if managed { "true" } else { "false" },
            }
            if let Some(message) = error.filter(|_| !managed) {
                div { class: "waitlist-field-error", "{message}" }
            }
        }
    }
}
