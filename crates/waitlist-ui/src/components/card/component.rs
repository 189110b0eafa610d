use dioxus::prelude::*;
use waitlist_core::DismissTrigger;

/// Backdrop plus card. Reports dismiss triggers; never hides itself.
///
/// Clicks inside the card stop at the card, so only backdrop clicks reach
/// the outside-click handler.
#[component]
pub fn WaitlistCard(
    #[props(default = false)] dismissible: bool,
    #[props(default)] on_trigger: EventHandler<DismissTrigger>,
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
    children: Element,
) -> Element {
    let base = vec![Attribute::new("class", "waitlist-card", None, false)];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div {
            class: "waitlist-backdrop",
            "data-dismissible": if dismissible { "true" } else { "false" },
            tabindex: "-1",
            onclick: move |_| on_trigger.call(DismissTrigger::OutsideClick),
            onkeydown: move |evt: KeyboardEvent| {
                if let Some(trigger) = DismissTrigger::from_key(&evt.key().to_string()) {
                    on_trigger.call(trigger);
                }
            },
            div {
                role: "dialog",
                aria_modal: "true",
                onclick: move |evt: MouseEvent| {
                    evt.stop_propagation();
                    on_trigger.call(DismissTrigger::InsideClick);
                },
                ..merged,
                {children}
            }
        }
    }
}

/// Title and optional subtitle at the top of the card.
#[component]
pub fn WaitlistCardHeader(title: String, #[props(default)] subtitle: String) -> Element {
    rsx! {
        div { class: "waitlist-card-header",
            h3 { class: "waitlist-card-title", "{title}" }
            if !subtitle.is_empty() {
                p { class: "waitlist-card-subtitle", "{subtitle}" }
            }
        }
    }
}
