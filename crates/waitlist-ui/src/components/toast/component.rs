use dioxus::prelude::*;
use dioxus_primitives::toast as prim;

pub use dioxus_primitives::toast::{use_toast, ToastOptions, Toasts};

/// Toast region for the success notice. Toasts fade out over their last
/// `NOTICE_EXIT` of life.
#[component]
pub fn ToastProvider(props: prim::ToastProviderProps) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div { class: "waitlist-toasts",
            prim::ToastProvider { ..props }
        }
    }
}
