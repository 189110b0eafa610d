//! Browser-side glue: the challenge script (`window.turnstile`) and timers,
//! both reached through `document::eval`.

use dioxus::prelude::*;
use serde::Deserialize;
use std::time::Duration;
use waitlist_core::{
    ChallengeWidget, RenderOptions, Timer, VerificationEvent, WaitlistError, WidgetEvents,
    WidgetHandle,
};

/// [`Timer`] backed by `setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalTimer;

impl Timer for EvalTimer {
    async fn sleep(&self, duration: Duration) {
        let ms = duration.as_millis();
        let script = format!("await new Promise(r => setTimeout(r, {ms})); return null;");
        if let Err(e) = document::eval(&script).join::<serde_json::Value>().await {
            tracing::debug!(error = ?e, "Timer eval failed");
        }
    }
}

/// First message of the render script, before any widget callback.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum RenderReply {
    Rendered { widget_id: String },
    Failed { message: String },
}

/// [`ChallengeWidget`] over the page-global challenge script.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnstileBridge;

/// Callbacks of one rendered widget, relayed over its eval channel.
pub struct TurnstileEvents {
    channel: document::Eval,
}

impl WidgetEvents for TurnstileEvents {
    async fn next_event(&mut self) -> Option<VerificationEvent> {
        match self.channel.recv::<VerificationEvent>().await {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::debug!(error = ?e, "Widget event channel closed");
                None
            }
        }
    }
}

impl ChallengeWidget for TurnstileBridge {
    type Events = TurnstileEvents;

    async fn is_loaded(&self) -> bool {
        document::eval(LOADED_CHECK)
            .join::<bool>()
            .await
            .unwrap_or(false)
    }

    async fn render(
        &self,
        container_id: &str,
        options: &RenderOptions,
    ) -> Result<(WidgetHandle, Self::Events), WaitlistError> {
        let mut channel = document::eval(&render_script(container_id, options));
        let reply = channel
            .recv::<RenderReply>()
            .await
            .map_err(|e| WaitlistError::widget_render(format!("{e:?}")))?;
        match reply {
            RenderReply::Rendered { widget_id } => {
                Ok((WidgetHandle::new(widget_id), TurnstileEvents { channel }))
            }
            RenderReply::Failed { message } => Err(WaitlistError::widget_render(message)),
        }
    }

    fn reset(&self, handle: &WidgetHandle) {
        fire_and_log("reset", handle);
    }

    fn remove(&self, handle: &WidgetHandle) {
        fire_and_log("remove", handle);
    }
}

/// Run a widget method without blocking the caller; failures only reach
/// the debug log.
fn fire_and_log(method: &'static str, handle: &WidgetHandle) {
    let eval = document::eval(&call_script(method, handle));
    let widget_id = handle.as_str().to_string();
    // Root-scoped so the call still completes when issued from a drop hook.
    spawn_forever(async move {
        if let Err(e) = eval.join::<serde_json::Value>().await {
            tracing::debug!(method, widget_id, error = ?e, "Widget call failed");
        }
    });
}

const LOADED_CHECK: &str =
    "return typeof window.turnstile !== 'undefined' && typeof window.turnstile.render === 'function';";

/// Render call options as the script expects them.
pub fn render_options_json(options: &RenderOptions) -> serde_json::Value {
    let mut json = serde_json::json!({
        "sitekey": options.site_key,
        "theme": options.theme.as_str(),
        "size": options.size.as_str(),
    });
    if let Some(action) = &options.action {
        json["action"] = serde_json::Value::String(action.clone());
    }
    json
}

/// Script that renders one widget and keeps its eval channel open so the
/// three callbacks can be relayed back.
pub fn render_script(container_id: &str, options: &RenderOptions) -> String {
    let selector = js_string(&format!("#{container_id}"));
    let opts = render_options_json(options);
    format!(
        r#"
        try {{
            const opts = Object.assign({opts}, {{
                callback: (token) => dioxus.send({{ kind: "success", token: token }}),
                "error-callback": () => {{ dioxus.send({{ kind: "error" }}); return true; }},
                "expired-callback": () => dioxus.send({{ kind: "expired" }}),
            }});
            const id = window.turnstile.render({selector}, opts);
            dioxus.send({{ status: "rendered", widget_id: String(id) }});
        }} catch (e) {{
            dioxus.send({{ status: "failed", message: String(e) }});
        }}
        await new Promise(() => {{}});
        "#
    )
}

/// `window.turnstile.<method>(id)`, tolerant of a script that went away.
pub fn call_script(method: &str, handle: &WidgetHandle) -> String {
    let id = js_string(handle.as_str());
    format!(
        "if (window.turnstile) {{ try {{ window.turnstile.{method}({id}); }} catch (e) {{}} }} return null;"
    )
}

/// JSON string literal, which is also a valid JS string literal.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
