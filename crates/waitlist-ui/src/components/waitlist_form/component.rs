use crate::bridge::{EvalTimer, TurnstileBridge};
use crate::components::{
    use_toast, ActionButton, ButtonVariant, HoneypotField, SubmitButton, TextField, ToastOptions,
    ToastProvider, VerificationSlot, WaitlistCard, WaitlistCardHeader,
};
use crate::hooks::{use_challenge_widget, SignalCell};
use dioxus::prelude::*;
use waitlist_core::{
    run_submission, ChallengeWidget, Completion, DismissTrigger, Field, FieldKey, HostFlags,
    OperatingMode, RenderOptions, ReqwestTransport, SignupPayload, SubmitEffect, SubmitOutcome,
    SubmissionStatus, TurnstileConfig, TurnstileSize, TurnstileTheme, WaitlistConfig,
    WaitlistState, NOTICE_LIFETIME,
};

/// Props for [`WaitlistForm`].
///
/// Flat options override the matching entries of `config`. Supplying both
/// `on_submit` and `is_success` puts the form in controlled mode; either
/// one alone leaves it uncontrolled.
#[derive(Props, Clone, PartialEq)]
pub struct WaitlistFormProps {
    #[props(default)]
    pub config: WaitlistConfig,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub success_title: Option<String>,
    pub success_message: Option<String>,
    pub action_url: Option<String>,
    pub tag: Option<String>,
    pub honeypot_field: Option<String>,
    pub turnstile_site_key: Option<String>,
    pub turnstile_theme: Option<TurnstileTheme>,
    pub turnstile_size: Option<TurnstileSize>,
    pub turnstile_action: Option<String>,
    pub turnstile_managed: Option<bool>,
    pub dismissible: Option<bool>,
    pub on_submit: Option<EventHandler<SignupPayload>>,
    pub is_success: Option<bool>,
    #[props(default = false)]
    pub is_submitting: bool,
    pub error: Option<String>,
    pub on_done: Option<EventHandler<()>>,
    pub on_dismiss: Option<EventHandler<()>>,
}

impl WaitlistFormProps {
    /// Merge flat props over `config`.
    pub fn resolved_config(&self) -> WaitlistConfig {
        let mut config = self.config.clone();
        let text = &mut config.text;
        override_with(&mut text.title, &self.title);
        override_with(&mut text.subtitle, &self.subtitle);
        override_with(&mut text.success_title, &self.success_title);
        override_with(&mut text.success_message, &self.success_message);

        if self.action_url.is_some() {
            config.action_url = self.action_url.clone();
        }
        if self.tag.is_some() {
            config.tag = self.tag.clone();
        }
        if self.honeypot_field.is_some() {
            config.honeypot_field = self.honeypot_field.clone();
        }
        if let Some(dismissible) = self.dismissible {
            config.dismissible = dismissible;
        }

        let widget_props = self.turnstile_site_key.is_some()
            || self.turnstile_theme.is_some()
            || self.turnstile_size.is_some()
            || self.turnstile_action.is_some()
            || self.turnstile_managed.is_some();
        if widget_props {
            let mut widget = config.turnstile.take().unwrap_or_else(TurnstileConfig::default);
            if let Some(key) = &self.turnstile_site_key {
                widget.site_key = key.clone();
            }
            if let Some(theme) = self.turnstile_theme {
                widget.theme = theme;
            }
            if let Some(size) = self.turnstile_size {
                widget.size = size;
            }
            if self.turnstile_action.is_some() {
                widget.action = self.turnstile_action.clone();
            }
            if let Some(managed) = self.turnstile_managed {
                widget.managed = managed;
            }
            config.turnstile = Some(widget);
        }

        config.normalized()
    }

    pub fn mode(&self) -> OperatingMode {
        OperatingMode::resolve(self.on_submit.is_some(), self.is_success)
    }

    pub fn host_flags(&self) -> HostFlags {
        HostFlags {
            is_success: self.is_success.unwrap_or(false),
            is_submitting: self.is_submitting,
            error: self.error.clone().filter(|e| !e.is_empty()),
        }
    }
}

fn override_with(slot: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        *slot = v.clone();
    }
}

/// Waitlist signup card.
///
/// Uncontrolled, it posts to `action_url` (or simulates success) and
/// tracks its own status. Controlled, it hands the payload to `on_submit`
/// and renders whatever `is_success` / `is_submitting` / `error` say.
#[component]
pub fn WaitlistForm(props: WaitlistFormProps) -> Element {
    rsx! {
        ToastProvider {
            WaitlistFormCard { form: props }
        }
    }
}

#[component]
fn WaitlistFormCard(form: WaitlistFormProps) -> Element {
    let config = form.resolved_config();
    let mode = form.mode();
    let host = form.host_flags();
    let on_submit = form.on_submit;
    let on_done = form.on_done;
    let on_dismiss = form.on_dismiss;
    let toast = use_toast();

    let mut state = {
        let config = config.clone();
        use_signal(move || WaitlistState::new(config, mode))
    };
    let container_id =
        use_hook(|| format!("waitlist-challenge-{}", uuid::Uuid::new_v4().simple()));

    use_challenge_widget(
        state,
        container_id.clone(),
        config.widget().map(RenderOptions::from),
    );

    let notice_text = config.text.notice.clone();
    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let outcome = state.write().submit();
        let effect = match outcome {
            SubmitOutcome::Proceed(SubmitEffect::Dispatch(payload)) => {
                if let Some(handler) = on_submit {
                    handler.call(payload);
                }
                return;
            }
            SubmitOutcome::Proceed(effect) => effect,
            SubmitOutcome::Invalid | SubmitOutcome::Trapped | SubmitOutcome::Busy => return,
        };

        let notice = notice_text.clone();
        spawn(async move {
            let cell = SignalCell(state);
            let completion =
                run_submission(&ReqwestTransport::new(), &EvalTimer, &cell, effect).await;
            match completion {
                Some(Completion::Succeeded) => {
                    toast.success(notice, ToastOptions::new().duration(NOTICE_LIFETIME));
                }
                Some(Completion::Failed { reset: Some(handle) }) => TurnstileBridge.reset(&handle),
                _ => {}
            }
        });
    };

    let handle_done = move |_: MouseEvent| {
        if let Some(handle) = state.write().acknowledge() {
            TurnstileBridge.reset(&handle);
        }
        if let Some(handler) = on_done {
            handler.call(());
        }
    };

    let handle_trigger = move |trigger: DismissTrigger| {
        if !state.read().should_dismiss(trigger) {
            return;
        }
        if let Some(handler) = on_dismiss {
            handler.call(());
        }
    };

    let current = state.read();
    let status = current.view_status(&host);
    let fields = current.fields();
    let errors = current.errors();
    let error_for = |key: FieldKey| errors.get(key).map(str::to_string);
    let honeypot = config
        .honeypot_field
        .clone()
        .zip(fields.honeypot.clone());
    let managed = current.verification().is_managed();
    let show_widget = current.verification().is_configured();
    let text = config.text.clone();
    let busy = status.is_submitting();

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        WaitlistCard {
            dismissible: config.dismissible,
            on_trigger: handle_trigger,
            div { class: "waitlist-content", "data-mode": mode.as_str(),

                if status.is_succeeded() {
                    div { class: "waitlist-success",
                        WaitlistCardHeader {
                            title: text.success_title.clone(),
                            subtitle: text.success_message.clone(),
                        }
                        ActionButton {
                            label: text.done_label.clone(),
                            variant: ButtonVariant::Ghost,
                            onclick: handle_done,
                        }
                    }
                }

                // Kept mounted on the success view so the widget instance survives.
                div { class: "waitlist-body", hidden: status.is_succeeded(),
                    WaitlistCardHeader { title: text.title.clone(), subtitle: text.subtitle.clone() }

                    form { class: "waitlist-form", "novalidate": "true", onsubmit: handle_submit,
                        div { class: "waitlist-name-row",
                            TextField {
                                id: "{container_id}-fname",
                                label: "First name",
                                value: fields.first_name.clone(),
                                autocomplete: "given-name",
                                error: error_for(FieldKey::FirstName),
                                on_input: move |v: String| state.write().update_field(Field::FirstName, v),
                            }
                            TextField {
                                id: "{container_id}-lname",
                                label: "Last name",
                                value: fields.last_name.clone(),
                                autocomplete: "family-name",
                                error: error_for(FieldKey::LastName),
                                on_input: move |v: String| state.write().update_field(Field::LastName, v),
                            }
                        }
                        TextField {
                            id: "{container_id}-email",
                            label: "Email",
                            input_type: "email",
                            placeholder: "you@example.com",
                            value: fields.email.clone(),
                            autocomplete: "email",
                            error: error_for(FieldKey::Email),
                            on_input: move |v: String| state.write().update_field(Field::Email, v),
                        }

                        if let Some((name, value)) = honeypot {
                            HoneypotField {
                                name,
                                value,
                                on_input: move |v: String| state.write().update_field(Field::Honeypot, v),
                            }
                        }

                        if show_widget {
                            VerificationSlot {
                                container_id: container_id.clone(),
                                managed,
                                error: error_for(FieldKey::Verification),
                            }
                        }

                        SubmitError { status: status.clone() }

                        SubmitButton {
                            label: text.submit_label.clone(),
                            busy_label: text.submitting_label.clone(),
                            busy,
                        }
                    }
                }
            }
        }
    }
}

/// Form-level failure banner. Renders nothing unless `status` failed.
#[component]
pub fn SubmitError(status: SubmissionStatus) -> Element {
    let Some(message) = status.error() else {
        return rsx! {};
    };
    rsx! {
        div { class: "waitlist-error", role: "alert", "{message}" }
    }
}
