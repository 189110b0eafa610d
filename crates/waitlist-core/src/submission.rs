use crate::config::{WaitlistConfig, SIMULATED_SUBMIT_DELAY};
use crate::dismiss::{should_dismiss, DismissTrigger};
use crate::error::WaitlistError;
use crate::fields::{Field, FieldErrors, FieldKey, FormFields};
use crate::mode::OperatingMode;
use crate::payload::SignupPayload;
use crate::transport::SignupTransport;
use crate::validation::{validate, verification_message};
use crate::verification::{RenderOptions, VerificationAdapter, VerificationEvent, WidgetHandle};
use crate::widget::{HasVerification, StateCell, Timer};
use std::time::Duration;

/// Lifecycle of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

impl SubmissionStatus {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionStatus::Submitting)
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, SubmissionStatus::Succeeded)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SubmissionStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Flags a controlling host passes in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostFlags {
    pub is_success: bool,
    pub is_submitting: bool,
    /// Rendered verbatim next to the form.
    pub error: Option<String>,
}

/// Work the caller must carry out after a successful `submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitEffect {
    /// Controlled: hand the payload to the host callback. Nothing else.
    Dispatch(SignupPayload),
    /// Uncontrolled: POST the payload once.
    Post { url: String, payload: SignupPayload },
    /// Uncontrolled without URL: wait, then report success.
    Simulate { delay: Duration },
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; errors are now in the error map.
    Invalid,
    /// Honeypot filled. Nothing happened and nothing should.
    Trapped,
    /// A submission is already running.
    Busy,
    Proceed(SubmitEffect),
}

/// What finishing an uncontrolled submission asks of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Show the success notice.
    Succeeded,
    /// Reset the widget instance if one is live.
    Failed { reset: Option<WidgetHandle> },
    /// No submission was running (stale result).
    Ignored,
}

/// Form state, verification and submission lifecycle in one place.
///
/// All transitions are synchronous; the asynchronous parts (script wait,
/// network, timers) run outside and report back through the methods here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistState {
    config: WaitlistConfig,
    mode: OperatingMode,
    fields: FormFields,
    errors: FieldErrors,
    verification: VerificationAdapter,
    status: SubmissionStatus,
}

impl WaitlistState {
    pub fn new(config: WaitlistConfig, mode: OperatingMode) -> Self {
        let config = config.normalized();
        let verification = VerificationAdapter::new(config.widget().map(RenderOptions::from));
        let fields = FormFields::new(config.honeypot_field.is_some());
        Self {
            config,
            mode,
            fields,
            errors: FieldErrors::new(),
            verification,
            status: SubmissionStatus::Idle,
        }
    }

    pub fn config(&self) -> &WaitlistConfig {
        &self.config
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn verification(&self) -> &VerificationAdapter {
        &self.verification
    }

    /// Internally tracked status (uncontrolled mode).
    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    /// Set a value; clears only that field's error, if any.
    pub fn update_field(&mut self, field: Field, value: impl Into<String>) {
        self.fields.set(field, value.into());
        if let Some(key) = field.error_key() {
            self.errors.clear(key);
        }
    }

    /// Recompute the error map wholesale and report validity.
    pub fn validate(&mut self) -> bool {
        self.errors = validate(&self.fields, self.verification.gate());
        self.errors.is_empty()
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        if self.status.is_submitting() {
            return SubmitOutcome::Busy;
        }
        // Checked first so a trapped submission leaves every piece of state,
        // including the error map, exactly as it was.
        if self.fields.honeypot_tripped() {
            tracing::debug!("Honeypot filled; dropping submission");
            return SubmitOutcome::Trapped;
        }
        if !self.validate() {
            tracing::debug!(errors = self.errors.len(), "Submission blocked by validation");
            return SubmitOutcome::Invalid;
        }

        let payload = SignupPayload::build(
            &self.fields,
            self.verification.token(),
            self.config.honeypot_field.as_deref(),
        );
        tracing::info!(
            mode = self.mode.as_str(),
            has_token = payload.verification_token.is_some(),
            has_honeypot = !payload.extra.is_empty(),
            "Dispatching waitlist signup"
        );

        let effect = match self.mode {
            OperatingMode::Controlled => SubmitEffect::Dispatch(payload),
            OperatingMode::Uncontrolled => {
                self.status = SubmissionStatus::Submitting;
                match &self.config.action_url {
                    Some(url) => SubmitEffect::Post {
                        url: url.clone(),
                        payload: payload.with_tag(self.config.tag.as_deref()),
                    },
                    None => SubmitEffect::Simulate {
                        delay: SIMULATED_SUBMIT_DELAY,
                    },
                }
            }
        };
        SubmitOutcome::Proceed(effect)
    }

    /// Record the result of a `Post` or `Simulate` effect.
    pub fn complete_submission(&mut self, result: Result<(), WaitlistError>) -> Completion {
        if !self.status.is_submitting() {
            return Completion::Ignored;
        }
        match result {
            Ok(()) => {
                self.status = SubmissionStatus::Succeeded;
                Completion::Succeeded
            }
            Err(e) => {
                tracing::error!(error = %e, "Waitlist submission failed");
                self.status = SubmissionStatus::Failed(e.friendly_message());
                Completion::Failed {
                    reset: self.verification.rearm(),
                }
            }
        }
    }

    /// The visitor acknowledged the success view.
    ///
    /// Clears every value and error and re-arms verification. Only in
    /// uncontrolled mode does the status return to idle; a controlling host
    /// keeps its own flags. Returns the widget to reset, if live.
    pub fn acknowledge(&mut self) -> Option<WidgetHandle> {
        self.fields.clear();
        self.errors.clear_all();
        if self.mode == OperatingMode::Uncontrolled {
            self.status = SubmissionStatus::Idle;
        }
        self.verification.rearm()
    }

    /// Status to render, from host flags in controlled mode.
    pub fn view_status(&self, host: &HostFlags) -> SubmissionStatus {
        match self.mode {
            OperatingMode::Uncontrolled => self.status.clone(),
            OperatingMode::Controlled => {
                if host.is_success {
                    SubmissionStatus::Succeeded
                } else if host.is_submitting {
                    SubmissionStatus::Submitting
                } else if let Some(error) = &host.error {
                    SubmissionStatus::Failed(error.clone())
                } else {
                    SubmissionStatus::Idle
                }
            }
        }
    }

    pub fn should_dismiss(&self, trigger: DismissTrigger) -> bool {
        should_dismiss(self.config.dismissible, trigger)
    }
}

impl HasVerification for WaitlistState {
    fn verification_mut(&mut self) -> &mut VerificationAdapter {
        &mut self.verification
    }

    /// Success clears the inline verification message; error and expiry
    /// show one straight away unless the widget is managed.
    fn on_verification_event(&mut self, event: VerificationEvent) {
        let verified = matches!(event, VerificationEvent::Success(_));
        if !self.verification.apply(event) {
            return;
        }
        if verified {
            self.errors.clear(FieldKey::Verification);
        } else if !self.verification.is_managed() {
            let message = verification_message(self.verification.state());
            self.errors.insert(FieldKey::Verification, message);
        }
    }
}

/// Carry out a `Post` or `Simulate` effect and record the result in `cell`.
///
/// `Dispatch` belongs to the host and yields `None`, as does a state that
/// disappeared while the request was in flight.
pub async fn run_submission<Tr, T, C>(
    transport: &Tr,
    timer: &T,
    cell: &C,
    effect: SubmitEffect,
) -> Option<Completion>
where
    Tr: SignupTransport,
    T: Timer,
    C: StateCell<WaitlistState>,
{
    let result = match effect {
        SubmitEffect::Dispatch(_) => return None,
        SubmitEffect::Post { url, payload } => transport.post_json(&url, &payload).await,
        SubmitEffect::Simulate { delay } => {
            tracing::info!(delay_ms = delay.as_millis() as u64, "No action URL; simulating signup");
            timer.sleep(delay).await;
            Ok(())
        }
    };
    cell.update(|s| s.complete_submission(result))
}
