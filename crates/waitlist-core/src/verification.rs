use crate::config::{TurnstileConfig, TurnstileSize, TurnstileTheme};
use crate::validation::VerificationGate;
use serde::{Deserialize, Serialize};

/// Challenge status as seen by the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VerificationState {
    /// No site key configured.
    #[default]
    Disabled,
    /// Waiting for the visitor (or the script) to complete the challenge.
    Pending,
    /// Opaque token from the widget, forwarded untouched.
    Verified(String),
    Failed,
    Expired,
}

impl VerificationState {
    pub fn token(&self) -> Option<&str> {
        match self {
            VerificationState::Verified(token) => Some(token),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationState::Disabled => "disabled",
            VerificationState::Pending => "pending",
            VerificationState::Verified(_) => "verified",
            VerificationState::Failed => "failed",
            VerificationState::Expired => "expired",
        }
    }
}

/// One of the three widget callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "token", rename_all = "lowercase")]
pub enum VerificationEvent {
    Success(String),
    Error,
    Expired,
}

/// Identifier of a rendered widget instance, as returned by the script.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetHandle(String);

impl WidgetHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Options handed to the widget's render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub site_key: String,
    pub theme: TurnstileTheme,
    pub size: TurnstileSize,
    pub action: Option<String>,
    pub managed: bool,
}

impl From<&TurnstileConfig> for RenderOptions {
    fn from(config: &TurnstileConfig) -> Self {
        Self {
            site_key: config.site_key.clone(),
            theme: config.theme,
            size: config.size,
            action: config.action.clone(),
            managed: config.managed,
        }
    }
}

/// Permission to render, tied to one acquisition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireTicket {
    pub generation: u64,
    pub options: RenderOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Empty,
    Acquiring(u64),
    Live(WidgetHandle),
}

/// Owns the challenge state and the single widget handle.
///
/// Acquisition is split into `begin_acquisition` / `finish_acquisition` so
/// the asynchronous script wait and render can happen outside any borrow.
/// A ticket from a superseded attempt is rejected on finish, which keeps at
/// most one live instance per adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationAdapter {
    options: Option<RenderOptions>,
    state: VerificationState,
    slot: Slot,
    generation: u64,
}

impl Default for VerificationAdapter {
    fn default() -> Self {
        Self::new(None)
    }
}

impl VerificationAdapter {
    pub fn new(options: Option<RenderOptions>) -> Self {
        Self {
            options,
            state: VerificationState::Disabled,
            slot: Slot::Empty,
            generation: 0,
        }
    }

    pub fn state(&self) -> &VerificationState {
        &self.state
    }

    pub fn token(&self) -> Option<&str> {
        self.state.token()
    }

    pub fn options(&self) -> Option<&RenderOptions> {
        self.options.as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.options.is_some()
    }

    pub fn is_managed(&self) -> bool {
        self.options.as_ref().is_some_and(|o| o.managed)
    }

    pub fn live_handle(&self) -> Option<&WidgetHandle> {
        match &self.slot {
            Slot::Live(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn is_acquiring(&self) -> bool {
        matches!(self.slot, Slot::Acquiring(_))
    }

    pub fn gate(&self) -> VerificationGate<'_> {
        VerificationGate {
            configured: self.is_configured(),
            managed: self.is_managed(),
            state: &self.state,
        }
    }

    /// Start acquiring a widget. `None` when unconfigured or when an
    /// acquisition is already running or a widget is already live.
    pub fn begin_acquisition(&mut self) -> Option<AcquireTicket> {
        let options = self.options.clone()?;
        if self.slot != Slot::Empty {
            tracing::debug!("Widget acquisition already in progress or live; skipping");
            return None;
        }
        self.generation += 1;
        self.slot = Slot::Acquiring(self.generation);
        self.state = VerificationState::Pending;
        Some(AcquireTicket {
            generation: self.generation,
            options,
        })
    }

    /// Record the rendered widget. Hands the handle back when the ticket is
    /// stale, in which case the caller must remove that instance.
    pub fn finish_acquisition(
        &mut self,
        generation: u64,
        handle: WidgetHandle,
    ) -> Result<(), WidgetHandle> {
        if self.slot == Slot::Acquiring(generation) {
            tracing::info!(widget_id = handle.as_str(), "Verification widget rendered");
            self.slot = Slot::Live(handle);
            Ok(())
        } else {
            Err(handle)
        }
    }

    /// Give up on an acquisition (script never loaded, render failed).
    /// The state stays `Pending`; the widget area is simply left empty.
    pub fn abandon_acquisition(&mut self, generation: u64) {
        if self.slot == Slot::Acquiring(generation) {
            self.slot = Slot::Empty;
        }
    }

    /// Apply a widget callback. Events are only honoured while a widget is
    /// live; anything arriving after teardown is stale. Returns whether the
    /// state changed.
    pub fn apply(&mut self, event: VerificationEvent) -> bool {
        if self.live_handle().is_none() {
            tracing::debug!(?event, "Ignoring verification event without a live widget");
            return false;
        }
        let next = match event {
            VerificationEvent::Success(token) => {
                tracing::info!("Verification succeeded");
                VerificationState::Verified(token)
            }
            VerificationEvent::Error => {
                tracing::warn!("Verification failed");
                VerificationState::Failed
            }
            VerificationEvent::Expired => {
                tracing::info!("Verification token expired");
                VerificationState::Expired
            }
        };
        let changed = next != self.state;
        self.state = next;
        changed
    }

    /// Re-arm for another attempt: clears the token and returns the live
    /// handle so the caller can ask the widget to reset. The handle is kept.
    pub fn rearm(&mut self) -> Option<WidgetHandle> {
        if !self.is_configured() {
            return None;
        }
        self.state = VerificationState::Pending;
        let handle = self.live_handle().cloned();
        if let Some(h) = &handle {
            tracing::debug!(widget_id = h.as_str(), "Re-arming verification widget");
        }
        handle
    }

    /// Tear down: drop the handle and invalidate any in-flight acquisition.
    /// Returns the live handle so the caller can remove the instance.
    pub fn release(&mut self) -> Option<WidgetHandle> {
        self.generation += 1;
        let previous = std::mem::replace(&mut self.slot, Slot::Empty);
        if self.is_configured() {
            self.state = VerificationState::Pending;
        }
        match previous {
            Slot::Live(handle) => Some(handle),
            _ => None,
        }
    }

    /// Swap the widget options. The old widget is released first; its handle
    /// is returned for removal before the caller re-acquires.
    pub fn reconfigure(&mut self, options: Option<RenderOptions>) -> Option<WidgetHandle> {
        let old = self.release();
        self.state = if options.is_some() {
            VerificationState::Pending
        } else {
            VerificationState::Disabled
        };
        self.options = options;
        old
    }
}
