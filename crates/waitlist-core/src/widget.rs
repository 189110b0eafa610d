//! Capability seams for the external challenge script and timers, plus the
//! driver that walks a widget through load, render and callbacks.

use crate::config::{WIDGET_POLL_CEILING, WIDGET_POLL_INTERVAL};
use crate::error::WaitlistError;
use crate::verification::{RenderOptions, VerificationAdapter, VerificationEvent, WidgetHandle};
use std::cell::RefCell;
use std::time::Duration;

/// Number of availability checks before giving up on the script.
pub const MAX_POLL_ATTEMPTS: u32 =
    (WIDGET_POLL_CEILING.as_millis() / WIDGET_POLL_INTERVAL.as_millis()) as u32;

/// Something that can wait.
#[allow(async_fn_in_trait)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}

/// The page-wide challenge script, narrowed to what the form uses.
#[allow(async_fn_in_trait)]
pub trait ChallengeWidget {
    type Events: WidgetEvents;

    /// Whether the script's global entry point exists yet.
    async fn is_loaded(&self) -> bool;

    /// Render one instance into `container_id`, wired to the success, error
    /// and expiry callbacks, which arrive through the returned event stream.
    async fn render(
        &self,
        container_id: &str,
        options: &RenderOptions,
    ) -> Result<(WidgetHandle, Self::Events), WaitlistError>;

    fn reset(&self, handle: &WidgetHandle);

    fn remove(&self, handle: &WidgetHandle);
}

/// Callback stream of a rendered widget. `None` once the widget is gone.
#[allow(async_fn_in_trait)]
pub trait WidgetEvents {
    async fn next_event(&mut self) -> Option<VerificationEvent>;
}

/// Shared mutable state the drivers write into between suspension points.
///
/// `update` returns `None` when the state no longer exists (the owning
/// component unmounted); drivers stop quietly in that case.
pub trait StateCell<S> {
    fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R>;
}

impl<S> StateCell<S> for RefCell<S> {
    fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        self.try_borrow_mut().ok().map(|mut guard| f(&mut *guard))
    }
}

/// State that embeds a [`VerificationAdapter`].
pub trait HasVerification {
    fn verification_mut(&mut self) -> &mut VerificationAdapter;

    fn on_verification_event(&mut self, event: VerificationEvent) {
        self.verification_mut().apply(event);
    }
}

impl HasVerification for VerificationAdapter {
    fn verification_mut(&mut self) -> &mut VerificationAdapter {
        self
    }
}

/// Poll for the script global every [`WIDGET_POLL_INTERVAL`], at most
/// [`MAX_POLL_ATTEMPTS`] times.
pub async fn wait_for_script<W, T>(widget: &W, timer: &T) -> Result<(), WaitlistError>
where
    W: ChallengeWidget,
    T: Timer,
{
    for attempt in 0..MAX_POLL_ATTEMPTS {
        if widget.is_loaded().await {
            if attempt > 0 {
                tracing::debug!(attempt, "Challenge script became available");
            }
            return Ok(());
        }
        timer.sleep(WIDGET_POLL_INTERVAL).await;
    }
    if widget.is_loaded().await {
        return Ok(());
    }
    Err(WaitlistError::widget_unavailable(format!(
        "challenge script not loaded after {}ms",
        WIDGET_POLL_CEILING.as_millis()
    )))
}

/// Acquire the widget and pump its callbacks into `cell` until the stream
/// ends.
///
/// A no-op when the adapter is unconfigured or already holds (or is
/// acquiring) a widget. A script that never loads is logged and leaves the
/// widget area empty; it is not reported to the visitor.
pub async fn run_widget<W, T, S, C>(
    widget: &W,
    timer: &T,
    cell: &C,
    container_id: &str,
) -> Result<(), WaitlistError>
where
    W: ChallengeWidget,
    T: Timer,
    S: HasVerification,
    C: StateCell<S>,
{
    let Some(Some(ticket)) = cell.update(|s| s.verification_mut().begin_acquisition()) else {
        return Ok(());
    };

    tracing::debug!(container_id, "Waiting for challenge script");
    if let Err(e) = wait_for_script(widget, timer).await {
        tracing::warn!(error = %e, "Challenge script unavailable; widget not rendered");
        cell.update(|s| s.verification_mut().abandon_acquisition(ticket.generation));
        return Err(e);
    }

    let (handle, mut events) = match widget.render(container_id, &ticket.options).await {
        Ok(rendered) => rendered,
        Err(e) => {
            tracing::error!(error = %e, "Challenge widget render failed");
            cell.update(|s| s.verification_mut().abandon_acquisition(ticket.generation));
            return Err(e);
        }
    };

    let accepted = cell.update(|s| {
        s.verification_mut()
            .finish_acquisition(ticket.generation, handle)
    });
    match accepted {
        Some(Ok(())) => {}
        Some(Err(orphan)) => {
            tracing::debug!(widget_id = orphan.as_str(), "Removing superseded widget");
            widget.remove(&orphan);
            return Ok(());
        }
        None => return Ok(()),
    }

    while let Some(event) = events.next_event().await {
        if cell.update(|s| s.on_verification_event(event)).is_none() {
            break;
        }
    }
    Ok(())
}

/// Release the live widget (if any) and remove it from the page.
pub fn teardown_widget<W, S, C>(widget: &W, cell: &C)
where
    W: ChallengeWidget,
    S: HasVerification,
    C: StateCell<S>,
{
    if let Some(Some(handle)) = cell.update(|s| s.verification_mut().release()) {
        tracing::debug!(widget_id = handle.as_str(), "Removing verification widget");
        widget.remove(&handle);
    }
}
