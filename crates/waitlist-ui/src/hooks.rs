use crate::bridge::{EvalTimer, TurnstileBridge};
use dioxus::prelude::*;
use waitlist_core::{
    run_widget, teardown_widget, ChallengeWidget, HasVerification, RenderOptions, StateCell,
    WaitlistState,
};

/// [`StateCell`] over a signal. Writes fail quietly once the owning scope
/// is gone, which is how late responses after unmount get dropped.
pub struct SignalCell<S: 'static>(pub Signal<S>);

impl<S: 'static> Clone for SignalCell<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: 'static> Copy for SignalCell<S> {}

impl<S: 'static> StateCell<S> for SignalCell<S> {
    fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        let mut signal = self.0;
        let mut guard = signal.try_write().ok()?;
        Some(f(&mut *guard))
    }
}

/// Drive the challenge widget for a mounted form.
///
/// Acquires on mount, re-acquires when `options` change (releasing and
/// removing the previous instance first), and tears down on unmount.
pub fn use_challenge_widget(
    state: Signal<WaitlistState>,
    container_id: String,
    options: Option<RenderOptions>,
) {
    let mut task: Signal<Option<Task>> = use_signal(|| None);
    let bridge = TurnstileBridge;

    use_effect(use_reactive((&options,), move |(options,)| {
        if let Some(running) = task.take() {
            running.cancel();
        }
        let cell = SignalCell(state);
        let stale = cell.update(|s| s.verification_mut().reconfigure(options));
        if let Some(Some(handle)) = stale {
            bridge.remove(&handle);
        }

        let container = container_id.clone();
        task.set(Some(spawn(async move {
            // Errors are logged inside; the widget area just stays empty.
            let _ = run_widget(&bridge, &EvalTimer, &cell, &container).await;
        })));
    }));

    use_drop(move || {
        if let Ok(mut slot) = task.try_write() {
            if let Some(running) = slot.take() {
                running.cancel();
            }
        }
        teardown_widget(&bridge, &SignalCell(state));
    });
}
