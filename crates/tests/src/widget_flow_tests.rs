use crate::common::*;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use waitlist_core::{
    run_widget, teardown_widget, FieldKey, HasVerification, OperatingMode, SubmitOutcome,
    TurnstileConfig, TurnstileTheme, VerificationEvent, VerificationState, WaitlistConfig,
    WaitlistErrorKind, WaitlistState, MAX_POLL_ATTEMPTS, VERIFICATION_EXPIRED,
    VERIFICATION_FAILED, WIDGET_POLL_CEILING, WIDGET_POLL_INTERVAL,
};

fn widget_config(managed: bool) -> WaitlistConfig {
    WaitlistConfig {
        turnstile: Some(TurnstileConfig {
            site_key: "0x4AAA".to_string(),
            theme: TurnstileTheme::Dark,
            managed,
            ..TurnstileConfig::default()
        }),
        ..WaitlistConfig::default()
    }
}

/// The script shows up after a few polls; the widget renders once and its
/// success callback unlocks submission.
#[tokio::test]
async fn late_script_renders_once_and_verifies() {
    let cell = RefCell::new(WaitlistState::new(widget_config(false), OperatingMode::Uncontrolled));
    let widget = ScriptedWidget::new(
        Some(3),
        vec![VerificationEvent::Success("tok-abc".to_string())],
    );
    let timer = InstantTimer::default();

    run_widget(&widget, &timer, &cell, "box").await.expect("widget should render");

    assert_eq!(*timer.sleeps.borrow(), vec![WIDGET_POLL_INTERVAL; 3]);
    let rendered = widget.rendered.borrow();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].0, "box");
    assert_eq!(rendered[0].1.theme, TurnstileTheme::Dark);

    let mut state = cell.borrow_mut();
    assert_eq!(state.verification().token(), Some("tok-abc"));
    fill_valid(&mut state);
    let SubmitOutcome::Proceed(_) = state.submit() else {
        panic!("verified form should submit");
    };
}

/// A missing script stops polling at the ceiling and leaves the widget
/// area empty without a visible error.
#[tokio::test]
async fn missing_script_gives_up_at_ceiling() {
    let cell = RefCell::new(WaitlistState::new(widget_config(false), OperatingMode::Uncontrolled));
    let widget = ScriptedWidget::new(None, Vec::new());
    let timer = InstantTimer::default();

    let err = run_widget(&widget, &timer, &cell, "box")
        .await
        .expect_err("script never loads");
    assert_eq!(err.kind, WaitlistErrorKind::WidgetUnavailable);
    assert_eq!(timer.sleeps.borrow().len(), MAX_POLL_ATTEMPTS as usize);
    assert_eq!(timer.total(), WIDGET_POLL_CEILING);
    assert!(widget.rendered.borrow().is_empty());

    let state = cell.borrow();
    assert_eq!(state.verification().state(), &VerificationState::Pending);
    assert!(state.errors().is_empty());
    assert!(!state.verification().is_acquiring());
}

/// Once live, a second driver for the same form does not render again.
#[tokio::test]
async fn second_run_does_not_render_again() {
    let cell = RefCell::new(WaitlistState::new(widget_config(false), OperatingMode::Uncontrolled));
    let widget = ScriptedWidget::new(Some(0), Vec::new());
    let timer = InstantTimer::default();

    run_widget(&widget, &timer, &cell, "box").await.expect("first render");
    run_widget(&widget, &timer, &cell, "box").await.expect("second run is a no-op");
    assert_eq!(widget.rendered.borrow().len(), 1);
}

/// Expiry drops the token, so the form asks for verification again.
#[tokio::test]
async fn expired_token_requires_fresh_verification() {
    let cell = RefCell::new(WaitlistState::new(widget_config(false), OperatingMode::Uncontrolled));
    let widget = ScriptedWidget::new(
        Some(0),
        vec![
            VerificationEvent::Success("tok".to_string()),
            VerificationEvent::Expired,
        ],
    );

    run_widget(&widget, &InstantTimer::default(), &cell, "box")
        .await
        .expect("widget should render");

    let mut state = cell.borrow_mut();
    assert_eq!(state.verification().state(), &VerificationState::Expired);
    assert_eq!(state.errors().get(FieldKey::Verification), Some(VERIFICATION_EXPIRED));
    fill_valid(&mut state);
    assert_eq!(state.submit(), SubmitOutcome::Invalid);
    assert_eq!(state.errors().get(FieldKey::Verification), Some(VERIFICATION_EXPIRED));
}

/// A widget error is shown inline as soon as it arrives, and a later
/// success clears it.
#[tokio::test]
async fn widget_error_shows_message_until_reverified() {
    let cell = RefCell::new(WaitlistState::new(widget_config(false), OperatingMode::Uncontrolled));
    let widget = ScriptedWidget::new(Some(0), vec![VerificationEvent::Error]);

    run_widget(&widget, &InstantTimer::default(), &cell, "box")
        .await
        .expect("widget should render");
    assert_eq!(
        cell.borrow().errors().get(FieldKey::Verification),
        Some(VERIFICATION_FAILED)
    );

    let mut state = cell.borrow_mut();
    state.on_verification_event(VerificationEvent::Success("retry-tok".to_string()));
    assert!(state.errors().is_empty());
    fill_valid(&mut state);
    assert!(matches!(state.submit(), SubmitOutcome::Proceed(_)));
}

/// A managed widget never blocks submission, even before it resolves.
#[tokio::test]
async fn managed_widget_does_not_gate_submit() {
    let cell = RefCell::new(WaitlistState::new(widget_config(true), OperatingMode::Controlled));
    let widget = ScriptedWidget::new(Some(0), vec![VerificationEvent::Error]);

    run_widget(&widget, &InstantTimer::default(), &cell, "box")
        .await
        .expect("widget should render");

    let mut state = cell.borrow_mut();
    assert_eq!(state.verification().state(), &VerificationState::Failed);
    assert!(state.errors().is_empty());
    fill_valid(&mut state);
    assert!(matches!(state.submit(), SubmitOutcome::Proceed(_)));
}

/// Teardown removes the live instance and later callbacks are ignored.
#[tokio::test]
async fn teardown_removes_widget_and_ignores_late_events() {
    let cell = RefCell::new(WaitlistState::new(widget_config(false), OperatingMode::Uncontrolled));
    let widget = ScriptedWidget::new(Some(0), Vec::new());

    run_widget(&widget, &InstantTimer::default(), &cell, "box")
        .await
        .expect("widget should render");
    teardown_widget(&widget, &cell);
    assert_eq!(*widget.removed.borrow(), vec!["widget-1".to_string()]);

    let mut state = cell.borrow_mut();
    state.on_verification_event(VerificationEvent::Success("late".to_string()));
    assert!(state.verification().token().is_none());
    assert!(state.verification().live_handle().is_none());
}

/// An unconfigured form never touches the script.
#[tokio::test]
async fn no_site_key_means_no_widget() {
    let cell = RefCell::new(WaitlistState::new(
        WaitlistConfig::default(),
        OperatingMode::Uncontrolled,
    ));
    let widget = ScriptedWidget::new(Some(0), Vec::new());

    run_widget(&widget, &InstantTimer::default(), &cell, "box")
        .await
        .expect("nothing to do");
    assert_eq!(widget.checks.get(), 0);
    assert_eq!(cell.borrow().verification().state(), &VerificationState::Disabled);
}
