use crate::common::*;
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use waitlist_core::{
    run_submission, Completion, Field, HasVerification, OperatingMode, ReqwestTransport,
    SubmissionStatus, SubmitEffect, SubmitOutcome, TurnstileConfig, VerificationEvent,
    WaitlistConfig, WaitlistState, WidgetHandle, GENERIC_FAILURE_MESSAGE,
};

fn posting_config(url: &str) -> WaitlistConfig {
    WaitlistConfig {
        action_url: Some(url.to_string()),
        tag: Some("spring-launch".to_string()),
        honeypot_field: Some("b_website".to_string()),
        ..WaitlistConfig::default()
    }
}

async fn submit_once(state: WaitlistState) -> (RefCell<WaitlistState>, Option<Completion>) {
    let cell = RefCell::new(state);
    let SubmitOutcome::Proceed(effect) = cell.borrow_mut().submit() else {
        panic!("form should have been submittable");
    };
    let completion =
        run_submission(&ReqwestTransport::new(), &InstantTimer::default(), &cell, effect).await;
    (cell, completion)
}

/// An uncontrolled POST sends one flat JSON object with the list keys,
/// the tag and an empty honeypot entry.
#[tokio::test]
async fn uncontrolled_post_sends_flat_payload() {
    let endpoint = spawn_endpoint(StatusCode::OK).await;
    let mut state = WaitlistState::new(posting_config(&endpoint.url), OperatingMode::Uncontrolled);
    fill_valid(&mut state);

    let (cell, completion) = submit_once(state).await;
    assert_eq!(completion, Some(Completion::Succeeded));
    assert_eq!(cell.borrow().status(), &SubmissionStatus::Succeeded);

    let bodies = endpoint.bodies();
    assert_eq!(bodies.len(), 1, "exactly one POST expected");
    assert_eq!(
        bodies[0],
        serde_json::json!({
            "EMAIL": "grace@example.com",
            "FNAME": "Grace",
            "LNAME": "Hopper",
            "tags": "spring-launch",
            "b_website": "",
        })
    );
}

/// The token from a verified widget travels under the challenge key.
#[tokio::test]
async fn verified_token_is_posted() {
    let endpoint = spawn_endpoint(StatusCode::CREATED).await;
    let config = WaitlistConfig {
        turnstile: Some(TurnstileConfig {
            site_key: "0x4AAA".to_string(),
            ..TurnstileConfig::default()
        }),
        ..posting_config(&endpoint.url)
    };
    let mut state = WaitlistState::new(config, OperatingMode::Uncontrolled);
    let ticket = state
        .verification_mut()
        .begin_acquisition()
        .expect("widget should be acquirable");
    state
        .verification_mut()
        .finish_acquisition(ticket.generation, WidgetHandle::new("w1"))
        .expect("ticket should be current");
    state.on_verification_event(VerificationEvent::Success("tok-123".to_string()));
    fill_valid(&mut state);

    let (_cell, completion) = submit_once(state).await;
    assert_eq!(completion, Some(Completion::Succeeded));
    assert_eq!(endpoint.bodies()[0]["cf-turnstile-response"], "tok-123");
}

/// A server error becomes a visible generic message; the form leaves the
/// submitting state and can be retried.
#[tokio::test]
async fn server_error_surfaces_generic_message() {
    let endpoint = spawn_endpoint(StatusCode::INTERNAL_SERVER_ERROR).await;
    let mut state = WaitlistState::new(posting_config(&endpoint.url), OperatingMode::Uncontrolled);
    fill_valid(&mut state);

    let (cell, completion) = submit_once(state).await;
    assert_eq!(completion, Some(Completion::Failed { reset: None }));
    let state = cell.borrow();
    assert_eq!(state.status().error(), Some(GENERIC_FAILURE_MESSAGE));
    assert_eq!(state.fields().email, "grace@example.com");
}

#[tokio::test]
async fn rate_limited_post_gets_its_own_message() {
    let endpoint = spawn_endpoint(StatusCode::TOO_MANY_REQUESTS).await;
    let mut state = WaitlistState::new(posting_config(&endpoint.url), OperatingMode::Uncontrolled);
    fill_valid(&mut state);

    let (cell, _) = submit_once(state).await;
    let message = cell.borrow().status().error().map(str::to_string);
    assert!(message.is_some_and(|m| m.contains("Too many attempts")));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_failure() {
    let url = closed_port_url().await;
    let mut state = WaitlistState::new(posting_config(&url), OperatingMode::Uncontrolled);
    fill_valid(&mut state);

    let (cell, completion) = submit_once(state).await;
    assert!(matches!(completion, Some(Completion::Failed { .. })));
    assert_eq!(cell.borrow().status().error(), Some(GENERIC_FAILURE_MESSAGE));
}

/// A filled honeypot means no request at all.
#[tokio::test]
async fn trapped_submission_never_posts() {
    let endpoint = spawn_endpoint(StatusCode::OK).await;
    let mut state = WaitlistState::new(posting_config(&endpoint.url), OperatingMode::Uncontrolled);
    fill_valid(&mut state);
    state.update_field(Field::Honeypot, "http://spam.example");

    assert_eq!(state.submit(), SubmitOutcome::Trapped);
    assert_eq!(state.status(), &SubmissionStatus::Idle);
    assert!(endpoint.bodies().is_empty());
}

/// With no action URL the form waits the simulated delay and succeeds.
#[tokio::test]
async fn missing_url_simulates_success() {
    let mut state = WaitlistState::new(WaitlistConfig::default(), OperatingMode::Uncontrolled);
    fill_valid(&mut state);
    let cell = RefCell::new(state);
    let SubmitOutcome::Proceed(effect) = cell.borrow_mut().submit() else {
        panic!("form should have been submittable");
    };
    assert!(matches!(effect, SubmitEffect::Simulate { .. }));

    let timer = InstantTimer::default();
    let completion = run_submission(&ReqwestTransport::new(), &timer, &cell, effect).await;
    assert_eq!(completion, Some(Completion::Succeeded));
    assert_eq!(timer.total(), waitlist_core::SIMULATED_SUBMIT_DELAY);

    // Acknowledging resets the form for the next visitor.
    let reset = cell.borrow_mut().acknowledge();
    assert!(reset.is_none());
    let state = cell.borrow();
    assert_eq!(state.status(), &SubmissionStatus::Idle);
    assert!(state.fields().email.is_empty());
}

/// A controlled form dispatches the payload and never touches the network.
#[tokio::test]
async fn controlled_mode_hands_payload_to_host() {
    let endpoint = spawn_endpoint(StatusCode::OK).await;
    let mut state = WaitlistState::new(posting_config(&endpoint.url), OperatingMode::Controlled);
    fill_valid(&mut state);

    let SubmitOutcome::Proceed(SubmitEffect::Dispatch(payload)) = state.submit() else {
        panic!("controlled submit should dispatch");
    };
    assert_eq!(payload.first_name, "Grace");
    assert!(payload.tag.is_none());
    assert!(endpoint.bodies().is_empty());
}
