use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use waitlist_core::{
    ChallengeWidget, Field, RenderOptions, Timer, VerificationEvent, WaitlistError, WaitlistState,
    WidgetEvents, WidgetHandle,
};

/// A local signup endpoint that answers every POST with a fixed status and
/// keeps the JSON bodies it received.
pub struct Endpoint {
    pub url: String,
    pub received: Arc<Mutex<Vec<Value>>>,
}

impl Endpoint {
    pub fn bodies(&self) -> Vec<Value> {
        self.received.lock().expect("endpoint lock poisoned").clone()
    }
}

#[derive(Clone)]
struct EndpointState {
    status: StatusCode,
    received: Arc<Mutex<Vec<Value>>>,
}

async fn record(State(state): State<EndpointState>, Json(body): Json<Value>) -> StatusCode {
    state
        .received
        .lock()
        .expect("endpoint lock poisoned")
        .push(body);
    state.status
}

/// Bind an axum router on an ephemeral port and serve it in the background.
pub async fn spawn_endpoint(status: StatusCode) -> Endpoint {
    let received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().route("/join", post(record)).with_state(EndpointState {
        status,
        received: received.clone(),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server failed");
    });

    Endpoint {
        url: format!("http://{addr}/join"),
        received,
    }
}

/// Timer that returns at once and records each requested delay.
#[derive(Default)]
pub struct InstantTimer {
    pub sleeps: RefCell<Vec<Duration>>,
}

impl Timer for InstantTimer {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        tokio::task::yield_now().await;
    }
}

impl InstantTimer {
    pub fn total(&self) -> Duration {
        self.sleeps.borrow().iter().sum()
    }
}

/// Challenge script stand-in. Becomes available after `loads_after` checks
/// (never, when `None`) and replays `events` after rendering.
pub struct ScriptedWidget {
    pub loads_after: Option<u32>,
    pub checks: Cell<u32>,
    pub rendered: RefCell<Vec<(String, RenderOptions)>>,
    pub resets: RefCell<Vec<String>>,
    pub removed: RefCell<Vec<String>>,
    events: Rc<RefCell<VecDeque<VerificationEvent>>>,
}

impl ScriptedWidget {
    pub fn new(loads_after: Option<u32>, events: Vec<VerificationEvent>) -> Self {
        Self {
            loads_after,
            checks: Cell::new(0),
            rendered: RefCell::new(Vec::new()),
            resets: RefCell::new(Vec::new()),
            removed: RefCell::new(Vec::new()),
            events: Rc::new(RefCell::new(events.into())),
        }
    }
}

pub struct ScriptedEvents(Rc<RefCell<VecDeque<VerificationEvent>>>);

impl WidgetEvents for ScriptedEvents {
    async fn next_event(&mut self) -> Option<VerificationEvent> {
        self.0.borrow_mut().pop_front()
    }
}

impl ChallengeWidget for ScriptedWidget {
    type Events = ScriptedEvents;

    async fn is_loaded(&self) -> bool {
        let seen = self.checks.get();
        self.checks.set(seen + 1);
        self.loads_after.is_some_and(|n| seen >= n)
    }

    async fn render(
        &self,
        container_id: &str,
        options: &RenderOptions,
    ) -> Result<(WidgetHandle, Self::Events), WaitlistError> {
        let mut rendered = self.rendered.borrow_mut();
        rendered.push((container_id.to_string(), options.clone()));
        let handle = WidgetHandle::new(format!("widget-{}", rendered.len()));
        Ok((handle, ScriptedEvents(self.events.clone())))
    }

    fn reset(&self, handle: &WidgetHandle) {
        self.resets.borrow_mut().push(handle.as_str().to_string());
    }

    fn remove(&self, handle: &WidgetHandle) {
        self.removed.borrow_mut().push(handle.as_str().to_string());
    }
}

pub fn fill_valid(state: &mut WaitlistState) {
    state.update_field(Field::Email, "grace@example.com");
    state.update_field(Field::FirstName, "Grace");
    state.update_field(Field::LastName, "Hopper");
}

/// URL on a port that was bound and released, so nothing is listening.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has no address");
    drop(listener);
    format!("http://{addr}/join")
}
