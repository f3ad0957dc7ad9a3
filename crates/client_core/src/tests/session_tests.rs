use super::*;
use crate::identity::{IdentityProvider, MissingIdentityProvider, SessionEvent};
use async_trait::async_trait;
use shared::{
    domain::{Identity, OwnerId, SessionStatus},
    error::AuthError,
};
use std::time::Duration;
use tokio::sync::broadcast;

struct ScriptedProvider {
    events: broadcast::Sender<SessionEvent>,
}

impl ScriptedProvider {
    fn new() -> Self {
        let (events, _) = broadcast::channel(8);
        Self { events }
    }

    fn resolve(&self, identity: Identity) {
        self.events
            .send(SessionEvent::Resolved(identity))
            .expect("subscriber");
    }

    fn clear(&self) {
        self.events.send(SessionEvent::Cleared).expect("subscriber");
    }
}

#[async_trait]
impl IdentityProvider for ScriptedProvider {
    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Identity, AuthError> {
        unimplemented!("not exercised")
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        unimplemented!("not exercised")
    }

    async fn send_password_reset(&self, _email: &str) -> Result<(), AuthError> {
        unimplemented!("not exercised")
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

fn ana() -> Identity {
    Identity {
        id: OwnerId::from("uid-ana"),
        label: "ana@example.com".into(),
    }
}

async fn wait_for(gate: &SessionGate, expected: &SessionStatus) {
    let deadline = Duration::from_secs(2);
    tokio::time::timeout(deadline, async {
        let mut rx = gate.subscribe();
        loop {
            if &*rx.borrow_and_update() == expected {
                return;
            }
            rx.changed().await.expect("gate alive");
        }
    })
    .await
    .expect("status change within deadline");
}

#[tokio::test]
async fn gate_starts_unknown_and_blocks_rendering() {
    let provider = ScriptedProvider::new();
    let gate = SessionGate::spawn(&provider);

    assert_eq!(gate.status(), SessionStatus::Unknown);
    assert_eq!(gate.nav_decision(), NavDecision::Wait);
}

#[tokio::test]
async fn resolved_event_authenticates_and_renders() {
    let provider = ScriptedProvider::new();
    let gate = SessionGate::spawn(&provider);

    provider.resolve(ana());
    wait_for(&gate, &SessionStatus::Authenticated(ana())).await;
    assert_eq!(gate.nav_decision(), NavDecision::Render);
    assert_eq!(gate.status().identity(), Some(&ana()));
}

#[tokio::test]
async fn cleared_event_redirects_to_sign_in() {
    let provider = ScriptedProvider::new();
    let gate = SessionGate::spawn(&provider);

    provider.clear();
    wait_for(&gate, &SessionStatus::Unauthenticated).await;
    // Protected pages must suppress rendering, so no report data is fetched.
    assert_eq!(gate.nav_decision(), NavDecision::RedirectToSignIn);
}

#[tokio::test]
async fn sign_out_after_sign_in_transitions_back() {
    let provider = ScriptedProvider::new();
    let gate = SessionGate::spawn(&provider);

    provider.resolve(ana());
    wait_for(&gate, &SessionStatus::Authenticated(ana())).await;

    provider.clear();
    wait_for(&gate, &SessionStatus::Unauthenticated).await;
}

#[tokio::test]
async fn wait_resolved_returns_the_terminal_state() {
    let provider = ScriptedProvider::new();
    let gate = SessionGate::spawn(&provider);

    let waiter = tokio::spawn({
        let rx = gate.subscribe();
        async move {
            let mut rx = rx;
            loop {
                let status = rx.borrow_and_update().clone();
                if status != SessionStatus::Unknown {
                    return status;
                }
                rx.changed().await.expect("gate alive");
            }
        }
    });

    provider.resolve(ana());
    let status = tokio::time::timeout(Duration::from_secs(2), gate.wait_resolved())
        .await
        .expect("resolved");
    assert_eq!(status, SessionStatus::Authenticated(ana()));
    assert_eq!(
        waiter.await.expect("waiter"),
        SessionStatus::Authenticated(ana())
    );
}

#[tokio::test]
async fn missing_provider_fails_every_call_and_emits_nothing() {
    let provider = MissingIdentityProvider::default();
    let err = provider
        .sign_in("ana@example.com", "secret")
        .await
        .expect_err("no provider");
    assert!(matches!(err, AuthError::Provider(_)));

    let gate = SessionGate::spawn(&provider);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(gate.status(), SessionStatus::Unknown);
}

#[test]
fn nav_decision_table() {
    assert_eq!(nav_decision(&SessionStatus::Unknown), NavDecision::Wait);
    assert_eq!(
        nav_decision(&SessionStatus::Unauthenticated),
        NavDecision::RedirectToSignIn
    );
    assert_eq!(
        nav_decision(&SessionStatus::Authenticated(ana())),
        NavDecision::Render
    );
}
