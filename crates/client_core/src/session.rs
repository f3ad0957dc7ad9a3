use shared::domain::SessionStatus;
use tokio::{sync::watch, task::JoinHandle};
use tracing::warn;

use crate::identity::{IdentityProvider, SessionEvent};

/// What a protected page should do for a given session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDecision {
    /// Status not resolved yet: block rendering, show the loading surface.
    Wait,
    RedirectToSignIn,
    Render,
}

pub fn nav_decision(status: &SessionStatus) -> NavDecision {
    match status {
        SessionStatus::Unknown => NavDecision::Wait,
        SessionStatus::Unauthenticated => NavDecision::RedirectToSignIn,
        SessionStatus::Authenticated(_) => NavDecision::Render,
    }
}

/// Tracks the tri-state session status. Starts at `Unknown` and moves once
/// per provider resolution event; the gate itself never fails, it forwards
/// whatever terminal state the provider reports.
pub struct SessionGate {
    status_rx: watch::Receiver<SessionStatus>,
    forwarder: JoinHandle<()>,
}

impl SessionGate {
    pub fn spawn(provider: &dyn IdentityProvider) -> Self {
        let mut events = provider.subscribe();
        let (status_tx, status_rx) = watch::channel(SessionStatus::Unknown);

        let forwarder = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(SessionEvent::Resolved(identity)) => {
                        if status_tx
                            .send(SessionStatus::Authenticated(identity))
                            .is_err()
                        {
                            break;
                        }
                    }
                    Ok(SessionEvent::Cleared) => {
                        if status_tx.send(SessionStatus::Unauthenticated).is_err() {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "session events lagged; keeping latest status");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Self {
            status_rx,
            forwarder,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status_rx.clone()
    }

    pub fn nav_decision(&self) -> NavDecision {
        nav_decision(&self.status())
    }

    /// Blocks until the provider has resolved the session either way.
    pub async fn wait_resolved(&self) -> SessionStatus {
        let mut rx = self.status_rx.clone();
        loop {
            let status = rx.borrow_and_update().clone();
            if status != SessionStatus::Unknown {
                return status;
            }
            if rx.changed().await.is_err() {
                // Forwarder gone; the last observed status is terminal.
                return self.status_rx.borrow().clone();
            }
        }
    }
}

impl Drop for SessionGate {
    fn drop(&mut self) {
        self.forwarder.abort();
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
