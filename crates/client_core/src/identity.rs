use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use shared::{
    domain::{Identity, OwnerId},
    error::AuthError,
};
use tokio::sync::broadcast;
use tracing::warn;

/// One identity-provider resolution: a login or restore that produced an
/// identity, or a logout / failed restore that cleared it.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Resolved(Identity),
    Cleared,
}

/// The identity provider, opaque to the rest of the core. Sign-in state is
/// pushed to subscribers; nothing here is polled.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;
    async fn sign_out(&self) -> Result<(), AuthError>;
    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}

/// Stand-in used when no provider has been wired; every call fails and no
/// session event ever fires.
pub struct MissingIdentityProvider {
    events: broadcast::Sender<SessionEvent>,
}

impl Default for MissingIdentityProvider {
    fn default() -> Self {
        let (events, _) = broadcast::channel(1);
        Self { events }
    }
}

#[async_trait]
impl IdentityProvider for MissingIdentityProvider {
    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Identity, AuthError> {
        Err(AuthError::Provider("identity provider unavailable".into()))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        Err(AuthError::Provider("identity provider unavailable".into()))
    }

    async fn send_password_reset(&self, _email: &str) -> Result<(), AuthError> {
        Err(AuthError::Provider("identity provider unavailable".into()))
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

#[derive(Debug, Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    uid: String,
    email: String,
}

#[derive(Debug, Serialize)]
struct PasswordResetRequest<'a> {
    email: &'a str,
}

/// JSON client against an identity service. Successful calls broadcast the
/// matching session event so the gate tracks sign-in state without polling.
pub struct HttpIdentityProvider {
    http: Client,
    server_url: String,
    events: broadcast::Sender<SessionEvent>,
}

impl HttpIdentityProvider {
    pub fn new(server_url: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            http: Client::new(),
            server_url: server_url.into(),
            events,
        }
    }

    /// Initial session restore: asks the provider whether a session already
    /// exists and broadcasts the terminal answer either way.
    pub async fn restore(&self) -> Result<Option<Identity>, AuthError> {
        let response = self
            .http
            .get(format!("{}/auth/session", self.server_url))
            .send()
            .await
            .map_err(network)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let _ = self.events.send(SessionEvent::Cleared);
            return Ok(None);
        }
        let response = response.error_for_status().map_err(provider)?;
        let body: SignInResponse = response.json().await.map_err(provider)?;
        let identity = Identity {
            id: OwnerId(body.uid),
            label: body.email,
        };
        let _ = self.events.send(SessionEvent::Resolved(identity.clone()));
        Ok(Some(identity))
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let response = self
            .http
            .post(format!("{}/auth/login", self.server_url))
            .json(&SignInRequest { email, password })
            .send()
            .await
            .map_err(network)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }
        let response = response.error_for_status().map_err(provider)?;
        let body: SignInResponse = response.json().await.map_err(provider)?;
        let identity = Identity {
            id: OwnerId(body.uid),
            label: body.email,
        };
        let _ = self.events.send(SessionEvent::Resolved(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let result = self
            .http
            .post(format!("{}/auth/logout", self.server_url))
            .send()
            .await;
        if let Err(e) = result {
            warn!(%e, "sign-out request failed; clearing local session anyway");
        }
        // The local session ends regardless of whether the provider heard us.
        let _ = self.events.send(SessionEvent::Cleared);
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        self.http
            .post(format!("{}/auth/password-reset", self.server_url))
            .json(&PasswordResetRequest { email })
            .send()
            .await
            .map_err(network)?
            .error_for_status()
            .map_err(provider)?;
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

fn network(e: reqwest::Error) -> AuthError {
    AuthError::Network(e.to_string())
}

fn provider(e: reqwest::Error) -> AuthError {
    AuthError::Provider(e.to_string())
}

#[cfg(test)]
#[path = "tests/identity_tests.rs"]
mod tests;
