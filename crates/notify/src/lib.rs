use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use shared::{
    error::NotificationError,
    protocol::{send_email_route, SendEmailRequest},
};
use tracing::warn;

/// Dispatches one notification message to one recipient. Fire-and-forget
/// with a single attempt; implementations report failure through the error,
/// never by panicking across the boundary.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), NotificationError>;
}

/// Stand-in used when no transport has been wired; every send fails.
pub struct MissingNotifier;

#[async_trait]
impl Notifier for MissingNotifier {
    async fn send(
        &self,
        _recipient: &str,
        _subject: &str,
        _text_body: &str,
        _html_body: &str,
    ) -> Result<(), NotificationError> {
        Err(NotificationError::Transport(
            "no notification transport configured".into(),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct ProviderApiConfig {
    pub api_key: String,
    pub api_secret: String,
    pub sender_email: String,
    pub sender_name: String,
    /// Override for tests; production leaves the provider default.
    pub endpoint: String,
}

impl ProviderApiConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.mailjet.com/v3.1/send";

    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        sender_email: impl Into<String>,
        sender_name: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            sender_email: sender_email.into(),
            sender_name: sender_name.into(),
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ProviderAddress<'a> {
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ProviderMessage<'a> {
    #[serde(rename = "From")]
    from: ProviderAddress<'a>,
    #[serde(rename = "To")]
    to: Vec<ProviderAddress<'a>>,
    #[serde(rename = "Subject")]
    subject: &'a str,
    #[serde(rename = "TextPart")]
    text_part: &'a str,
    #[serde(rename = "HTMLPart")]
    html_part: &'a str,
}

#[derive(Debug, Serialize)]
struct ProviderSendRequest<'a> {
    #[serde(rename = "Messages")]
    messages: Vec<ProviderMessage<'a>>,
}

/// Direct call against the email provider's send API.
pub struct ProviderApiNotifier {
    http: Client,
    config: ProviderApiConfig,
}

impl ProviderApiNotifier {
    pub fn new(config: ProviderApiConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Notifier for ProviderApiNotifier {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), NotificationError> {
        let payload = ProviderSendRequest {
            messages: vec![ProviderMessage {
                from: ProviderAddress {
                    email: &self.config.sender_email,
                    name: Some(&self.config.sender_name),
                },
                to: vec![ProviderAddress {
                    email: recipient,
                    name: None,
                }],
                subject,
                text_part: text_body,
                html_part: html_body,
            }],
        };

        let response = self
            .http
            .post(&self.config.endpoint)
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        if let Err(e) = response.error_for_status() {
            warn!(%e, "email provider rejected send request");
            return Err(NotificationError::Transport(e.to_string()));
        }
        Ok(())
    }
}

/// Posts the message to the internal relay server instead of the provider,
/// so callers never hold provider credentials.
pub struct HttpRelayNotifier {
    http: Client,
    server_url: String,
}

impl HttpRelayNotifier {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.into(),
        }
    }
}

#[async_trait]
impl Notifier for HttpRelayNotifier {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), NotificationError> {
        let response = self
            .http
            .post(format!("{}{}", self.server_url, send_email_route()))
            .json(&SendEmailRequest {
                to: recipient.to_string(),
                subject: subject.to_string(),
                text: text_body.to_string(),
                html: html_body.to_string(),
            })
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        if let Err(e) = response.error_for_status() {
            warn!(%e, "relay rejected send request");
            return Err(NotificationError::Transport(e.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
