use serde::{Deserialize, Serialize};

/// Body accepted by the relay server's send-email endpoint and produced by
/// the HTTP relay notifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendEmailResponse {
    pub message: String,
}

pub fn send_email_route() -> &'static str {
    "/api/send-email"
}
