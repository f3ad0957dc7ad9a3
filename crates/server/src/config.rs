use std::{collections::HashMap, fs};

use shared::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_bind: String,
    pub provider_api_key: String,
    pub provider_api_secret: String,
    pub sender_email: String,
    pub sender_name: String,
    /// Default notification recipient handed to clients. Allowed to be
    /// absent: a missing recipient degrades the notification step at send
    /// time instead of refusing to start.
    pub notify_recipient: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            provider_api_key: String::new(),
            provider_api_secret: String::new(),
            sender_email: String::new(),
            sender_name: "Handover Reports".into(),
            notify_recipient: None,
        }
    }
}

impl Settings {
    /// Provider credentials and the sender address are required before the
    /// relay can start; everything else has a workable default.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider_api_key.trim().is_empty() {
            return Err(ConfigError("provider_api_key"));
        }
        if self.provider_api_secret.trim().is_empty() {
            return Err(ConfigError("provider_api_secret"));
        }
        if self.sender_email.trim().is_empty() {
            return Err(ConfigError("sender_email"));
        }
        Ok(())
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file_config(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Ok(v) = std::env::var("MAILJET_API_KEY") {
        settings.provider_api_key = v;
    }
    if let Ok(v) = std::env::var("MAILJET_SECRET_KEY") {
        settings.provider_api_secret = v;
    }
    if let Ok(v) = std::env::var("MAILJET_SENDER_EMAIL") {
        settings.sender_email = v;
    }
    if let Ok(v) = std::env::var("MAILJET_SENDER_NAME") {
        settings.sender_name = v;
    }
    if let Ok(v) = std::env::var("EMAIL_TO") {
        settings.notify_recipient = Some(v);
    }

    settings
}

fn apply_file_config(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
        return;
    };
    if let Some(v) = file_cfg.get("bind_addr") {
        settings.server_bind = v.clone();
    }
    if let Some(v) = file_cfg.get("provider_api_key") {
        settings.provider_api_key = v.clone();
    }
    if let Some(v) = file_cfg.get("provider_api_secret") {
        settings.provider_api_secret = v.clone();
    }
    if let Some(v) = file_cfg.get("sender_email") {
        settings.sender_email = v.clone();
    }
    if let Some(v) = file_cfg.get("sender_name") {
        settings.sender_name = v.clone();
    }
    if let Some(v) = file_cfg.get("notify_recipient") {
        settings.notify_recipient = Some(v.clone());
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
