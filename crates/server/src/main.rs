use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use notify::{Notifier, ProviderApiConfig, ProviderApiNotifier};
use shared::{
    error::{ApiError, ErrorCode, NotificationError},
    protocol::{send_email_route, SendEmailRequest, SendEmailResponse},
};
use tracing::{info, warn};

mod config;

use config::load_settings;

#[derive(Clone)]
struct AppState {
    notifier: Arc<dyn Notifier>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    settings
        .validate()
        .context("relay server configuration is incomplete")?;

    let notifier = ProviderApiNotifier::new(ProviderApiConfig::new(
        settings.provider_api_key,
        settings.provider_api_secret,
        settings.sender_email,
        settings.sender_name,
    ));
    let state = AppState {
        notifier: Arc::new(notifier),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "email relay listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(send_email_route(), post(send_email))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn send_email(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>, (StatusCode, Json<ApiError>)> {
    if req.to.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                ErrorCode::Validation,
                "recipient cannot be empty",
            )),
        ));
    }

    match state
        .notifier
        .send(&req.to, &req.subject, &req.text, &req.html)
        .await
    {
        Ok(()) => Ok(Json(SendEmailResponse {
            message: "email accepted for delivery".into(),
        })),
        Err(e @ NotificationError::MissingRecipient) => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(ErrorCode::Validation, e.to_string())),
        )),
        Err(e) => {
            warn!(%e, "email dispatch failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ApiError::new(ErrorCode::Upstream, e.to_string())),
            ))
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
