//! HTTP route handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::fetch::PageFetcher;
use crate::notify::Notifier;
use crate::report::FormatError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<F, N>(state: AppState<F, N>) -> Router
where
    F: PageFetcher + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/callback", post(callback::<F, N>))
        .route("/report", get(report::<F, N>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// LINE webhook endpoint.
///
/// Returns as soon as the body is parsed; each triggering message starts
/// a run in the background that delivers to the sender.
async fn callback<F, N>(
    State(state): State<AppState<F, N>>,
    body: Bytes,
) -> Result<&'static str, AppError>
where
    F: PageFetcher + 'static,
    N: Notifier + 'static,
{
    let req: WebhookRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(bytes = body.len(), "invalid webhook body: {e}");
        AppError::BadRequest {
            message: format!("Invalid webhook body: {e}"),
        }
    })?;

    for event in &req.events {
        let Some(user) = event.triggered_by(&state.trigger_words) else {
            debug!(kind = %event.kind, "ignoring webhook event");
            continue;
        };

        info!(user, "bus information requested");
        let service = Arc::clone(&state.service);
        let user = user.to_string();
        tokio::spawn(async move {
            service.handle_request(&user).await;
        });
    }

    Ok("OK")
}

/// Run one aggregation and return every station's text.
async fn report<F, N>(State(state): State<AppState<F, N>>) -> Result<Json<ReportResponse>, AppError>
where
    F: PageFetcher + 'static,
    N: Notifier + 'static,
{
    let reports = state.service.collect().await?;
    Ok(Json(ReportResponse { reports }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<FormatError> for AppError {
    fn from(e: FormatError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => {
                error!("{message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
