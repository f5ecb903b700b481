//! Gateway route handlers.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;

use crate::error::ProxyError;
use crate::gateway::GatewayState;
use crate::proxy::ActionEnvelope;

// --- Proxy ---

/// `POST /api/maop`: dispatch `{ action, payload }` and pass the platform's
/// response through.
///
/// The body is read as raw bytes rather than through `Json<T>` so that any
/// well-formed JSON reaches the action check, and so that a missing
/// content type is not rejected.
pub async fn maop_handler(State(state): State<Arc<GatewayState>>, body: Bytes) -> Response {
    let envelope = match ActionEnvelope::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected MAOP request body");
            return error_response(e);
        }
    };

    match state.proxy.handle(envelope).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(e: ProxyError) -> Response {
    (e.status(), Json(e.to_body())).into_response()
}

// --- Health ---

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// --- Static console ---

pub async fn index_handler() -> Html<&'static str> {
    Html(include_str!("static/index.html"))
}

pub async fn css_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css")],
        include_str!("static/style.css"),
    )
}

pub async fn js_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        include_str!("static/app.js"),
    )
}
