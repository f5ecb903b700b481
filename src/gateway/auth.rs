//! Bearer token authentication for the gateway API routes.

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use subtle::ConstantTimeEq;

/// Shared auth state injected via axum middleware state.
#[derive(Clone)]
pub struct AuthState {
    pub token: String,
}

/// Extract token from an Authorization header value.
fn bearer_token(value: &str) -> Option<&str> {
    value.strip_prefix("Bearer ")
}

fn token_matches(provided: &str, expected: &str) -> bool {
    bool::from(provided.as_bytes().ct_eq(expected.as_bytes()))
}

/// Reject requests whose `Authorization: Bearer` token does not match.
///
/// Rejections use the same `{ "error": ... }` envelope as the proxy so the
/// console can show them without special casing.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .is_some_and(|token| token_matches(token, &auth.token));

    if authorized {
        return next.run(request).await;
    }

    tracing::warn!(path = %request.uri().path(), "Rejected request with missing or invalid token");
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Invalid or missing auth token" })),
    )
        .into_response()
}
