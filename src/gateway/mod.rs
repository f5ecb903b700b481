//! Web gateway: the console UI and the `/api/maop` action route.

pub mod auth;
pub mod handlers;

use std::future::Future;
use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, header},
    middleware,
    routing::{get, post},
};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::gateway::auth::{AuthState, auth_middleware};
use crate::proxy::ActionProxy;

/// State shared by all gateway handlers.
pub struct GatewayState {
    pub proxy: ActionProxy,
}

impl GatewayState {
    pub fn new(proxy: ActionProxy) -> Arc<Self> {
        Arc::new(Self { proxy })
    }
}

/// Build the gateway router.
///
/// When `auth_token` is set, `/api/maop` requires it as a bearer token. The
/// console assets and `/api/health` are always public.
pub fn router(state: Arc<GatewayState>, auth_token: Option<String>) -> Router {
    let mut api = Router::new().route("/api/maop", post(handlers::maop_handler));
    if let Some(token) = auth_token {
        api = api.route_layer(middleware::from_fn_with_state(
            AuthState { token },
            auth_middleware,
        ));
    }

    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/app.js", get(handlers::js_handler))
        .route("/style.css", get(handlers::css_handler))
        .route("/api/health", get(handlers::health_handler))
        .merge(api)
        .with_state(state)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured address and serve until `shutdown` resolves.
pub async fn serve(
    config: &GatewayConfig,
    state: Arc<GatewayState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), GatewayError> {
    let addr = config.socket_addr()?;

    // Bind before serving so the error names the address.
    let listener =
        tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::StartupFailed {
                addr: addr.to_string(),
                reason: e.to_string(),
            })?;

    if config.auth_token.is_some() {
        tracing::info!("Gateway listening on http://{}/ (token auth enabled)", addr);
    } else {
        tracing::info!("Gateway listening on http://{}/", addr);
    }

    let app = router(state, config.auth_token.clone());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Gateway shut down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;
    use crate::testing::StubMaop;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app_with(stub: Arc<StubMaop>, auth_token: Option<&str>) -> Router {
        let proxy = ActionProxy::new(stub, ProxyConfig::default());
        router(GatewayState::new(proxy), auth_token.map(str::to_string))
    }

    fn post_maop(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/maop")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_maop_passes_result_through() {
        let stub = Arc::new(StubMaop::new(json!({ "data": { "docs": [{ "id": "t1" }] } })));
        let app = app_with(stub.clone(), None);

        let resp = app
            .oneshot(post_maop(r#"{"action":"listTools"}"#))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            json_body(resp).await,
            json!({ "data": { "docs": [{ "id": "t1" }] } })
        );
        assert_eq!(stub.last_call().unwrap().operation, "tools.list");
    }

    #[tokio::test]
    async fn test_maop_invalid_action_is_400() {
        let stub = Arc::new(StubMaop::default());
        let app = app_with(stub.clone(), None);

        let resp = app
            .oneshot(post_maop(r#"{"action":"nope","payload":{}}"#))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(resp).await, json!({ "error": "Invalid action" }));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_maop_malformed_body_is_400() {
        let app = app_with(Arc::new(StubMaop::default()), None);

        let resp = app.oneshot(post_maop("{")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = json_body(resp).await;
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .starts_with("Invalid request body")
        );
    }

    #[tokio::test]
    async fn test_maop_client_error_is_500() {
        let app = app_with(Arc::new(StubMaop::failing()), None);

        let resp = app
            .oneshot(post_maop(r#"{"action":"deleteTool","payload":{"toolId":"t1"}}"#))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(resp).await;
        assert_eq!(body["error"]["status"], 502);
        assert_eq!(body["error"]["body"], json!({ "message": "stub failure" }));
    }

    #[tokio::test]
    async fn test_maop_requires_token_when_configured() {
        let stub = Arc::new(StubMaop::default());
        let app = app_with(stub.clone(), Some("s3cret"));

        let resp = app
            .clone()
            .oneshot(post_maop(r#"{"action":"listAgents"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(stub.call_count(), 0);

        let mut req = post_maop(r#"{"action":"listAgents"}"#);
        req.headers_mut()
            .insert("authorization", HeaderValue::from_static("Bearer s3cret"));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_console_and_health_are_public() {
        let app = app_with(Arc::new(StubMaop::default()), Some("s3cret"));

        for (uri, content_type) in [
            ("/", "text/html"),
            ("/app.js", "application/javascript"),
            ("/style.css", "text/css"),
            ("/api/health", "application/json"),
        ] {
            let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let resp = app.clone().oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK, "{uri}");
            let ct = resp.headers()[header::CONTENT_TYPE].to_str().unwrap();
            assert!(ct.starts_with(content_type), "{uri}: {ct}");
            assert_eq!(resp.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        }
    }
}
