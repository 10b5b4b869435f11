//! HTTP server
//!
//! Router construction, per-request logging, panic handling and graceful
//! shutdown. hyper answers requests it cannot parse (no method or target) with
//! a 400 and an empty body before they reach the router.

use std::any::Any;
use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::api;
use crate::error::{AppError, UNKNOWN_ERROR};
use crate::state::SharedState;

/// Response header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the application router
pub fn build_router(state: SharedState) -> Router {
    let router = Router::new()
        // Weather endpoints
        .route("/agents/weather", post(api::weather::chat_with_weather_agent))
        .route("/workflows/weather", post(api::weather::run_weather_workflow))
        // Framework API
        .route("/api", get(api::framework::api_status))
        .route("/api/agents", get(api::framework::list_agents))
        .route("/api/agents/:agentId", get(api::framework::get_agent))
        .route("/api/agents/:agentId/generate", post(api::framework::generate))
        .route("/api/workflows", get(api::framework::list_workflows))
        .route("/api/workflows/:workflowId", get(api::framework::get_workflow))
        .route(
            "/api/workflows/:workflowId/run",
            post(api::framework::run_workflow),
        )
        .fallback(not_found);

    with_middleware(router).with_state(state)
}

/// Wrap routes with panic recovery, request logging, tracing and CORS
///
/// Panics are caught inside the request-id middleware so that panicked
/// requests still get a completion log line.
fn with_middleware<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
}

/// Bind and serve until Ctrl+C or SIGTERM
pub async fn serve(addr: SocketAddr, state: SharedState) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

async fn not_found() -> AppError {
    AppError::RouteNotFound
}

/// Turn a handler panic into a plain-text 500 carrying the panic message
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        UNKNOWN_ERROR.to_string()
    };

    tracing::error!(error = %message, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from(message),
    )
        .into_response()
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}
