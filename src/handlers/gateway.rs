//! HTTP gateway.
//!
//! Endpoints:
//! - `GET /news/{id}`: look one news item up through the bridge
//! - `GET /health`: liveness
//!
//! Identifiers are validated here, before anything reaches the bus.
//! Storage and transport failures are logged in full but answered with an
//! opaque 500.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::bridge::{Bridge, LookupOutcome};
use crate::termination::Termination;

/// Response bodies. Internal details never appear in them.
pub mod errmsg {
    pub const NOT_FOUND: &str = "not found";
    pub const INTERNAL_ERROR: &str = "internal server error";
    /// Followed by `: <parse error>`.
    pub const INVALID_ID: &str = "invalid news identifier";
    pub const NEGATIVE_ID: &str = "news identifier can't be negative";
}

#[derive(Clone)]
struct GatewayState {
    bridge: Arc<Bridge>,
    timeout: Duration,
}

/// Build the gateway router.
///
/// `timeout` is the per-request deadline handed to the bridge.
pub fn router(bridge: Arc<Bridge>, timeout: Duration) -> Router {
    Router::new()
        .route("/news/{id}", get(get_news))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(GatewayState { bridge, timeout })
}

/// Serve `router` until the termination token fires.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    termination: Termination,
) -> std::io::Result<()> {
    info!(addr = %listener.local_addr()?, "HTTP gateway listening");

    let token = termination.token();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { token.cancelled().await })
        .await
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn get_news(State(state): State<GatewayState>, Path(raw_id): Path<String>) -> Response {
    let id: i64 = match raw_id.parse() {
        Ok(id) => id,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                format!("{}: {}", errmsg::INVALID_ID, e),
            )
                .into_response()
        }
    };
    if id < 0 {
        return (StatusCode::BAD_REQUEST, errmsg::NEGATIVE_ID).into_response();
    }

    let deadline = Instant::now() + state.timeout;
    match state.bridge.lookup(id, Some(deadline)).await {
        LookupOutcome::Found(item) => Json(item).into_response(),
        LookupOutcome::NotFound => (StatusCode::NOT_FOUND, errmsg::NOT_FOUND).into_response(),
        LookupOutcome::ServerError(message) => {
            error!(id, error = %message, "Storage tier failed");
            (StatusCode::INTERNAL_SERVER_ERROR, errmsg::INTERNAL_ERROR).into_response()
        }
        LookupOutcome::TransportError(e) => {
            error!(id, error = %e, "Bus round trip failed");
            (StatusCode::INTERNAL_SERVER_ERROR, errmsg::INTERNAL_ERROR).into_response()
        }
    }
}
