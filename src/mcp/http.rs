//! Streamable HTTP transport.
//!
//! Every `POST /mcp` body carries one JSON-RPC message and is answered in the
//! same HTTP response. The server never opens a stream of its own, so
//! `GET /mcp` is refused.
//!
//! | Route          | Reply                                              |
//! |----------------|----------------------------------------------------|
//! | `POST /mcp`    | `200` JSON reply, or `202` for a notification      |
//! | `GET /mcp`     | `405 Method Not Allowed`                           |
//! | `GET /health`  | `200 OK`                                           |

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use crate::mcp::protocol::{parse_message, IncomingMessage, OutgoingMessage};
use crate::mcp::server::McpServer;

/// Header carrying the session identifier issued on `initialize`.
pub const SESSION_HEADER: &str = "mcp-session-id";

/// Creates the router serving `server`.
pub fn router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route("/mcp", post(mcp_post).get(mcp_get))
        .route("/health", get(health_check))
        .with_state(server)
}

/// Binds `addr` and serves until `shutdown` resolves.
///
/// In-flight requests are allowed to finish before this returns.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or serving fails.
pub async fn serve_http<F>(
    server: Arc<McpServer>,
    addr: SocketAddr,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "HTTP transport listening");

    axum::serve(listener, router(server))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on SIGINT or SIGTERM (Ctrl+C on Windows).
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => tracing::info!("Received SIGINT, initiating graceful shutdown"),
                    _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating graceful shutdown"),
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!(error = %e, "Failed to install signal handlers");
                std::future::pending::<()>().await;
            }
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, initiating graceful shutdown");
    }
}

/// POST /mcp - handle one JSON-RPC message.
async fn mcp_post(
    State(server): State<Arc<McpServer>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let message = match parse_message(&body) {
        Ok(message) => message,
        Err(error) => {
            tracing::debug!(code = error.code(), "Rejecting malformed HTTP message");
            return (StatusCode::BAD_REQUEST, Json(OutgoingMessage::from(error))).into_response();
        }
    };

    let is_initialize =
        matches!(&message, IncomingMessage::Request(req) if req.method == "initialize");

    let Some(reply) = server.handle_message(message).await else {
        return StatusCode::ACCEPTED.into_response();
    };

    let session_id = if is_initialize && reply.as_error().is_none() {
        let id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(session = %id, "Issued session id");
        HeaderValue::from_str(&id).ok()
    } else {
        headers.get(SESSION_HEADER).cloned()
    };

    let mut response = (StatusCode::OK, Json(reply)).into_response();
    if let Some(value) = session_id {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}

/// GET /mcp - no server-initiated stream is offered.
async fn mcp_get() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        "Server-initiated streams are not supported",
    )
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
