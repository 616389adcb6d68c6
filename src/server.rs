//! HTTP server lifecycle.

use std::time::Instant;
use anyhow::Context;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use crate::commands::{convert_all, health};
use crate::core::AppState;

/// Builds the router with every route and the request logger.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/convert-all", post(convert_all))
        .route("/health", get(health))
        .layer(middleware::from_fn(request_logger))
        .with_state(state)
}

/// Logs method, uri, status and duration of every request.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request failed"
        );
    } else {
        info!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}

/// Binds `host:port` and serves until Ctrl+C or SIGTERM.
///
/// In-flight batches finish before the server returns.
pub async fn serve(host: &str, port: u16, state: AppState) -> anyhow::Result<()> {
    let listener = bind(host, port).await?;
    info!("Server is running on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Binds a listener. `host` may be an IP literal (v4 or bare v6) or a hostname.
pub async fn bind(host: &str, port: u16) -> anyhow::Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))
}

async fn shutdown_signal() {
    tokio::select! {
        result = signal::ctrl_c() => match result {
            Ok(()) => info!("Received Ctrl+C signal"),
            Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
        },
        _ = wait_for_sigterm() => info!("Received SIGTERM signal"),
    }
    info!("Starting graceful shutdown...");
}

#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            warn!("Failed to install SIGTERM handler: {}", e);
            std::future::pending::<()>().await
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;
    use crate::config::AppConfig;

    fn router() -> Router {
        create_router(AppState::new(AppConfig::default()).unwrap())
    }

    #[tokio::test]
    async fn health_route_responds_ok() {
        let response = router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn convert_all_rejects_get() {
        let response = router()
            .oneshot(Request::builder().uri("/convert-all").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn binds_hostnames_as_well_as_ip_literals() {
        let by_name = bind("localhost", 0).await.unwrap();
        assert!(by_name.local_addr().unwrap().ip().is_loopback());

        let by_ip = bind("127.0.0.1", 0).await.unwrap();
        assert_ne!(by_ip.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = router()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
