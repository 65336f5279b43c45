use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::server::Gateway;

static INDEX_HTML: &str = include_str!("../../assets/index.html");

pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ask", post(ask))
        .route("/health", get(health))
        .with_state(gateway)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn ask(State(gateway): State<Arc<Gateway>>, body: Bytes) -> impl IntoResponse {
    let (status, response) = gateway.handle(&body).await;
    (status, Json(response))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Binds the listener and serves until Ctrl+C.
pub async fn serve(host: &str, port: u16, gateway: Arc<Gateway>) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid listen address {host}:{port}"))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        "Pitstop listening on http://{} (model: {})",
        listener.local_addr()?,
        gateway.model()
    );

    axum::serve(listener, router(gateway))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Pitstop stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested (Ctrl+C received)");
    }
}
