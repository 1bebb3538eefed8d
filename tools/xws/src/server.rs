// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! HTTP / WebSocket front end.
//!
//! - `GET /` with an upgrade header, or `GET /ws`: WebSocket relay session
//! - `GET /health`: relay status
//! - anything else: static files from `static_dir`, if configured

use crate::bridge::{BridgeError, SimBridge};
use crate::config::RelayConfig;
use crate::registry::ClientRegistry;
use crate::routes;
use crate::session::ClientSession;
use axum::{
    extract::{ws::WebSocket, State, WebSocketUpgrade},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Shared application state
pub struct AppState {
    pub bridge: Arc<SimBridge>,
    pub registry: Arc<ClientRegistry>,
    pub config: RelayConfig,
}

impl AppState {
    pub async fn new(config: RelayConfig) -> Result<Self, BridgeError> {
        let bridge = SimBridge::bind(&config).await?;
        let registry = ClientRegistry::new(config.client_queue);

        Ok(Self {
            bridge: Arc::new(bridge),
            registry: Arc::new(registry),
            config,
        })
    }

    fn can_accept_client(&self) -> bool {
        self.registry.len() < self.config.max_clients
    }

    /// Start the simulator receive loop.
    pub fn spawn_receiver(&self) -> tokio::task::JoinHandle<()> {
        let bridge = self.bridge.clone();
        let registry = self.registry.clone();
        tokio::spawn(bridge.run_receiver(registry))
    }
}

/// Build the axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let debug = state.config.debug;

    let router = Router::new()
        .route("/", get(root_handler))
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .fallback(static_handler)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let router = if debug {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

/// `/` serves both the legacy WebSocket endpoint and the UI index.
async fn root_handler(
    ws: Option<WebSocketUpgrade>,
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Response {
    match ws {
        Some(ws) => upgrade(ws, state),
        None => routes::serve_static(state.config.static_dir.as_deref(), uri.path()).await,
    }
}

/// WebSocket upgrade handler
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    upgrade(ws, state)
}

fn upgrade(ws: WebSocketUpgrade, state: Arc<AppState>) -> Response {
    if !state.can_accept_client() {
        warn!("Connection rejected: max clients reached");
        return (StatusCode::SERVICE_UNAVAILABLE, "Too many connections").into_response();
    }

    ws.on_upgrade(move |socket| handle_socket(socket, state))
        .into_response()
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session = ClientSession::new(state.bridge.clone(), state.registry.clone());
    session.run(socket).await;
}

async fn static_handler(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    routes::serve_static(state.config.static_dir.as_deref(), uri.path()).await
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "clients": state.registry.len(),
        "max_clients": state.config.max_clients,
        "sim_addr": state.bridge.sim_addr().to_string(),
        "byte_order": state.bridge.byte_order().as_str(),
        "stats": state.bridge.stats(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    async fn spawn_app(static_dir: Option<std::path::PathBuf>) -> SocketAddr {
        let config = RelayConfig {
            udp_bind: "127.0.0.1:0".parse().unwrap(),
            static_dir,
            ..Default::default()
        };
        let state = Arc::new(AppState::new(config).await.unwrap());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn health_reports_status() {
        let addr = spawn_app(None).await;
        let json: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["clients"], 0);
        assert_eq!(json["sim_addr"], "127.0.0.1:49000");
        assert_eq!(json["stats"]["forwarded"], 0);
    }

    #[tokio::test]
    async fn root_without_upgrade_serves_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>EFIS</h1>").unwrap();

        let addr = spawn_app(Some(dir.path().to_path_buf())).await;
        let res = reqwest::get(format!("http://{addr}/")).await.unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::OK);
        assert_eq!(res.text().await.unwrap(), "<h1>EFIS</h1>");
    }

    #[tokio::test]
    async fn unknown_path_without_static_dir_is_404() {
        let addr = spawn_app(None).await;
        let res = reqwest::get(format!("http://{addr}/app.js")).await.unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
