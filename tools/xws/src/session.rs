// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! WebSocket client session management.
//!
//! Each connected WebSocket client gets a Session that handles:
//! - Forwarding its frames, in arrival order, to the simulator
//! - Draining broadcast telemetry into the socket
//!
//! Nothing is ever sent back in reply to a client frame.

use crate::bridge::SimBridge;
use crate::registry::ClientRegistry;
use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// A WebSocket client session
pub struct ClientSession {
    bridge: Arc<SimBridge>,
    registry: Arc<ClientRegistry>,
}

impl ClientSession {
    /// Create a new client session
    pub fn new(bridge: Arc<SimBridge>, registry: Arc<ClientRegistry>) -> Self {
        Self { bridge, registry }
    }

    /// Run the session, handling messages until disconnect
    pub async fn run(self, socket: WebSocket) {
        let (mut ws_tx, mut ws_rx) = socket.split();
        let (client_id, mut frames) = self.registry.register();
        info!("[{}] Session started", client_id);

        // Forward broadcast telemetry to this client
        let ws_forward = tokio::spawn(async move {
            while let Some(frame) = frames.recv().await {
                if ws_tx.send(Message::Text(frame.to_string())).await.is_err() {
                    debug!("[{}] WebSocket send failed, closing", client_id);
                    break;
                }
            }
        });

        // Handle incoming messages
        while let Some(msg) = ws_rx.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    self.bridge.handle_client_text(&text).await;
                }
                Ok(Message::Binary(bytes)) => match std::str::from_utf8(&bytes) {
                    Ok(text) => {
                        self.bridge.handle_client_text(text).await;
                    }
                    Err(_) => {
                        warn!("[{}] Dropping non-UTF-8 binary frame", client_id);
                    }
                },
                Ok(Message::Close(_)) => {
                    info!("[{}] Client closed connection", client_id);
                    break;
                }
                Ok(Message::Ping(_)) => {
                    // Axum handles pong automatically
                }
                Ok(Message::Pong(_)) => {
                    debug!("[{}] Pong received", client_id);
                }
                Err(e) => {
                    error!("[{}] WebSocket error: {}", client_id, e);
                    break;
                }
            }
        }

        // Cleanup
        self.registry.unregister(client_id);
        ws_forward.abort();
        info!("[{}] Session ended", client_id);
    }
}
