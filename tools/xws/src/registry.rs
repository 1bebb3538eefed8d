// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry of connected WebSocket clients.
//!
//! Each client owns a bounded queue drained by its session writer task.
//! Broadcasting snapshots the queues first and never awaits, so the UDP
//! receiver cannot stall behind a slow or vanishing client.

use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};
use uuid::Uuid;

/// Frame shared by every recipient of one broadcast.
pub type Frame = Arc<str>;

/// Short client identifier used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.simple().to_string();
        f.write_str(&s[..8])
    }
}

/// Connected clients: id -> outbound queue
pub struct ClientRegistry {
    clients: DashMap<ClientId, mpsc::Sender<Frame>>,
    queue_depth: usize,
}

impl ClientRegistry {
    /// Create a registry whose clients buffer up to `queue_depth` frames.
    pub fn new(queue_depth: usize) -> Self {
        Self {
            clients: DashMap::new(),
            queue_depth: queue_depth.max(1),
        }
    }

    /// Add a client; the receiver yields every frame broadcast from now on.
    pub fn register(&self) -> (ClientId, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(self.queue_depth);
        let id = ClientId::new();
        self.clients.insert(id, tx);
        (id, rx)
    }

    pub fn unregister(&self, id: ClientId) {
        self.clients.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Queue `frame` for every open client. Returns the number of clients
    /// that accepted it.
    pub fn broadcast(&self, frame: Frame) -> usize {
        let snapshot: Vec<(ClientId, mpsc::Sender<Frame>)> = self
            .clients
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        let mut delivered = 0;
        for (id, tx) in snapshot {
            match tx.try_send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!("[{}] Outbound queue full, dropping telemetry", id);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!("[{}] Client gone, pruning", id);
                    self.clients.remove(&id);
                }
            }
        }
        delivered
    }
}
