// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Simulator bridge - connects WebSocket clients to the X-Plane UDP port.
//!
//! Owns the UDP socket and the codec. Client frames are encoded and sent
//! once to the simulator (no acknowledgment, no retry); `RREF` datagrams
//! coming back are converted to JSON and fanned out through the
//! [`ClientRegistry`].

use crate::config::RelayConfig;
use crate::dispatch::{self, DispatchError};
use crate::registry::ClientRegistry;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};
use xws_proto::{ByteOrder, Codec, RecordTag, Request};

/// Largest datagram accepted from the simulator.
const MAX_DATAGRAM: usize = 65_536;

/// Bridge errors.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// What happened to one client frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Sent to the simulator as one datagram of `bytes` length.
    Forwarded { tag: RecordTag, bytes: usize },
    /// Header not recognized.
    Ignored,
    /// Malformed, unencodable or failed to send.
    Rejected,
}

/// Bridge counters.
#[derive(Debug, Default)]
struct BridgeStats {
    forwarded: AtomicU64,
    ignored: AtomicU64,
    rejected: AtomicU64,
    telemetry_batches: AtomicU64,
    telemetry_deliveries: AtomicU64,
}

/// Point-in-time copy of the bridge counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BridgeStatsSnapshot {
    pub forwarded: u64,
    pub ignored: u64,
    pub rejected: u64,
    pub telemetry_batches: u64,
    pub telemetry_deliveries: u64,
}

/// Simulator bridge - owns the UDP socket and codec
pub struct SimBridge {
    socket: UdpSocket,
    codec: Codec,
    sim_addr: SocketAddr,
    dump_datagrams: bool,
    stats: BridgeStats,
}

impl SimBridge {
    /// Bind the local UDP socket and resolve the wire byte order.
    pub async fn bind(config: &RelayConfig) -> Result<Self, BridgeError> {
        let socket = UdpSocket::bind(config.udp_bind).await?;
        let byte_order = config.byte_order();

        info!(
            "UDP socket bound to {} -> simulator {} ({} endian)",
            socket.local_addr()?,
            config.sim_addr,
            byte_order
        );

        Ok(Self {
            socket,
            codec: Codec::new(byte_order),
            sim_addr: config.sim_addr,
            dump_datagrams: config.debug,
            stats: BridgeStats::default(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, BridgeError> {
        Ok(self.socket.local_addr()?)
    }

    pub fn sim_addr(&self) -> SocketAddr {
        self.sim_addr
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.codec.byte_order()
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Encode `request` and send it once to the simulator.
    pub async fn forward(&self, request: &Request) -> Result<usize, BridgeError> {
        let datagram = dispatch::encode_request(&self.codec, request)?;
        if self.dump_datagrams {
            debug!("UDP out: {}", dispatch::preview(&datagram));
        }
        let sent = self.socket.send_to(&datagram, self.sim_addr).await?;
        Ok(sent)
    }

    /// Handle one client text frame. Never fails: problems are logged and
    /// the frame is dropped.
    pub async fn handle_client_text(&self, text: &str) -> Outcome {
        let request = match dispatch::parse_client_frame(text) {
            Ok(Some(request)) => request,
            Ok(None) => {
                self.stats.ignored.fetch_add(1, Ordering::Relaxed);
                debug!("Ignoring message with unrecognized header");
                return Outcome::Ignored;
            }
            Err(e) => {
                self.stats.rejected.fetch_add(1, Ordering::Relaxed);
                warn!("Rejected client message: {}", e);
                return Outcome::Rejected;
            }
        };

        if let Request::DatarefSubscribe(ref sub) = request {
            if sub.is_cancel() {
                debug!("Cancelling subscription {} ('{}')", sub.index, sub.path);
            }
        }

        match self.forward(&request).await {
            Ok(bytes) => {
                self.stats.forwarded.fetch_add(1, Ordering::Relaxed);
                debug!("Forwarded {} '{}' ({} bytes)", request.tag(), request.path(), bytes);
                Outcome::Forwarded {
                    tag: request.tag(),
                    bytes,
                }
            }
            Err(e) => {
                self.stats.rejected.fetch_add(1, Ordering::Relaxed);
                warn!("Dropped {} request: {}", request.tag(), e);
                Outcome::Rejected
            }
        }
    }

    /// Convert one simulator datagram and broadcast it. Returns the number
    /// of clients that received a frame.
    pub fn handle_datagram(&self, datagram: &[u8], registry: &ClientRegistry) -> usize {
        let Some(json) = dispatch::telemetry_frame(&self.codec, datagram) else {
            return 0;
        };

        let delivered = registry.broadcast(Arc::from(json));
        self.stats.telemetry_batches.fetch_add(1, Ordering::Relaxed);
        self.stats
            .telemetry_deliveries
            .fetch_add(delivered as u64, Ordering::Relaxed);
        delivered
    }

    /// Receive loop for simulator datagrams. Runs until the task is dropped.
    pub async fn run_receiver(self: Arc<Self>, registry: Arc<ClientRegistry>) {
        info!("Telemetry receiver started");
        let mut buf = vec![0u8; MAX_DATAGRAM];

        loop {
            match self.socket.recv_from(&mut buf).await {
                Ok((len, from)) => {
                    if self.dump_datagrams {
                        debug!("UDP in from {}: {}", from, dispatch::preview(&buf[..len]));
                    }
                    self.handle_datagram(&buf[..len], &registry);
                }
                Err(e) => {
                    // ICMP port-unreachable from a closed simulator surfaces here.
                    warn!("UDP receive error: {}", e);
                }
            }
        }
    }

    pub fn stats(&self) -> BridgeStatsSnapshot {
        BridgeStatsSnapshot {
            forwarded: self.stats.forwarded.load(Ordering::Relaxed),
            ignored: self.stats.ignored.load(Ordering::Relaxed),
            rejected: self.stats.rejected.load(Ordering::Relaxed),
            telemetry_batches: self.stats.telemetry_batches.load(Ordering::Relaxed),
            telemetry_deliveries: self.stats.telemetry_deliveries.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback_config(sim_addr: SocketAddr) -> RelayConfig {
        RelayConfig {
            sim_addr,
            udp_bind: "127.0.0.1:0".parse().unwrap(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn command_reaches_simulator() {
        let sim = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let bridge = SimBridge::bind(&loopback_config(sim.local_addr().unwrap()))
            .await
            .unwrap();

        let outcome = bridge
            .handle_client_text(r#"{"header":"CMND","path":"sim/view/forward"}"#)
            .await;
        assert_eq!(
            outcome,
            Outcome::Forwarded {
                tag: RecordTag::Command,
                bytes: 21
            }
        );

        let mut buf = [0u8; 64];
        let (len, _) = sim.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], b"CMND\0sim/view/forward");
    }

    #[tokio::test]
    async fn bad_frames_are_counted_not_sent() {
        let sim = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let bridge = SimBridge::bind(&loopback_config(sim.local_addr().unwrap()))
            .await
            .unwrap();

        assert_eq!(bridge.handle_client_text("{oops").await, Outcome::Rejected);
        assert_eq!(
            bridge.handle_client_text(r#"{"header":"XXXX"}"#).await,
            Outcome::Ignored
        );
        let long = format!(r#"{{"header":"RREF","freq":1,"index":1,"path":"{}"}}"#, "z".repeat(401));
        assert_eq!(bridge.handle_client_text(&long).await, Outcome::Rejected);

        let stats = bridge.stats();
        assert_eq!(stats.forwarded, 0);
        assert_eq!(stats.ignored, 1);
        assert_eq!(stats.rejected, 2);
    }

    #[tokio::test]
    async fn datagram_with_no_clients_is_counted() {
        let sim = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let bridge = SimBridge::bind(&loopback_config(sim.local_addr().unwrap()))
            .await
            .unwrap();
        let registry = ClientRegistry::new(4);

        let datagram = bridge
            .codec()
            .encode_subscription_batch(&[xws_proto::SubscriptionUpdate { index: 1, value: 1.0 }]);
        assert_eq!(bridge.handle_datagram(&datagram, &registry), 0);
        assert_eq!(bridge.handle_datagram(b"DATA\0", &registry), 0);
        assert_eq!(bridge.stats().telemetry_batches, 1);

        assert_eq!(bridge.handle_datagram(b"RREF\0", &registry), 0);
        assert_eq!(bridge.stats().telemetry_batches, 2);
    }

    #[tokio::test]
    async fn header_only_response_reaches_clients() {
        let sim = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let bridge = SimBridge::bind(&loopback_config(sim.local_addr().unwrap()))
            .await
            .unwrap();
        let registry = ClientRegistry::new(4);
        let (_id, mut rx) = registry.register();

        assert_eq!(bridge.handle_datagram(b"RREF\0\x01", &registry), 1);
        assert_eq!(&*rx.recv().await.unwrap(), r#"{"header":"RREF","data":[]}"#);
    }
}
