// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! xws - WebSocket relay for the X-Plane legacy UDP protocol.
//!
//! Browser cockpits speak JSON over WebSocket; the simulator speaks fixed
//! layout binary records over UDP. The relay translates between the two:
//!
//! ```text
//! WS text frame -> JSON -> dispatch -> codec encode -> UDP datagram (sim:49000)
//! UDP datagram (RREF) -> codec decode -> JSON -> broadcast to all WS clients
//! ```
//!
//! # Protocol
//!
//! ```json
//! // Run a command
//! {"header": "CMND", "path": "sim/operation/pause_toggle"}
//!
//! // Write a dataref
//! {"header": "DREF", "path": "sim/cockpit/electrical/battery_on", "data": 1}
//!
//! // Subscribe (freq > 0) or cancel (freq <= 0)
//! {"header": "RREF", "freq": 5, "index": 42, "path": "sim/test/var"}
//!
//! // Telemetry pushed to every client
//! {"header": "RREF", "data": [[42, 3.5]]}
//! ```
//!
//! Bad frames are dropped silently: the legacy protocol has no error channel.

pub mod bridge;
pub mod config;
pub mod dispatch;
pub mod protocol;
pub mod registry;
pub mod routes;
pub mod server;
pub mod session;

pub use bridge::{BridgeError, BridgeStatsSnapshot, Outcome, SimBridge};
pub use config::{ConfigError, RelayConfig};
pub use registry::ClientRegistry;
pub use server::{build_router, AppState};
