// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Relay configuration.
//!
//! Values come from a TOML file, then command-line flags and environment
//! variables override them (see `main.rs`).
//!
//! ```toml
//! port = 5174
//! static_dir = "./public"
//! sim_addr = "127.0.0.1:49000"
//! flip_endianness = false
//! debug = false
//! ```

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;
use xws_proto::ByteOrder;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Relay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// HTTP / WebSocket bind address.
    #[serde(default = "default_bind")]
    pub bind: IpAddr,

    /// HTTP / WebSocket port (0 = ephemeral).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served over HTTP; `None` disables static files.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Debug environment: request tracing and datagram dumps.
    #[serde(default)]
    pub debug: bool,

    /// Invert the host byte order for wire numerics.
    #[serde(default)]
    pub flip_endianness: bool,

    /// Simulator UDP endpoint.
    #[serde(default = "default_sim_addr")]
    pub sim_addr: SocketAddr,

    /// Local UDP bind address (port 0 = ephemeral).
    #[serde(default = "default_udp_bind")]
    pub udp_bind: SocketAddr,

    /// Maximum concurrent WebSocket clients.
    #[serde(default = "default_max_clients")]
    pub max_clients: usize,

    /// Outbound frames buffered per client before dropping.
    #[serde(default = "default_client_queue")]
    pub client_queue: usize,

    /// Log filter (trace, debug, info, warn, error, or an EnvFilter directive).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_bind() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    5174
}

fn default_sim_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 49000))
}

fn default_udp_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 0))
}

fn default_max_clients() -> usize {
    100
}

fn default_client_queue() -> usize {
    256
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            static_dir: None,
            debug: false,
            flip_endianness: false,
            sim_addr: default_sim_addr(),
            udp_bind: default_udp_bind(),
            max_clients: default_max_clients(),
            client_queue: default_client_queue(),
            log_level: default_log_level(),
        }
    }
}

impl RelayConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.static_dir = normalize_static_dir(config.static_dir.take());
        Ok(config)
    }

    /// Set the static directory, treating `""` and `"null"` as unset.
    pub fn set_static_dir(&mut self, dir: Option<PathBuf>) {
        self.static_dir = normalize_static_dir(dir);
    }

    /// Byte order used by the wire codec for the life of the process.
    pub fn byte_order(&self) -> ByteOrder {
        ByteOrder::resolve(self.flip_endianness)
    }

    /// HTTP listen address.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_clients == 0 {
            return Err(ConfigError::Invalid("max_clients cannot be 0".into()));
        }
        if self.client_queue == 0 {
            return Err(ConfigError::Invalid("client_queue cannot be 0".into()));
        }
        if self.sim_addr.port() == 0 {
            return Err(ConfigError::Invalid("sim_addr port cannot be 0".into()));
        }
        if let Some(ref dir) = self.static_dir {
            if !dir.is_dir() {
                return Err(ConfigError::Invalid(format!(
                    "static_dir {} is not a directory",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

fn normalize_static_dir(dir: Option<PathBuf>) -> Option<PathBuf> {
    dir.filter(|d| {
        let s = d.as_os_str();
        !s.is_empty() && s != "null"
    })
}
