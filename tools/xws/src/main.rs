// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! xws - Connect browser cockpits to X-Plane over WebSocket.
//!
//! # Usage
//!
//! ```bash
//! # Relay on the default port 5174 to X-Plane on localhost:49000
//! xws
//!
//! # Serve a web UI and talk to a simulator on another machine
//! xws --static-dir ./cockpit --sim-addr 192.168.1.20:49000
//!
//! # Simulator with the opposite byte order
//! XWS_FLIP_ENDIAN=1 xws
//!
//! # From a configuration file
//! xws --config xws.toml
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use xws::{build_router, AppState, ConfigError, RelayConfig};

/// xws WebSocket relay
#[derive(Parser, Debug, Clone)]
#[command(name = "xws")]
#[command(about = "xws - WebSocket to X-Plane UDP relay")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, env = "XWS_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP / WebSocket port (0 = any free port)
    #[arg(short, long, env = "XWS_PORT")]
    port: Option<u16>,

    /// Bind address
    #[arg(short, long, env = "XWS_BIND")]
    bind: Option<std::net::IpAddr>,

    /// Directory with the web UI ("null" disables)
    #[arg(long, env = "XWS_STATIC")]
    static_dir: Option<PathBuf>,

    /// Environment name; "debug" enables request and datagram logging
    #[arg(long = "env", env = "XWS_ENV")]
    environment: Option<String>,

    /// Invert the host byte order on the wire
    #[arg(
        long,
        env = "XWS_FLIP_ENDIAN",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    flip_endian: bool,

    /// Simulator UDP address
    #[arg(long, env = "XWS_SIM_ADDR")]
    sim_addr: Option<SocketAddr>,

    /// Maximum concurrent WebSocket connections
    #[arg(long)]
    max_clients: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "XWS_LOG")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = build_config(&args)?;

    // Setup logging
    let filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("xws relay v{}", env!("CARGO_PKG_VERSION"));
    if config.debug {
        info!("Debug environment: request tracing and datagram dumps enabled");
    }

    let listen_addr = config.listen_addr();
    let state = Arc::new(AppState::new(config).await?);
    let receiver = state.spawn_receiver();
    let app = build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    let bound = listener.local_addr()?;
    let public_ip = if bound.ip().is_unspecified() {
        local_ip_address::local_ip().unwrap_or(bound.ip())
    } else {
        bound.ip()
    };

    info!("Server running @ http://{}:{}", public_ip, bound.port());
    info!("WebSocket endpoint: ws://{}:{}/", public_ip, bound.port());
    match state.config.static_dir {
        Some(ref dir) => info!("Static files: {}", dir.display()),
        None => info!("Static files: disabled"),
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    receiver.abort();
    info!("Shutting down");
    Ok(())
}

/// Defaults, then file, then CLI / environment.
fn build_config(args: &Args) -> Result<RelayConfig, ConfigError> {
    let mut config = match args.config {
        Some(ref path) => RelayConfig::from_file(path)?,
        None => RelayConfig::default(),
    };

    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(ref dir) = args.static_dir {
        config.set_static_dir(Some(dir.clone()));
    }
    if let Some(ref environment) = args.environment {
        config.debug = environment.eq_ignore_ascii_case("debug");
    }
    if args.flip_endian {
        config.flip_endianness = true;
    }
    if let Some(sim_addr) = args.sim_addr {
        config.sim_addr = sim_addr;
    }
    if let Some(max_clients) = args.max_clients {
        config.max_clients = max_clients;
    }
    if let Some(ref level) = args.log_level {
        config.log_level = level.clone();
    } else if config.debug && config.log_level == "info" {
        config.log_level = "debug".to_string();
    }

    config.validate()?;
    Ok(config)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
