// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Static file serving for the cockpit web UI.
//!
//! Files are read from the configured directory at request time, so the UI
//! can be edited without restarting the relay.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Serve `uri_path` from `root`, or 404.
pub async fn serve_static(root: Option<&Path>, uri_path: &str) -> Response {
    let Some(root) = root else {
        return not_found();
    };
    let Some(mut path) = resolve(root, uri_path) else {
        debug!("Rejected static path '{}'", uri_path);
        return not_found();
    };

    if uri_path.ends_with('/') || tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_dir()) {
        path.push("index.html");
    }

    match tokio::fs::read(&path).await {
        Ok(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                content,
            )
                .into_response()
        }
        Err(e) => {
            debug!("Static file {} unavailable: {}", path.display(), e);
            not_found()
        }
    }
}

/// Map a request path onto `root`, refusing anything that escapes it.
fn resolve(root: &Path, uri_path: &str) -> Option<PathBuf> {
    let relative = Path::new(uri_path.trim_start_matches('/'));
    let mut out = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 Not Found").into_response()
}
