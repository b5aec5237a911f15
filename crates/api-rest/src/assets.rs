//! Raw sticker serving and the single-page client's static assets.
//!
//! Both handlers serve only from their configured roots. Request paths are
//! rebuilt from plain components before touching the filesystem, so `..`
//! segments or absolute paths can never escape the sticker or public asset
//! directory (the original service this replaces served its whole working
//! directory).

use crate::AppState;
use axum::extract::{Path as AxumPath, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};

/// `GET /stickers/{filename}` — raw bytes of one stored sticker.
pub async fn serve_sticker(
    State(state): State<AppState>,
    AxumPath(filename): AxumPath<String>,
) -> Response {
    if !is_plain_filename(&filename) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let path = state.cfg.stickers_dir().join(&filename);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            // Stickers are arbitrary binaries; sniff the content rather
            // than trusting the extension.
            let content_type = infer::get(&bytes)
                .map(|kind| kind.mime_type())
                .unwrap_or_else(|| content_type_for(&filename));
            ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Fallback handler: static assets with SPA fallback.
///
/// Serves a matching file under the public root, otherwise the root index
/// page so client-side routes survive a page reload. Paths under `api/` are
/// never treated as assets; an unmatched API path is a plain 404.
pub async fn serve_asset(State(state): State<AppState>, uri: Uri) -> Response {
    // Raw request paths are percent-encoded; decode before matching so
    // assets with spaces or non-ASCII names resolve, the same way
    // `axum::extract::Path` decodes the captured routes.
    let Ok(decoded) = percent_decode_str(uri.path()).decode_utf8() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let request_path = decoded.trim_start_matches('/');

    if request_path.starts_with("api/") || request_path == "api" {
        return StatusCode::NOT_FOUND.into_response();
    }

    if let Some(relative) = sanitize_relative(request_path) {
        if !relative.as_os_str().is_empty() {
            let candidate = state.cfg.public_dir().join(&relative);
            if candidate.is_file() {
                return serve_public_file(&candidate, request_path).await;
            }
        }
    }

    // SPA fallback: any unknown path gets the index page.
    let index = state.cfg.public_dir().join("index.html");
    if index.is_file() {
        serve_public_file(&index, "index.html").await
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn serve_public_file(path: &Path, name: &str) -> Response {
    match tokio::fs::read(path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type_for(name))], bytes).into_response(),
        Err(e) => {
            tracing::warn!("failed to read asset {}: {e}", path.display());
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Rebuilds `request_path` from normal components only.
///
/// Returns `None` when the path contains `..`, a root, or any other
/// non-plain component.
fn sanitize_relative(request_path: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(request_path).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            _ => return None,
        }
    }
    Some(relative)
}

fn is_plain_filename(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// Extension-based content type for text assets `infer` cannot sniff.
fn content_type_for(name: &str) -> &'static str {
    match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}
