//! # API REST
//!
//! REST API implementation for Stickerbox.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - Raw sticker serving and the single-page client (static assets with SPA
//!   fallback)
//!
//! Core semantics live in `stickerbox-core`; this crate only maps them onto
//! the wire.

#![warn(rust_2018_idioms)]

mod assets;
mod error;
mod handlers;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use stickerbox_core::{CoreConfig, RegistryService, StoredFile};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

/// Uploads above this size are rejected outright.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    /// The file registry service all API operations go through
    pub service: Arc<RegistryService>,
    /// Startup configuration (storage and public asset directories)
    pub cfg: Arc<CoreConfig>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_files,
        handlers::list_tags,
        handlers::add_tag,
        handlers::remove_tag,
        handlers::toggle_pin,
        handlers::upload,
        handlers::delete_file,
    ),
    components(schemas(
        StoredFile,
        handlers::TagReq,
        handlers::PinReq,
        handlers::DeleteReq,
        handlers::MessageRes,
        handlers::PinRes,
        handlers::UploadRes,
        handlers::UploadedFile,
    ))
)]
struct ApiDoc;

/// Builds the full application router.
///
/// API routes are matched first; `/stickers/{filename}` serves raw sticker
/// bytes; everything else falls through to the static asset handler, which
/// serves the single-page client from the configured public root (and 404s
/// for unmatched `api/` paths instead of falling back).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/files", get(handlers::list_files))
        .route("/api/tags", get(handlers::list_tags))
        .route(
            "/api/files/tag",
            post(handlers::add_tag).delete(handlers::remove_tag),
        )
        .route("/api/files/pin", post(handlers::toggle_pin))
        .route(
            "/api/upload",
            post(handlers::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/delete/:filename", delete(handlers::delete_file))
        .route("/stickers/:filename", get(assets::serve_sticker))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(assets::serve_asset)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
