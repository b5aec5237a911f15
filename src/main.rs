//! Main entry point for the Stickerbox server.
//!
//! Resolves configuration once at startup (environment variables plus the
//! on-disk `config.toml`), builds the registry service and serves the REST
//! API together with the bundled single-page client.
//!
//! # Environment Variables
//! - `STICKERBOX_ADDR`: server address (default: "0.0.0.0:8000")
//! - `STICKERBOX_DATA_DIR`: sticker storage directory (default: "./stickers")
//! - `STICKERBOX_PUBLIC_DIR`: static asset root for the web client (default: "./public")
//! - `STICKERBOX_CONFIG`: path to the config file (default: "./config.toml")
//! - `STICKERBOX_TAGS_FILE`: path to the tag store (default: "./tags.json")

use std::path::PathBuf;
use std::sync::Arc;

use api_rest::{router, AppState};
use stickerbox_core::{load_or_create_config, CoreConfig, RegistryService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stickerbox=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("STICKERBOX_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
    let data_dir =
        PathBuf::from(std::env::var("STICKERBOX_DATA_DIR").unwrap_or_else(|_| "./stickers".into()));
    let public_dir = PathBuf::from(
        std::env::var("STICKERBOX_PUBLIC_DIR").unwrap_or_else(|_| "./public".into()),
    );
    let config_path =
        PathBuf::from(std::env::var("STICKERBOX_CONFIG").unwrap_or_else(|_| "./config.toml".into()));
    let tags_file =
        PathBuf::from(std::env::var("STICKERBOX_TAGS_FILE").unwrap_or_else(|_| "./tags.json".into()));

    std::fs::create_dir_all(&data_dir)?;

    let config_file = load_or_create_config(&config_path)?;
    let cfg = Arc::new(CoreConfig::new(
        data_dir,
        public_dir,
        tags_file,
        config_file.delete_password,
    )?);

    tracing::info!("-- Starting Stickerbox on {}", addr);
    tracing::info!("-- Serving stickers from {}", cfg.stickers_dir().display());

    let state = AppState {
        service: Arc::new(RegistryService::new(cfg.clone())),
        cfg,
    };

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
