//! Inkpad canvas server
//!
//! Persists the state of a freeform drawing canvas (lines, images, text
//! boxes) for the note-taking client and serves it back on load.
//!
//! # Configuration
//!
//! Environment variables:
//! - `INKPAD_PORT`: Port to listen on (default: 8080)
//! - `INKPAD_DATABASE_PATH`: SQLite database file (default: ~/.local/share/inkpad/inkpad.db)
//! - `INKPAD_UPLOAD_DIR`: Directory for uploaded images (default: ~/.local/share/inkpad/uploads)
//! - `INKPAD_CONFIG`: Path to config file (default: ~/.config/inkpad/config.yaml)
//!
//! # Endpoints
//!
//! - `POST /api/canvas/save`: apply a change batch to the canvas
//! - `GET /api/canvas/load`: full canvas snapshot
//! - `POST /api/upload`: store an image; `GET /uploads/{file}` serves it back
//! - `GET /health`: liveness probe

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod models;
mod server;

use config::Config;
use server::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkpad_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::var("INKPAD_CONFIG").map(PathBuf::from).ok();
    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Ensure the upload directory exists before anything is served from it
    if let Err(e) = std::fs::create_dir_all(&config.upload_dir) {
        tracing::error!("Failed to create upload directory: {}", e);
        std::process::exit(1);
    }

    // Open the database and run migrations
    let pool = match db::init_db(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Database: {}", config.database_path.display());
    tracing::info!("Uploads: {}", config.upload_dir.display());

    let state = AppState {
        pool,
        upload_dir: config.upload_dir,
    };
    let app = server::router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
