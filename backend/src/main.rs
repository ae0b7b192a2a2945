use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

mod domain;
mod rest;
mod storage;

use rest::AppState;
use storage::fs::FsConnection;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let data_dir = std::env::var("DEEN_TRACKER_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./data"));
    let port: u16 = std::env::var("DEEN_TRACKER_PORT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(3000);

    info!("Opening data directory at {:?}", data_dir);
    let connection = Arc::new(FsConnection::new(&data_dir)?);
    let state = AppState::new(connection);

    // CORS setup to allow the dashboard frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:5173".parse::<HeaderValue>().unwrap())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api", rest::api_router())
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
