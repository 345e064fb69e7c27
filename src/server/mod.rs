//! # HTTP Embedding Surface
//!
//! Exposes the host contract over HTTP for embeddings that are not
//! in-process:
//!
//! - `POST /api/card/draw` — push a card spec into the shared session
//! - `GET  /api/card/preview?width=N` — render the current card to PNG
//! - `POST /api/card/snapshot` — run the full snapshot contract and return
//!   the emitted host events as a JSON array
//!
//! ## Usage
//!
//! ```bash
//! credencial serve --listen 0.0.0.0:8080 --width 1200
//! ```

mod handlers;
mod state;

pub use state::ServerConfig;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::error::CardError;
use state::AppState;

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use credencial::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), credencial::CardError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     viewport_width: 1200.0,
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), CardError> {
    let app_state = Arc::new(AppState::new(&config));

    let app = Router::new()
        .route("/api/card/draw", post(handlers::draw))
        .route("/api/card/preview", get(handlers::preview))
        .route("/api/card/snapshot", post(handlers::snapshot))
        .with_state(app_state);

    println!("[server] credencial HTTP server starting");
    println!("[server] listening on: {}", config.listen_addr);
    println!("[server] viewport width: {}", config.viewport_width);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| CardError::Http(e.to_string()))?;

    Ok(())
}
