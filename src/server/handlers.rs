//! HTTP handlers for the card embedding API.

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::state::AppState;
use crate::card::CardSpec;

/// Handle POST /api/card/draw - replace the current card spec.
pub async fn draw(
    State(state): State<Arc<AppState>>,
    Json(spec): Json<CardSpec>,
) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    session.draw_new_content(spec);
    println!("[server] new card content drawn");
    Json(json!({ "success": true }))
}

#[derive(Debug, Deserialize)]
pub struct PreviewParams {
    /// Optional viewport width override for this render.
    pub width: Option<f64>,
}

/// Handle GET /api/card/preview - render the current card as PNG.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PreviewParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut session = state.session.lock().await;
    let prior_width = session.scale_context().viewport_width();
    if let Some(width) = params.width {
        session.set_viewport_width(width);
    }
    let result = session.render_png().await;
    // The override applies to this render only
    session.set_viewport_width(prior_width);

    let png_bytes = result.map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png_bytes))
}

/// Handle POST /api/card/snapshot - run the full snapshot contract.
///
/// Responds with the host events the session emitted, in order: the loading
/// signal followed by either the data-URI payload or the error message.
pub async fn snapshot(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (result, events) = state.snapshot_events().await;
    let status = if result.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, Json(events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::state::ServerConfig;
    use pretty_assertions::assert_eq;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(&ServerConfig {
            listen_addr: "127.0.0.1:0".to_string(),
            viewport_width: 600.0,
        }))
    }

    fn sample_spec() -> CardSpec {
        serde_json::from_str(
            r##"{
                "data": { "image": "", "barcode": "12345", "name": "Ada" },
                "background": "#112233",
                "barcode": { "x": 100, "y": 520, "width": 1000, "height": 200 },
                "name": { "x": 100, "y": 420, "width": 1000, "color": "#ffffff", "fontSize": 48 }
            }"##,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_preview_width_override_does_not_persist() {
        let state = test_state();
        state.session.lock().await.draw_new_content(sample_spec());

        let result = preview(
            State(state.clone()),
            Query(PreviewParams { width: Some(300.0) }),
        )
        .await;
        assert!(result.is_ok());

        let mut session = state.session.lock().await;
        assert_eq!(session.scale_context().viewport_width(), 600.0);
        let png = session.render_png().await.unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (600, 400));
    }
}
