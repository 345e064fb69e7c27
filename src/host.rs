//! # Host Bridge
//!
//! The boundary contract an embedding host drives. The original surface was
//! a pair of ambient globals; here it is an explicit handle constructed once
//! per embedding and torn down by dropping it:
//!
//! - [`CardSession::draw_new_content`] replaces the current card spec and
//!   marks the visual dirty.
//! - [`CardSession::get_node_image`] rasterizes the card to a base64 PNG
//!   data URI, reporting progress and outcome through a [`HostSink`].
//!
//! Events serialize to the host's wire shapes: `{"isLoad":…}` for progress,
//! the raw data-URI string for success, `{"error":true,"message":…}` for
//! failure. There is no cancellation and no retry; a failed snapshot reports
//! and completes.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::barcode::EncodeCache;
use crate::card::CardSpec;
use crate::error::CardError;
use crate::layout::ScaleContext;
use crate::render::CardRenderer;
use crate::resolve::AssetResolver;

/// Fixed settle delay before a snapshot, mirroring the fade timer the
/// original used when swapping image sources. Applied only when content
/// changed since the last snapshot.
pub const SETTLE_DELAY_MS: u64 = 110;

/// Messages reported to the host during a snapshot request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HostEvent {
    /// Progress signal sent when the rasterization starts.
    Loading {
        #[serde(rename = "isLoad")]
        is_load: bool,
    },
    /// The finished snapshot as a base64 PNG data URI.
    Image(String),
    /// Snapshot failure; the operation completes without retry.
    Error { error: bool, message: String },
}

/// Transport seam for host messages. The session never knows whether events
/// cross a channel, a websocket, or a test buffer.
#[async_trait]
pub trait HostSink: Send + Sync {
    async fn send(&self, event: HostEvent);
}

/// Stock sink over a tokio mpsc channel.
pub struct ChannelSink {
    tx: mpsc::Sender<HostEvent>,
}

impl ChannelSink {
    /// Build a sink plus the receiving half the host reads.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<HostEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl HostSink for ChannelSink {
    async fn send(&self, event: HostEvent) {
        // A host that hung up is not an error the render path cares about.
        let _ = self.tx.send(event).await;
    }
}

/// Sink that drops every event; for CLI use and tests that only want the
/// returned Result.
pub struct NullSink;

#[async_trait]
impl HostSink for NullSink {
    async fn send(&self, _event: HostEvent) {}
}

/// Per-embedding session state: the current spec, the current scale, the
/// encode cache, and the event sink.
///
/// Single-threaded by construction — every operation takes `&mut self`, so
/// a snapshot in flight cannot race a re-style.
pub struct CardSession {
    spec: Option<CardSpec>,
    ctx: ScaleContext,
    cache: EncodeCache,
    resolver: AssetResolver,
    sink: Box<dyn HostSink>,
    dirty: bool,
}

impl CardSession {
    /// Construct a session for a viewport width and an event sink.
    pub fn new(viewport_width: f64, sink: Box<dyn HostSink>) -> Self {
        Self {
            spec: None,
            ctx: ScaleContext::for_viewport(viewport_width),
            cache: EncodeCache::new(),
            resolver: AssetResolver::new(),
            sink,
            dirty: false,
        }
    }

    /// Entry point 1: replace the current card specification.
    pub fn draw_new_content(&mut self, spec: CardSpec) {
        self.spec = Some(spec);
        self.dirty = true;
    }

    /// Resize notification: recompute the scale context.
    pub fn set_viewport_width(&mut self, viewport_width: f64) {
        self.ctx = ScaleContext::for_viewport(viewport_width);
    }

    /// The spec currently on display, if any.
    pub fn current_spec(&self) -> Option<&CardSpec> {
        self.spec.as_ref()
    }

    pub fn scale_context(&self) -> ScaleContext {
        self.ctx
    }

    /// Entry point 2: rasterize the card to a base64 PNG data URI.
    ///
    /// Emits `Loading` first, then either the image payload or an error
    /// event; the same outcome is also returned directly.
    pub async fn get_node_image(&mut self) -> Result<String, CardError> {
        self.sink.send(HostEvent::Loading { is_load: true }).await;

        let result = self.snapshot().await;
        match &result {
            Ok(data_uri) => self.sink.send(HostEvent::Image(data_uri.clone())).await,
            Err(e) => {
                self.sink
                    .send(HostEvent::Error {
                        error: true,
                        message: e.to_string(),
                    })
                    .await
            }
        }
        result
    }

    /// Render the current card to raw PNG bytes without the host events.
    /// Used by the HTTP preview endpoint.
    pub async fn render_png(&mut self) -> Result<Vec<u8>, CardError> {
        let spec = self
            .spec
            .as_ref()
            .ok_or_else(|| CardError::Render("no card content has been drawn".to_string()))?;
        let assets = self.resolver.resolve(spec).await;
        CardRenderer::new(spec, self.ctx, &assets).render_png(&mut self.cache)
    }

    async fn snapshot(&mut self) -> Result<String, CardError> {
        if self.spec.is_none() {
            return Err(CardError::Render(
                "no card content has been drawn".to_string(),
            ));
        }

        // Let asset swaps settle, the way the host waited out the fade.
        if self.dirty {
            tokio::time::sleep(Duration::from_millis(SETTLE_DELAY_MS)).await;
            self.dirty = false;
        }

        let spec = self
            .spec
            .as_ref()
            .ok_or_else(|| CardError::Render("no card content has been drawn".to_string()))?;
        let assets = self.resolver.resolve(spec).await;
        let canvas = CardRenderer::new(spec, self.ctx, &assets).render(&mut self.cache);
        crate::render::to_data_uri(&canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_spec() -> CardSpec {
        serde_json::from_str(
            r##"{
                "data": { "image": "", "barcode": "12345", "name": "Ada Lovelace" },
                "background": "#112233",
                "barcode": { "x": 100, "y": 520, "width": 1000, "height": 200 },
                "name": { "x": 100, "y": 420, "width": 1000, "color": "#ffffff", "fontSize": 48 }
            }"##,
        )
        .unwrap()
    }

    #[test]
    fn test_event_wire_shapes() {
        let loading = serde_json::to_string(&HostEvent::Loading { is_load: true }).unwrap();
        assert_eq!(loading, r#"{"isLoad":true}"#);

        let image = serde_json::to_string(&HostEvent::Image("data:image/png;base64,AA".into()))
            .unwrap();
        assert_eq!(image, r#""data:image/png;base64,AA""#);

        let error = serde_json::to_string(&HostEvent::Error {
            error: true,
            message: "boom".into(),
        })
        .unwrap();
        assert_eq!(error, r#"{"error":true,"message":"boom"}"#);
    }

    #[tokio::test]
    async fn test_snapshot_emits_loading_then_image() {
        let (sink, mut rx) = ChannelSink::new(8);
        let mut session = CardSession::new(600.0, Box::new(sink));
        session.draw_new_content(sample_spec());

        let data_uri = session.get_node_image().await.unwrap();
        assert!(data_uri.starts_with("data:image/png;base64,"));

        assert_eq!(rx.recv().await, Some(HostEvent::Loading { is_load: true }));
        assert_eq!(rx.recv().await, Some(HostEvent::Image(data_uri)));
    }

    #[tokio::test]
    async fn test_snapshot_without_content_reports_error() {
        let (sink, mut rx) = ChannelSink::new(8);
        let mut session = CardSession::new(600.0, Box::new(sink));

        assert!(session.get_node_image().await.is_err());

        assert_eq!(rx.recv().await, Some(HostEvent::Loading { is_load: true }));
        match rx.recv().await {
            Some(HostEvent::Error { error, message }) => {
                assert!(error);
                assert!(message.contains("no card content"));
            }
            other => panic!("expected error event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resize_changes_snapshot_dimensions() {
        let mut session = CardSession::new(600.0, Box::new(NullSink));
        session.draw_new_content(sample_spec());

        let png = session.render_png().await.unwrap();
        assert_eq!(image::load_from_memory(&png).unwrap().width(), 600);

        session.set_viewport_width(300.0);
        let png = session.render_png().await.unwrap();
        assert_eq!(image::load_from_memory(&png).unwrap().width(), 300);
    }

    #[tokio::test]
    async fn test_settle_delay_applies_once_per_draw() {
        let mut session = CardSession::new(300.0, Box::new(NullSink));
        session.draw_new_content(sample_spec());

        session.get_node_image().await.unwrap();

        // Second snapshot of unchanged content skips the settle delay.
        let start = std::time::Instant::now();
        session.get_node_image().await.unwrap();
        assert!(start.elapsed() < Duration::from_millis(SETTLE_DELAY_MS));
    }
}
