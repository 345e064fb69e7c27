//! Shared server state: one card session behind a lock.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::CardError;
use crate::host::{CardSession, HostEvent, HostSink};
use async_trait::async_trait;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g. "0.0.0.0:8080").
    pub listen_addr: String,
    /// Viewport width the shared session starts with.
    pub viewport_width: f64,
}

/// Sink that buffers events so a snapshot handler can return them in the
/// HTTP response body.
pub struct BufferSink {
    events: Arc<Mutex<Vec<HostEvent>>>,
}

#[async_trait]
impl HostSink for BufferSink {
    async fn send(&self, event: HostEvent) {
        self.events.lock().await.push(event);
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub session: Mutex<CardSession>,
    /// Event buffer the session's sink writes into; drained per snapshot.
    pub events: Arc<Mutex<Vec<HostEvent>>>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = BufferSink {
            events: events.clone(),
        };
        Self {
            session: Mutex::new(CardSession::new(config.viewport_width, Box::new(sink))),
            events,
        }
    }

    /// Run the snapshot contract and return the events it emitted.
    ///
    /// The event buffer is drained while the session lock is still held, so
    /// a concurrent snapshot cannot claim this request's events.
    pub async fn snapshot_events(&self) -> (Result<String, CardError>, Vec<HostEvent>) {
        let mut session = self.session.lock().await;
        let result = session.get_node_image().await;
        let events = std::mem::take(&mut *self.events.lock().await);
        drop(session);
        (result, events)
    }
}
