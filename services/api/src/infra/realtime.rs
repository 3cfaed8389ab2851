use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tokio::sync::broadcast;

use crate::domain::repository::RealtimeNotifier;
use crate::domain::types::{NotifyError, RealtimeEvent};

pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// In-process fan-out of realtime events to connected sockets.
///
/// Holds nothing but the live subscriber set: no persistence, no replay.
/// A subscriber that falls more than the channel capacity behind skips the
/// events it missed.
#[derive(Clone)]
pub struct BroadcastHub {
    sender: broadcast::Sender<Arc<str>>,
    connections: Arc<AtomicUsize>,
    next_id: Arc<AtomicU64>,
}

impl BroadcastHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            connections: Arc::new(AtomicUsize::new(0)),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register a listener. Dropping the returned guard disconnects it.
    pub fn connect(&self) -> Connection {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let active = self.connections.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!(connection_id = id, active, "realtime client connected");
        Connection {
            id,
            receiver: self.sender.subscribe(),
            connections: Arc::clone(&self.connections),
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::Relaxed)
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl RealtimeNotifier for BroadcastHub {
    fn broadcast(&self, event: &str, payload: serde_json::Value) -> Result<usize, NotifyError> {
        let frame = serde_json::to_string(&RealtimeEvent {
            event: event.to_owned(),
            data: payload,
        })
        .map_err(|e| NotifyError(e.to_string()))?;
        // `send` only fails when nobody is subscribed.
        Ok(self.sender.send(Arc::from(frame)).unwrap_or(0))
    }
}

/// One subscribed listener.
pub struct Connection {
    pub id: u64,
    pub receiver: broadcast::Receiver<Arc<str>>,
    connections: Arc<AtomicUsize>,
}

impl Drop for Connection {
    fn drop(&mut self) {
        let active = self.connections.fetch_sub(1, Ordering::Relaxed) - 1;
        tracing::info!(connection_id = self.id, active, "realtime client disconnected");
    }
}
