//! Connection lifecycle events.
//!
//! The core publishes; observers (the access log, tests) subscribe. Nobody
//! subscribing is fine, and a lagging subscriber only loses events.

use std::net::SocketAddr;

use tokio::sync::broadcast;

use crate::server::registry::ConnectionId;

const EVENT_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Created {
        id: ConnectionId,
        peer: Option<SocketAddr>,
    },
    /// A response was formulated and is about to be written.
    Responded {
        id: ConnectionId,
        peer: Option<SocketAddr>,
        request_line: String,
        status: Option<u16>,
        /// Head plus payload.
        bytes: usize,
        head: String,
    },
    Errored {
        id: ConnectionId,
        error: String,
    },
    Closed {
        id: ConnectionId,
    },
}

impl ConnectionEvent {
    pub fn id(&self) -> ConnectionId {
        match self {
            ConnectionEvent::Created { id, .. }
            | ConnectionEvent::Responded { id, .. }
            | ConnectionEvent::Errored { id, .. }
            | ConnectionEvent::Closed { id } => *id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventSink {
    tx: broadcast::Sender<ConnectionEvent>,
}

impl Default for EventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConnectionEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: ConnectionEvent) {
        // Err only means there are no subscribers right now.
        let _ = self.tx.send(event);
    }
}
