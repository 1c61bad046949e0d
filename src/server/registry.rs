//! Live connection bookkeeping.
//!
//! Connections sit in a generational arena. A [`ConnectionToken`] names a
//! slot and the generation it was issued for, so a token outliving its
//! connection is rejected instead of reaching whichever connection reuses
//! the slot. No admission limit is applied.
//!
//! Ownership is split: each connection's socket and buffers belong to the
//! `Connection` value driven by its own task, while the registry holds the
//! connection's record (identity, peer, phase). The registry is still the
//! only place a connection is retired; its task calls [`Registry::remove`]
//! once, after the last I/O on the socket has completed, and then drops the
//! socket.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::RegistryError;
use crate::server::events::{ConnectionEvent, EventSink};

pub type SharedRegistry = Arc<Mutex<Registry>>;

/// Process-unique, monotonically increasing; diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionToken {
    index: usize,
    generation: u64,
}

impl fmt::Display for ConnectionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Coarse lifecycle position, mirrored from the connection's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    Accepted,
    Reading,
    Responding { header_sent: bool },
    Closed,
    Errored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRecord {
    pub id: ConnectionId,
    pub peer: Option<SocketAddr>,
    pub phase: ConnectionPhase,
}

#[derive(Debug)]
struct Slot {
    generation: u64,
    record: Option<ConnectionRecord>,
}

#[derive(Debug)]
pub struct Registry {
    slots: Vec<Slot>,
    free: Vec<usize>,
    next_id: u64,
    live: usize,
    events: EventSink,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(EventSink::new())
    }
}

impl Registry {
    pub fn new(events: EventSink) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            next_id: 1,
            live: 0,
            events,
        }
    }

    pub fn shared(events: EventSink) -> SharedRegistry {
        Arc::new(Mutex::new(Self::new(events)))
    }

    /// Registers a freshly accepted connection.
    pub fn create(&mut self, peer: Option<SocketAddr>) -> (ConnectionToken, ConnectionId) {
        let id = ConnectionId(self.next_id);
        self.next_id += 1;

        let record = ConnectionRecord {
            id,
            peer,
            phase: ConnectionPhase::Accepted,
        };

        let index = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.generation += 1;
                slot.record = Some(record);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    record: Some(record),
                });
                self.slots.len() - 1
            }
        };
        self.live += 1;

        let token = ConnectionToken {
            index,
            generation: self.slots[index].generation,
        };
        tracing::trace!(%id, %token, "connection registered");
        self.events.emit(ConnectionEvent::Created { id, peer });
        (token, id)
    }

    pub fn get(&self, token: ConnectionToken) -> Result<&ConnectionRecord, RegistryError> {
        self.slots
            .get(token.index)
            .filter(|slot| slot.generation == token.generation)
            .and_then(|slot| slot.record.as_ref())
            .ok_or_else(|| RegistryError::StaleToken(token.to_string()))
    }

    pub fn contains(&self, token: ConnectionToken) -> bool {
        self.get(token).is_ok()
    }

    pub fn set_phase(
        &mut self,
        token: ConnectionToken,
        phase: ConnectionPhase,
    ) -> Result<(), RegistryError> {
        let record = self.record_mut(token)?;
        record.phase = phase;
        Ok(())
    }

    /// Drops the connection's record. A second removal with the same token
    /// fails with [`RegistryError::StaleToken`].
    pub fn remove(&mut self, token: ConnectionToken) -> Result<ConnectionRecord, RegistryError> {
        let record = self
            .slots
            .get_mut(token.index)
            .filter(|slot| slot.generation == token.generation)
            .and_then(|slot| slot.record.take())
            .ok_or_else(|| RegistryError::StaleToken(token.to_string()))?;

        self.free.push(token.index);
        self.live -= 1;
        tracing::trace!(id = %record.id, %token, "connection removed");
        self.events.emit(ConnectionEvent::Closed { id: record.id });
        Ok(record)
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Records of all live connections, in slot order.
    pub fn records(&self) -> impl Iterator<Item = &ConnectionRecord> {
        self.slots.iter().filter_map(|slot| slot.record.as_ref())
    }

    fn record_mut(&mut self, token: ConnectionToken) -> Result<&mut ConnectionRecord, RegistryError> {
        self.slots
            .get_mut(token.index)
            .filter(|slot| slot.generation == token.generation)
            .and_then(|slot| slot.record.as_mut())
            .ok_or_else(|| RegistryError::StaleToken(token.to_string()))
    }
}
