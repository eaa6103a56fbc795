//! Inbound and outbound connection tables keyed by connection id.

use crate::connection::{
    Connection, ConnectionStatus, EventListener, InboundConnection, OutboundConnection,
};
use crate::control_plane::connection_identity::ConnectionIdentityKey;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct InboundEntry {
    pub(crate) id: String,
    pub(crate) connection: Arc<dyn InboundConnection>,
    pub(crate) lifecycle: Arc<dyn Connection>,
    /// Listener the router registered on this connection; detached on replace or removal.
    pub(crate) listener: Arc<dyn EventListener>,
    sequence: u64,
}

impl InboundEntry {
    pub(crate) fn new<C>(connection: Arc<C>, listener: Arc<dyn EventListener>) -> Self
    where
        C: InboundConnection + 'static,
    {
        Self {
            id: connection.id().to_string(),
            lifecycle: connection.clone(),
            connection,
            listener,
            sequence: 0,
        }
    }
}

#[derive(Clone)]
pub(crate) struct OutboundEntry {
    pub(crate) id: String,
    pub(crate) connection: Arc<dyn OutboundConnection>,
    pub(crate) lifecycle: Arc<dyn Connection>,
    sequence: u64,
}

impl OutboundEntry {
    pub(crate) fn new<C>(connection: Arc<C>) -> Self
    where
        C: OutboundConnection + 'static,
    {
        Self {
            id: connection.id().to_string(),
            lifecycle: connection.clone(),
            connection,
            sequence: 0,
        }
    }
}

#[derive(Default)]
struct Tables {
    inbound: Vec<InboundEntry>,
    outbound: Vec<OutboundEntry>,
    next_sequence: u64,
}

impl Tables {
    fn next_sequence(&mut self) -> u64 {
        self.next_sequence += 1;
        self.next_sequence
    }
}

/// Connection storage owner. Locks are never held across an await point.
#[derive(Default)]
pub(crate) struct ConnectionTable {
    tables: RwLock<Tables>,
    statuses: Mutex<HashMap<String, ConnectionStatus>>,
}

impl ConnectionTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the inbound entry with the same id. Returns the replaced entry.
    pub(crate) fn insert_inbound(&self, mut entry: InboundEntry) -> Option<InboundEntry> {
        let mut tables = self.tables.write();
        entry.sequence = tables.next_sequence();
        let replaced = tables
            .inbound
            .iter()
            .position(|existing| existing.id == entry.id)
            .map(|index| tables.inbound.remove(index));
        tables.inbound.push(entry);
        replaced
    }

    /// Inserts or replaces the outbound entry with the same id. Returns the replaced entry.
    pub(crate) fn insert_outbound(&self, mut entry: OutboundEntry) -> Option<OutboundEntry> {
        let mut tables = self.tables.write();
        entry.sequence = tables.next_sequence();
        let replaced = tables
            .outbound
            .iter()
            .position(|existing| existing.id == entry.id)
            .map(|index| tables.outbound.remove(index));
        tables.outbound.push(entry);
        replaced
    }

    pub(crate) fn remove(&self, id: &str) -> (Option<InboundEntry>, Option<OutboundEntry>) {
        let mut tables = self.tables.write();
        let inbound = tables
            .inbound
            .iter()
            .position(|entry| entry.id == id)
            .map(|index| tables.inbound.remove(index));
        let outbound = tables
            .outbound
            .iter()
            .position(|entry| entry.id == id)
            .map(|index| tables.outbound.remove(index));
        drop(tables);

        if inbound.is_some() || outbound.is_some() {
            self.statuses.lock().remove(id);
        }
        (inbound, outbound)
    }

    pub(crate) fn inbound(&self, id: &str) -> Option<Arc<dyn InboundConnection>> {
        self.tables
            .read()
            .inbound
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.connection.clone())
    }

    pub(crate) fn outbound(&self, id: &str) -> Option<Arc<dyn OutboundConnection>> {
        self.tables
            .read()
            .outbound
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.connection.clone())
    }

    pub(crate) fn contains(&self, id: &str) -> (bool, bool) {
        let tables = self.tables.read();
        (
            tables.inbound.iter().any(|entry| entry.id == id),
            tables.outbound.iter().any(|entry| entry.id == id),
        )
    }

    /// Outbound connections in registration order.
    pub(crate) fn outbound_snapshot(&self) -> Vec<OutboundEntry> {
        self.tables.read().outbound.clone()
    }

    /// Every distinct connection instance, in registration order.
    ///
    /// An instance attached under both roles appears once, at its earliest registration.
    pub(crate) fn lifecycle_order(&self) -> Vec<Arc<dyn Connection>> {
        let tables = self.tables.read();
        let mut registered: Vec<(u64, &Arc<dyn Connection>)> = tables
            .inbound
            .iter()
            .map(|entry| (entry.sequence, &entry.lifecycle))
            .chain(
                tables
                    .outbound
                    .iter()
                    .map(|entry| (entry.sequence, &entry.lifecycle)),
            )
            .collect();
        registered.sort_by_key(|(sequence, _)| *sequence);

        let mut seen = HashSet::new();
        registered
            .into_iter()
            .filter(|(_, connection)| {
                seen.insert(ConnectionIdentityKey::new((*connection).clone()))
            })
            .map(|(_, connection)| connection.clone())
            .collect()
    }

    /// Stores the latest reported status. Returns the previous one.
    pub(crate) fn record_status(
        &self,
        id: &str,
        status: ConnectionStatus,
    ) -> Option<ConnectionStatus> {
        self.statuses.lock().insert(id.to_string(), status)
    }

    pub(crate) fn status(&self, id: &str) -> Option<ConnectionStatus> {
        self.statuses.lock().get(id).copied()
    }
}
