/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use crate::LifecycleJournal;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;
use uns_router::{
    Connection, ConnectionError, ConnectionErrorCode, ConnectionStatus, Event, EventListener,
    InboundConnection, OutboundConnection,
};

/// In-memory loopback connection.
///
/// Everything published to it is recorded and, while started, delivered to its registered
/// listeners as if it had arrived from a broker.
pub struct MemoryConnection {
    id: String,
    patterns: Vec<String>,
    started: AtomicBool,
    start_calls: AtomicUsize,
    stop_calls: AtomicUsize,
    listeners: Mutex<Vec<Arc<dyn EventListener>>>,
    published: Mutex<Vec<Event>>,
    journal: Option<LifecycleJournal>,
}

impl MemoryConnection {
    pub fn new(id: &str) -> Arc<Self> {
        Arc::new(Self::build(id, None))
    }

    /// Records `start:<id>` / `stop:<id>` in a journal shared with other connections.
    pub fn with_journal(id: &str, journal: &LifecycleJournal) -> Arc<Self> {
        Arc::new(Self::build(id, Some(journal.clone())))
    }

    fn build(id: &str, journal: Option<LifecycleJournal>) -> Self {
        Self {
            id: id.to_string(),
            patterns: vec!["#".to_string()],
            started: AtomicBool::new(false),
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            listeners: Mutex::new(Vec::new()),
            published: Mutex::new(Vec::new()),
            journal,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Events accepted by [`OutboundConnection::publish`], in order.
    pub fn published(&self) -> Vec<Event> {
        self.published.lock().clone()
    }

    /// Delivers `event` to the listeners as if it arrived from the transport.
    pub async fn inject(&self, event: Event) {
        let listeners = self.listeners.lock().clone();
        for listener in listeners {
            listener.on_event(&self.id, event.clone()).await;
        }
    }

    /// Reports a link status change to the listeners.
    pub async fn report_status(&self, status: ConnectionStatus) {
        let listeners = self.listeners.lock().clone();
        for listener in listeners {
            listener.on_status_changed(&self.id, status).await;
        }
    }

    fn journal(&self, action: &str) {
        if let Some(journal) = self.journal.as_ref() {
            journal.lock().push(format!("{action}:{}", self.id));
        }
    }
}

#[async_trait]
impl Connection for MemoryConnection {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &str {
        "memory"
    }

    fn patterns(&self) -> Vec<String> {
        self.patterns.clone()
    }

    async fn start(&self) -> Result<(), ConnectionError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        self.journal("start");
        self.started.store(true, Ordering::SeqCst);
        self.report_status(ConnectionStatus::Connected).await;
        Ok(())
    }

    async fn stop(&self) -> Result<(), ConnectionError> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.journal("stop");
        self.started.store(false, Ordering::SeqCst);
        self.report_status(ConnectionStatus::Disconnected).await;
        Ok(())
    }
}

#[async_trait]
impl InboundConnection for MemoryConnection {
    async fn register_listener(
        &self,
        listener: Arc<dyn EventListener>,
    ) -> Result<(), ConnectionError> {
        debug!("{}: registering listener", self.id);
        self.listeners.lock().push(listener);
        Ok(())
    }

    async fn unregister_listener(
        &self,
        listener: Arc<dyn EventListener>,
    ) -> Result<(), ConnectionError> {
        debug!("{}: unregistering listener", self.id);
        self.listeners
            .lock()
            .retain(|registered| !Arc::ptr_eq(registered, &listener));
        Ok(())
    }
}

#[async_trait]
impl OutboundConnection for MemoryConnection {
    async fn publish(&self, event: Event) -> Result<(), ConnectionError> {
        if !self.is_started() {
            return Err(ConnectionError::fail_with_code(
                ConnectionErrorCode::Unavailable,
                format!("{} is not started", self.id),
            ));
        }

        self.published.lock().push(event.clone());
        self.inject(event).await;
        Ok(())
    }
}
