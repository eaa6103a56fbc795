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

//! Capability interfaces implemented by transport connections.
//!
//! The router owns no network I/O. A transport plugs in by implementing [`Connection`] plus
//! [`InboundConnection`] (it feeds events in), [`OutboundConnection`] (it sends events out), or
//! both. Reconnect and retry loops belong to the connection.

use crate::event::Event;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Category of a connection failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionErrorCode {
    Unavailable,
    InvalidArgument,
    Unimplemented,
    Internal,
}

impl Display for ConnectionErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ConnectionErrorCode::Unavailable => "unavailable",
            ConnectionErrorCode::InvalidArgument => "invalid_argument",
            ConnectionErrorCode::Unimplemented => "unimplemented",
            ConnectionErrorCode::Internal => "internal",
        };
        f.write_str(label)
    }
}

/// Failure reported by a connection implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionError {
    code: ConnectionErrorCode,
    message: String,
}

impl ConnectionError {
    pub fn fail_with_code(code: ConnectionErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ConnectionErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ConnectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl Error for ConnectionError {}

/// Link state reported by a connection to its listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

/// Which side(s) of the router a connection was attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionRole {
    Inbound,
    Outbound,
    Both,
}

impl ConnectionRole {
    pub(crate) fn from_flags(inbound: bool, outbound: bool) -> Option<Self> {
        match (inbound, outbound) {
            (true, true) => Some(ConnectionRole::Both),
            (true, false) => Some(ConnectionRole::Inbound),
            (false, true) => Some(ConnectionRole::Outbound),
            (false, false) => None,
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            ConnectionRole::Inbound => "inbound",
            ConnectionRole::Outbound => "outbound",
            ConnectionRole::Both => "both",
        }
    }
}

/// Receives everything an inbound connection produces.
///
/// Delivery from a single connection is expected to be sequential, so one connection's event
/// order is preserved through the router.
#[async_trait]
pub trait EventListener: Send + Sync {
    async fn on_event(&self, connection_id: &str, event: Event);

    async fn on_status_changed(&self, _connection_id: &str, _status: ConnectionStatus) {}
}

/// Lifecycle shared by every connection.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Key used by the router's connection tables. Must be unique per role.
    fn id(&self) -> &str;

    /// Transport label, e.g. `mqtt` or `sparkplug_b`.
    fn kind(&self) -> &str {
        "custom"
    }

    /// Path patterns this connection serves.
    fn patterns(&self) -> Vec<String> {
        Vec::new()
    }

    async fn start(&self) -> Result<(), ConnectionError>;

    async fn stop(&self) -> Result<(), ConnectionError>;
}

/// A source of events.
#[async_trait]
pub trait InboundConnection: Connection {
    async fn register_listener(
        &self,
        listener: Arc<dyn EventListener>,
    ) -> Result<(), ConnectionError>;

    async fn unregister_listener(
        &self,
        listener: Arc<dyn EventListener>,
    ) -> Result<(), ConnectionError>;
}

/// A sink for events. Events arrive already stamped with their resolved namespace.
#[async_trait]
pub trait OutboundConnection: Connection {
    async fn publish(&self, event: Event) -> Result<(), ConnectionError>;
}
