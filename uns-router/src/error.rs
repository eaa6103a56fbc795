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

use crate::connection::ConnectionError;
use crate::control_plane::router_state::RouterState;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failures surfaced by router lifecycle and connection management.
///
/// Routing itself never fails: dropped or undeliverable events are logged, not returned.
#[derive(Debug)]
pub enum RouterError {
    /// The operation is not allowed from the current lifecycle state.
    InvalidState {
        operation: &'static str,
        state: RouterState,
    },
    /// A connection failed to start; every connection started before it was stopped again.
    ConnectionStart {
        connection_id: String,
        source: ConnectionError,
    },
    /// An inbound connection refused the router's listener.
    ListenerRegistration {
        connection_id: String,
        source: ConnectionError,
    },
}

impl Display for RouterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::InvalidState { operation, state } => {
                write!(f, "cannot {operation} while router is {state}")
            }
            RouterError::ConnectionStart { connection_id, .. } => {
                write!(f, "failed to start connection '{connection_id}'")
            }
            RouterError::ListenerRegistration { connection_id, .. } => {
                write!(
                    f,
                    "failed to register router listener on connection '{connection_id}'"
                )
            }
        }
    }
}

impl Error for RouterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RouterError::ConnectionStart { source, .. }
            | RouterError::ListenerRegistration { source, .. } => Some(source),
            RouterError::InvalidState { .. } => None,
        }
    }
}
