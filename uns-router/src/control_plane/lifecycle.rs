//! Connection start/stop orchestration for router lifecycle transitions.

use crate::connection::Connection;
use crate::error::RouterError;
use crate::observability::{events, fields};
use std::sync::Arc;
use tracing::{info, warn};

const COMPONENT: &str = "connection_lifecycle";

/// Drives the connections of one router through start and stop.
pub(crate) struct ConnectionLifecycle<'a> {
    router_id: &'a str,
    connections: &'a [Arc<dyn Connection>],
}

impl<'a> ConnectionLifecycle<'a> {
    pub(crate) fn new(router_id: &'a str, connections: &'a [Arc<dyn Connection>]) -> Self {
        Self {
            router_id,
            connections,
        }
    }

    /// Starts every connection once, in order.
    ///
    /// The first failure stops the connections already started, in reverse order, and is
    /// returned. The router performs no retry.
    pub(crate) async fn start_all(&self) -> Result<(), RouterError> {
        for (index, connection) in self.connections.iter().enumerate() {
            match connection.start().await {
                Ok(()) => {
                    info!(
                        event = events::CONNECTION_START_OK,
                        component = COMPONENT,
                        router_id = self.router_id,
                        connection_id = connection.id(),
                        connection_kind = connection.kind(),
                        patterns = ?connection.patterns(),
                        "started connection"
                    );
                }
                Err(err) => {
                    warn!(
                        event = events::CONNECTION_START_FAILED,
                        component = COMPONENT,
                        router_id = self.router_id,
                        connection_id = connection.id(),
                        connection_kind = connection.kind(),
                        err = %err,
                        "failed to start connection"
                    );

                    self.rollback(&self.connections[..index]).await;

                    return Err(RouterError::ConnectionStart {
                        connection_id: connection.id().to_string(),
                        source: err,
                    });
                }
            }
        }

        Ok(())
    }

    /// Stops every connection in order. Failures are logged and do not interrupt the sweep.
    ///
    /// Returns the number of connections that reported a failed stop.
    pub(crate) async fn stop_all(&self) -> usize {
        let mut failures = 0;

        for connection in self.connections {
            match connection.stop().await {
                Ok(()) => {
                    info!(
                        event = events::CONNECTION_STOP_OK,
                        component = COMPONENT,
                        router_id = self.router_id,
                        connection_id = connection.id(),
                        "stopped connection"
                    );
                }
                Err(err) => {
                    failures += 1;
                    warn!(
                        event = events::CONNECTION_STOP_FAILED,
                        component = COMPONENT,
                        router_id = self.router_id,
                        connection_id = connection.id(),
                        err = %err,
                        "failed to stop connection"
                    );
                }
            }
        }

        failures
    }

    async fn rollback(&self, started: &[Arc<dyn Connection>]) {
        for connection in started.iter().rev() {
            let result = connection.stop().await;
            warn!(
                event = events::CONNECTION_ROLLBACK_STOP,
                component = COMPONENT,
                router_id = self.router_id,
                connection_id = connection.id(),
                reason = fields::REASON_ROLLBACK_AFTER_START_FAILURE,
                stopped = result.is_ok(),
                "stopped connection during startup rollback"
            );
        }
    }
}
