//! Outbound path: namespace resolution, then middleware and publish once per destination.

use crate::control_plane::connection_table::{ConnectionTable, OutboundEntry};
use crate::event::Event;
use crate::middleware::MiddlewarePipeline;
use crate::observability::{events, fields};
use crate::routing::namespace_registry::NamespaceRegistry;
use tracing::{debug, warn, Level};

const COMPONENT: &str = "egress_publish";

pub(crate) struct EgressPublish<'a> {
    pub(crate) router_id: &'a str,
    pub(crate) namespaces: &'a NamespaceRegistry,
    pub(crate) middleware: &'a MiddlewarePipeline,
    pub(crate) connections: &'a ConnectionTable,
}

impl EgressPublish<'_> {
    /// Publishes `event` to every outbound connection, or to `target` alone.
    ///
    /// The pipeline runs separately for each destination, so stateful stages see the first
    /// destination as the first occurrence of a path and later destinations as repeats.
    /// Returns the number of destinations that accepted the event.
    pub(crate) async fn publish(&self, mut event: Event, target: Option<&str>) -> usize {
        if !event.is_publishable() {
            let reason = if event.path.is_empty() {
                fields::REASON_EMPTY_PATH
            } else {
                fields::REASON_EMPTY_CONTENT
            };
            debug!(
                event = events::EGRESS_DROP_INVALID,
                component = COMPONENT,
                router_id = self.router_id,
                reason,
                "ignoring publish"
            );
            return 0;
        }

        event.namespace = self.namespaces.resolve(&event.path);

        let destinations = self.destinations(target);
        let formatted = tracing::enabled!(Level::DEBUG)
            .then(|| fields::FormattedEventFields::from_event(&event));
        let mut accepted = 0;

        for destination in destinations {
            let Some(processed) = self.middleware.run(event.clone()) else {
                if let Some(formatted) = formatted.as_ref() {
                    debug!(
                        event = events::EGRESS_DROP_MIDDLEWARE,
                        component = COMPONENT,
                        router_id = self.router_id,
                        connection_id = destination.id.as_str(),
                        path = formatted.path.as_str(),
                        reason = fields::REASON_MIDDLEWARE_DROP,
                        "publish suppressed by middleware for destination"
                    );
                }
                continue;
            };

            match destination.connection.publish(processed).await {
                Ok(()) => {
                    accepted += 1;
                    if let Some(formatted) = formatted.as_ref() {
                        debug!(
                            event = events::EGRESS_PUBLISH_OK,
                            component = COMPONENT,
                            router_id = self.router_id,
                            connection_id = destination.id.as_str(),
                            path = formatted.path.as_str(),
                            namespace = formatted.namespace.as_str(),
                            payload = formatted.payload.as_str(),
                            "published event"
                        );
                    }
                }
                Err(err) => {
                    warn!(
                        event = events::EGRESS_PUBLISH_FAILED,
                        component = COMPONENT,
                        router_id = self.router_id,
                        connection_id = destination.id.as_str(),
                        path = event.path.as_str(),
                        err = %err,
                        "outbound connection rejected event"
                    );
                }
            }
        }

        accepted
    }

    fn destinations(&self, target: Option<&str>) -> Vec<OutboundEntry> {
        let outbound = self.connections.outbound_snapshot();
        let Some(target) = target else {
            return outbound;
        };

        let selected: Vec<OutboundEntry> = outbound
            .into_iter()
            .filter(|entry| entry.id == target)
            .collect();

        if selected.is_empty() {
            warn!(
                event = events::EGRESS_UNKNOWN_TARGET,
                component = COMPONENT,
                router_id = self.router_id,
                connection_id = target,
                "no outbound connection with this id"
            );
        }
        selected
    }
}
