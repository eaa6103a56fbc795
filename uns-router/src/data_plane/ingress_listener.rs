//! Listener the router registers on every inbound connection.

use crate::connection::{ConnectionStatus, EventListener};
use crate::event::Event;
use crate::observability::{events, fields};
use crate::router::RouterInner;
use async_trait::async_trait;
use std::sync::Weak;
use tracing::{debug, Level};

const COMPONENT: &str = "ingress_listener";

/// Forwards connection callbacks into the router.
///
/// Holds the router weakly so a connection outliving the router cannot keep it alive.
pub(crate) struct IngressListener {
    router: Weak<RouterInner>,
}

impl IngressListener {
    pub(crate) fn new(router: Weak<RouterInner>) -> Self {
        Self { router }
    }
}

#[async_trait]
impl EventListener for IngressListener {
    async fn on_event(&self, connection_id: &str, event: Event) {
        if tracing::enabled!(Level::DEBUG) {
            let formatted = fields::FormattedEventFields::from_event(&event);
            debug!(
                event = events::INGRESS_RECEIVE,
                component = COMPONENT,
                connection_id,
                path = formatted.path.as_str(),
                content_type = formatted.content_type.as_str(),
                payload = formatted.payload.as_str(),
                "received inbound event"
            );
        }

        let Some(router) = self.router.upgrade() else {
            debug!(
                event = events::INGRESS_ROUTER_GONE,
                component = COMPONENT,
                connection_id,
                "router dropped; discarding inbound event"
            );
            return;
        };

        router.dispatch_inbound(connection_id, event);
    }

    async fn on_status_changed(&self, connection_id: &str, status: ConnectionStatus) {
        if let Some(router) = self.router.upgrade() {
            router.record_connection_status(connection_id, status);
        }
    }
}
