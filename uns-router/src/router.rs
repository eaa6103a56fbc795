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

use crate::config::RouterConfig;
use crate::connection::{
    ConnectionRole, ConnectionStatus, EventListener, InboundConnection, OutboundConnection,
};
use crate::consumer::decode::{self, DecodeFn, NamedVariants};
use crate::consumer::{Consumer, Subscriber};
use crate::control_plane::connection_table::{ConnectionTable, InboundEntry, OutboundEntry};
use crate::control_plane::lifecycle::ConnectionLifecycle;
use crate::control_plane::router_state::{RouterState, StateMachine};
use crate::data_plane::egress_publish::EgressPublish;
use crate::data_plane::inbound_dispatch::InboundDispatch;
use crate::data_plane::ingress_listener::IngressListener;
use crate::error::RouterError;
use crate::event::{ContentType, Event, ScalarContent};
use crate::middleware::{Middleware, MiddlewarePipeline};
use crate::namespace::NamespaceConfig;
use crate::observability::events;
use crate::routing::consumer_directory::ConsumerDirectory;
use crate::routing::namespace_registry::NamespaceRegistry;
use crate::routing::pattern_cache::PatternMatcher;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::str::FromStr;
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tracing::{debug, info, warn};

const COMPONENT: &str = "router";

/// State shared between the router handle and the listeners it registers on connections.
pub(crate) struct RouterInner {
    id: String,
    state: StateMachine,
    connections: ConnectionTable,
    namespaces: NamespaceRegistry,
    matcher: PatternMatcher,
    middleware: MiddlewarePipeline,
    consumers: ConsumerDirectory,
}

impl RouterInner {
    pub(crate) fn dispatch_inbound(&self, connection_id: &str, event: Event) -> usize {
        InboundDispatch {
            namespaces: &self.namespaces,
            middleware: &self.middleware,
            matcher: &self.matcher,
            consumers: &self.consumers,
        }
        .dispatch(connection_id, event)
    }

    pub(crate) fn record_connection_status(&self, connection_id: &str, status: ConnectionStatus) {
        let previous = self.connections.record_status(connection_id, status);
        if previous == Some(status) {
            return;
        }

        info!(
            event = events::CONNECTION_STATUS_CHANGED,
            component = COMPONENT,
            router_id = self.id.as_str(),
            connection_id,
            status = ?status,
            previous = ?previous,
            "connection status changed"
        );
    }
}

/// In-process Unified Namespace router.
///
/// Inbound connections feed events through namespace resolution and the middleware pipeline to
/// every consumer whose pattern matches. [`publish`](Self::publish) sends events the other way,
/// to outbound connections. The handle is cheap to clone; all clones drive the same router.
///
/// ```
/// use uns_router::{ContentType, Event, NamespaceConfig, UnsRouter};
///
/// let router = UnsRouter::new("quick-start");
/// router.register_namespace(NamespaceConfig::new("Plant1/ERP"));
///
/// let status = router.subscribe_scalar::<String>("Plant1/ERP/#");
/// status.add_listener(|value: &String| println!("ERP status: {value}"));
///
/// let delivered = router.on_inbound_event(
///     "erp-gateway",
///     Event::new("Plant1/ERP/Status", ContentType::String, "OK"),
/// );
/// assert_eq!(delivered, 1);
/// ```
#[derive(Clone)]
pub struct UnsRouter {
    inner: Arc<RouterInner>,
}

impl UnsRouter {
    pub fn new(id: &str) -> Self {
        let inner = RouterInner {
            id: id.to_string(),
            state: StateMachine::new(id),
            connections: ConnectionTable::new(),
            namespaces: NamespaceRegistry::new(),
            matcher: PatternMatcher::new(),
            middleware: MiddlewarePipeline::new(),
            consumers: ConsumerDirectory::new(),
        };

        debug!(
            event = events::ROUTER_CREATED,
            component = COMPONENT,
            router_id = id,
            "created router"
        );

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Builds a router with the configured namespaces registered and stages added in order.
    pub fn from_config(config: &RouterConfig) -> Self {
        let router = Self::new(&config.name);

        for namespace in &config.namespaces {
            router.register_namespace(namespace.clone());
        }
        for stage in &config.middleware {
            router.inner.middleware.add(stage.build());
        }

        info!(
            event = events::CONFIG_LOADED,
            component = COMPONENT,
            router_id = config.name.as_str(),
            namespaces = config.namespaces.len(),
            middleware = config.middleware.len(),
            "applied router config"
        );
        router
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn state(&self) -> RouterState {
        self.inner.state.current()
    }

    /// Receiver notified of every lifecycle transition.
    pub fn watch_state(&self) -> watch::Receiver<RouterState> {
        self.inner.state.subscribe()
    }

    /// Starts every attached connection exactly once, even when attached under both roles.
    ///
    /// Allowed only from [`RouterState::Stopped`]. If any connection fails to start, the ones
    /// already started are stopped again, the router returns to `Stopped` and the failure is
    /// returned.
    pub async fn start(&self) -> Result<(), RouterError> {
        self.inner
            .state
            .transition(RouterState::Stopped, RouterState::Starting)
            .map_err(|state| RouterError::InvalidState {
                operation: "start",
                state,
            })?;

        let connections = self.inner.connections.lifecycle_order();
        let result = ConnectionLifecycle::new(&self.inner.id, &connections)
            .start_all()
            .await;

        let next = if result.is_ok() {
            RouterState::Running
        } else {
            RouterState::Stopped
        };
        // Only this call may leave Starting, so the transition cannot be rejected.
        let _ = self.inner.state.transition(RouterState::Starting, next);

        result
    }

    /// Stops every attached connection in registration order.
    ///
    /// Stopping a stopped router is a no-op. Stop failures are logged and do not prevent the
    /// router from reaching `Stopped`.
    pub async fn stop(&self) -> Result<(), RouterError> {
        if let Err(state) = self
            .inner
            .state
            .transition(RouterState::Running, RouterState::Stopping)
        {
            return match state {
                RouterState::Stopped => Ok(()),
                state => Err(RouterError::InvalidState {
                    operation: "stop",
                    state,
                }),
            };
        }

        let connections = self.inner.connections.lifecycle_order();
        ConnectionLifecycle::new(&self.inner.id, &connections)
            .stop_all()
            .await;

        let _ = self
            .inner
            .state
            .transition(RouterState::Stopping, RouterState::Stopped);
        Ok(())
    }

    /// Attaches an event source.
    ///
    /// The router registers its listener on the connection. An inbound connection already
    /// attached under the same id is replaced and its listener detached. Connections attached
    /// while running are started by the next [`start`](Self::start).
    pub async fn add_inbound_connection<C>(&self, connection: Arc<C>) -> Result<(), RouterError>
    where
        C: InboundConnection + 'static,
    {
        let listener: Arc<dyn EventListener> =
            Arc::new(IngressListener::new(Arc::downgrade(&self.inner)));

        connection
            .register_listener(listener.clone())
            .await
            .map_err(|source| RouterError::ListenerRegistration {
                connection_id: connection.id().to_string(),
                source,
            })?;

        let entry = InboundEntry::new(connection, listener);
        let connection_id = entry.id.clone();
        let replaced = self.inner.connections.insert_inbound(entry);
        self.log_attach(&connection_id, ConnectionRole::Inbound, replaced.is_some());

        if let Some(replaced) = replaced {
            self.detach_listener(&replaced).await;
        }
        Ok(())
    }

    /// Attaches an event sink. A sink already attached under the same id is replaced.
    pub fn add_outbound_connection<C>(&self, connection: Arc<C>)
    where
        C: OutboundConnection + 'static,
    {
        let entry = OutboundEntry::new(connection);
        let connection_id = entry.id.clone();
        let replaced = self.inner.connections.insert_outbound(entry);
        self.log_attach(&connection_id, ConnectionRole::Outbound, replaced.is_some());
    }

    /// Attaches a connection under both roles. It is still started and stopped once.
    pub async fn add_connection<C>(&self, connection: Arc<C>) -> Result<(), RouterError>
    where
        C: InboundConnection + OutboundConnection + 'static,
    {
        self.add_inbound_connection(connection.clone()).await?;
        self.add_outbound_connection(connection);
        Ok(())
    }

    /// Detaches the connection with `id` from every role. Returns the roles it held.
    ///
    /// The connection is not stopped; it is no longer part of the router's lifecycle.
    pub async fn remove_connection(&self, id: &str) -> Option<ConnectionRole> {
        let (inbound, outbound) = self.inner.connections.remove(id);
        let role = ConnectionRole::from_flags(inbound.is_some(), outbound.is_some())?;

        if let Some(inbound) = inbound.as_ref() {
            self.detach_listener(inbound).await;
        }

        info!(
            event = events::CONNECTION_REMOVE,
            component = COMPONENT,
            router_id = self.inner.id.as_str(),
            connection_id = id,
            role = role.as_str(),
            "removed connection"
        );
        Some(role)
    }

    pub fn inbound_connection(&self, id: &str) -> Option<Arc<dyn InboundConnection>> {
        self.inner.connections.inbound(id)
    }

    pub fn outbound_connection(&self, id: &str) -> Option<Arc<dyn OutboundConnection>> {
        self.inner.connections.outbound(id)
    }

    pub fn connection_role(&self, id: &str) -> Option<ConnectionRole> {
        let (inbound, outbound) = self.inner.connections.contains(id);
        ConnectionRole::from_flags(inbound, outbound)
    }

    /// Last status reported by the connection, if any.
    pub fn connection_status(&self, id: &str) -> Option<ConnectionStatus> {
        self.inner.connections.status(id)
    }

    fn log_attach(&self, connection_id: &str, role: ConnectionRole, replaced: bool) {
        let event = if replaced {
            events::CONNECTION_REPLACE
        } else {
            events::CONNECTION_ADD
        };
        info!(
            event,
            component = COMPONENT,
            router_id = self.inner.id.as_str(),
            connection_id,
            role = role.as_str(),
            "attached connection"
        );
    }

    async fn detach_listener(&self, entry: &InboundEntry) {
        if let Err(err) = entry
            .connection
            .unregister_listener(entry.listener.clone())
            .await
        {
            warn!(
                event = events::CONNECTION_REMOVE,
                component = COMPONENT,
                router_id = self.inner.id.as_str(),
                connection_id = entry.id.as_str(),
                err = %err,
                "failed to detach router listener"
            );
        }
    }

    /// Registers or replaces the namespace stored under `config.path`.
    ///
    /// Returns `false` when the path is empty. Paths already resolved keep their cached
    /// namespace until [`reset_caches`](Self::reset_caches).
    pub fn register_namespace(&self, config: NamespaceConfig) -> bool {
        self.inner.namespaces.register(config)
    }

    pub fn resolve_namespace(&self, path: &str) -> Option<Arc<NamespaceConfig>> {
        self.inner.namespaces.resolve(path)
    }

    /// The namespace registered exactly at `path`, without ancestor resolution.
    pub fn namespace(&self, path: &str) -> Option<Arc<NamespaceConfig>> {
        self.inner.namespaces.get(path)
    }

    pub fn namespace_count(&self) -> usize {
        self.inner.namespaces.len()
    }

    /// Cached pattern test, as used for consumer dispatch.
    pub fn pattern_matches(&self, pattern: &str, path: &str) -> bool {
        self.inner.matcher.test(pattern, path)
    }

    /// Appends a stage to the pipeline. A stage with the same id is replaced in place.
    pub fn add_middleware<M>(&self, stage: M)
    where
        M: Middleware + 'static,
    {
        self.inner.middleware.add(Arc::new(stage));
    }

    pub fn remove_middleware(&self, id: &str) -> bool {
        self.inner.middleware.remove(id)
    }

    pub fn middleware_ids(&self) -> Vec<String> {
        self.inner.middleware.ids()
    }

    /// Subscribes with a custom decoder.
    ///
    /// The router holds the consumer weakly: the subscription lasts as long as the returned
    /// handle (or until [`unsubscribe`](Self::unsubscribe)).
    pub fn subscribe_with<T>(&self, pattern: &str, decode: DecodeFn<T>) -> Arc<Consumer<T>>
    where
        T: 'static,
    {
        let consumer = Arc::new(Consumer::new(pattern, decode));
        let subscriber: Weak<dyn Subscriber> = Arc::downgrade(&consumer) as Weak<dyn Subscriber>;
        self.inner
            .consumers
            .register(subscriber, consumer.id(), consumer.pattern());
        consumer
    }

    /// Delivers matching events unchanged.
    pub fn subscribe(&self, pattern: &str) -> Arc<Consumer<Event>> {
        self.subscribe_with(pattern, decode::event())
    }

    /// Delivers the payload parsed with [`FromStr`]; unparsable payloads are skipped.
    pub fn subscribe_scalar<T>(&self, pattern: &str) -> Arc<Consumer<T>>
    where
        T: FromStr + 'static,
    {
        self.subscribe_with(pattern, decode::scalar::<T>())
    }

    /// Delivers the variant whose name matches the payload, ignoring case.
    pub fn subscribe_enum<T>(&self, pattern: &str) -> Arc<Consumer<T>>
    where
        T: NamedVariants,
    {
        self.subscribe_with(pattern, decode::named::<T>())
    }

    pub fn subscribe_json<T>(&self, pattern: &str) -> Arc<Consumer<T>>
    where
        T: DeserializeOwned + 'static,
    {
        self.subscribe_with(pattern, decode::json::<T>())
    }

    /// Ends a subscription by consumer id. Returns `false` when it was not registered.
    pub fn unsubscribe(&self, consumer_id: &str) -> bool {
        self.inner.consumers.unregister(consumer_id)
    }

    pub fn consumer_count(&self) -> usize {
        self.inner.consumers.len()
    }

    /// Routes an event received from `connection_id` to the matching consumers.
    ///
    /// This is what the listener registered on inbound connections calls. Returns the number
    /// of consumers that received a decoded value.
    pub fn on_inbound_event(&self, connection_id: &str, event: Event) -> usize {
        self.inner.dispatch_inbound(connection_id, event)
    }

    /// Sends `event` to every outbound connection, or only to `target`.
    ///
    /// The middleware pipeline runs once per destination against shared per-path state, so a
    /// stateful stage treats only the first destination as the first occurrence of a path.
    /// Events with an empty path or payload, unknown targets and destinations that drop or
    /// reject the event are skipped. Returns the number of destinations that accepted it.
    pub async fn publish(&self, event: Event, target: Option<&str>) -> usize {
        EgressPublish {
            router_id: &self.inner.id,
            namespaces: &self.inner.namespaces,
            middleware: &self.inner.middleware,
            connections: &self.inner.connections,
        }
        .publish(event, target)
        .await
    }

    pub async fn publish_bytes(
        &self,
        path: &str,
        content_type: ContentType,
        content: impl Into<Bytes>,
        target: Option<&str>,
    ) -> usize {
        self.publish(Event::new(path, content_type, content), target)
            .await
    }

    /// Publishes `value` as UTF-8 text tagged with the content type of its Rust type.
    pub async fn publish_scalar<V>(&self, path: &str, value: V, target: Option<&str>) -> usize
    where
        V: ScalarContent,
    {
        self.publish_bytes(path, V::CONTENT_TYPE, value.to_string(), target)
            .await
    }

    /// Publishes `value` serialized as JSON.
    pub async fn publish_json<T>(&self, path: &str, value: &T, target: Option<&str>) -> usize
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_vec(value) {
            Ok(content) => {
                self.publish_bytes(path, ContentType::Json, content, target)
                    .await
            }
            Err(err) => {
                warn!(
                    event = events::EGRESS_ENCODE_FAILED,
                    component = COMPONENT,
                    router_id = self.inner.id.as_str(),
                    path,
                    err = %err,
                    "unable to encode JSON payload"
                );
                0
            }
        }
    }

    /// Clears the namespace resolution cache and the pattern match cache.
    pub fn reset_caches(&self) {
        self.inner.namespaces.reset_cache();
        self.inner.matcher.reset();

        info!(
            event = events::CACHE_RESET,
            component = COMPONENT,
            router_id = self.inner.id.as_str(),
            "cleared namespace and pattern caches"
        );
    }
}
