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

//! # uns-router
//!
//! `uns-router` is an in-process Unified Namespace publish/subscribe router for industrial
//! event data. Transports (MQTT, Sparkplug B, ...) plug in as connections; the router owns
//! namespace resolution, wildcard pattern matching, the middleware pipeline and typed
//! consumers.
//!
//! ## Quick start
//!
//! ```
//! use std::sync::Arc;
//! use uns_router::{NamespaceConfig, UnsRouter};
//!
//! # pub mod loopback {
//! #     use std::sync::Arc;
//! #     use async_trait::async_trait;
//! #     use parking_lot::Mutex;
//! #     use uns_router::{Connection, ConnectionError, Event, EventListener};
//! #     use uns_router::{InboundConnection, OutboundConnection};
//! #
//! #     #[derive(Default)]
//! #     pub struct Loopback {
//! #         listeners: Mutex<Vec<Arc<dyn EventListener>>>,
//! #     }
//! #
//! #     #[async_trait]
//! #     impl Connection for Loopback {
//! #         fn id(&self) -> &str { "loopback" }
//! #         async fn start(&self) -> Result<(), ConnectionError> { Ok(()) }
//! #         async fn stop(&self) -> Result<(), ConnectionError> { Ok(()) }
//! #     }
//! #
//! #     #[async_trait]
//! #     impl InboundConnection for Loopback {
//! #         async fn register_listener(
//! #             &self,
//! #             listener: Arc<dyn EventListener>,
//! #         ) -> Result<(), ConnectionError> {
//! #             self.listeners.lock().push(listener);
//! #             Ok(())
//! #         }
//! #         async fn unregister_listener(
//! #             &self,
//! #             listener: Arc<dyn EventListener>,
//! #         ) -> Result<(), ConnectionError> {
//! #             self.listeners.lock().retain(|l| !Arc::ptr_eq(l, &listener));
//! #             Ok(())
//! #         }
//! #     }
//! #
//! #     #[async_trait]
//! #     impl OutboundConnection for Loopback {
//! #         async fn publish(&self, event: Event) -> Result<(), ConnectionError> {
//! #             let listeners = self.listeners.lock().clone();
//! #             for listener in listeners {
//! #                 listener.on_event("loopback", event.clone()).await;
//! #             }
//! #             Ok(())
//! #         }
//! #     }
//! # }
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let router = UnsRouter::new("quick-start");
//! router.register_namespace(NamespaceConfig::new("Plant1/ERP"));
//! router
//!     .add_connection(Arc::new(loopback::Loopback::default()))
//!     .await
//!     .unwrap();
//!
//! let everything = router.subscribe("#");
//! router.start().await.unwrap();
//!
//! // The loopback connection feeds published events straight back in.
//! let accepted = router.publish_scalar("Plant1/ERP/Status", "OK", None).await;
//!
//! assert_eq!(accepted, 1);
//! assert_eq!(everything.delivered_count(), 1);
//! router.stop().await.unwrap();
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - API facade: [`UnsRouter`]
//! - Control plane: connection tables, identity keys and lifecycle state
//! - Routing: path algebra, namespace registry, cached pattern matching, consumer directory
//! - Middleware: ordered stages with time deadband, value deadband and report-by-exception
//! - Data plane: ingress listener, inbound dispatch and egress publish
//!
//! ## Observability model
//!
//! The crate uses `tracing` for logs/events. Library code emits events and does not
//! initialize a global subscriber. Binaries and tests are responsible for one-time
//! `tracing_subscriber` initialization at process boundaries.

mod config;
pub use config::{ConfigError, MiddlewareConfig, RouterConfig};

mod connection;
pub use connection::{
    Connection, ConnectionError, ConnectionErrorCode, ConnectionRole, ConnectionStatus,
    EventListener, InboundConnection, OutboundConnection,
};

mod consumer;
pub use consumer::decode::{self, DecodeFn, NamedVariants};
pub use consumer::{Consumer, ConsumerListener};

mod control_plane;
pub use control_plane::router_state::RouterState;

mod data_plane;

mod error;
pub use error::RouterError;

mod event;
pub use event::{ContentType, Event, ScalarContent};

pub mod middleware;
pub use middleware::{DeadbandPeriod, DeadbandValue, Middleware, ReportByException};

mod namespace;
pub use namespace::{NamespaceConfig, NamespaceKind, NamespaceType};

#[doc(hidden)]
pub mod observability;

mod routing;
pub use routing::path;

mod router;
pub use router::UnsRouter;
