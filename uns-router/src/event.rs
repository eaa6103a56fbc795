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

use crate::namespace::NamespaceConfig;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Declared encoding of an [`Event`] payload.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    #[default]
    String,
    Byte,
    #[serde(rename = "INT_16")]
    Int16,
    #[serde(rename = "INT_32")]
    Int32,
    #[serde(rename = "INT_64")]
    Int64,
    Float,
    Double,
    Decimal,
    Json,
    JsonArray,
    SparkplugBMetric,
    SparkplugBDeviceBirth,
    SparkplugBDeviceData,
    SparkplugBDeviceDeath,
    SparkplugBNodeBirth,
    SparkplugBNodeData,
    SparkplugBNodeDeath,
}

/// Rust scalar types that publish as UTF-8 text with a known [`ContentType`].
pub trait ScalarContent: ToString {
    const CONTENT_TYPE: ContentType;
}

macro_rules! scalar_content {
    ($($ty:ty => $content_type:ident),* $(,)?) => {
        $(
            impl ScalarContent for $ty {
                const CONTENT_TYPE: ContentType = ContentType::$content_type;
            }
        )*
    };
}

scalar_content! {
    String => String,
    &str => String,
    bool => String,
    u8 => Byte,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float,
    f64 => Double,
}

///
/// A single item travelling through the router.
///
/// Middleware stages take an event by value and hand back a new one (or drop it); an event is
/// never shared mutably between stages.
///
/// # Examples
///
/// ```
/// use uns_router::{ContentType, Event};
///
/// let event = Event::new("Plant1/ERP/Status", ContentType::String, "OK");
///
/// assert_eq!(event.path, "Plant1/ERP/Status");
/// assert_eq!(event.text(), Some("OK"));
/// assert!(event.namespace.is_none());
/// ```
#[derive(Clone, Debug)]
pub struct Event {
    pub path: String,
    pub content_type: ContentType,
    pub content: Bytes,
    pub timestamp: DateTime<Utc>,
    pub source_connection_id: Option<String>,
    pub namespace: Option<Arc<NamespaceConfig>>,
}

impl Event {
    /// Creates an event stamped with the current time.
    pub fn new(path: &str, content_type: ContentType, content: impl Into<Bytes>) -> Self {
        Self::with_timestamp(path, content_type, content, Utc::now())
    }

    pub fn with_timestamp(
        path: &str,
        content_type: ContentType,
        content: impl Into<Bytes>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            path: path.to_string(),
            content_type,
            content: content.into(),
            timestamp,
            source_connection_id: None,
            namespace: None,
        }
    }

    /// Payload as UTF-8 text, if it is valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    pub(crate) fn is_routable(&self) -> bool {
        !self.path.is_empty()
    }

    pub(crate) fn is_publishable(&self) -> bool {
        self.is_routable() && !self.content.is_empty()
    }
}
