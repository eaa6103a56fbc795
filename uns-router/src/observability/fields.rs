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

//! Canonical structured field values and value-format helpers.

use crate::event::Event;
use crate::namespace::NamespaceConfig;
use std::sync::Arc;

pub const NONE: &str = "none";
pub const REASON_EMPTY_PATH: &str = "empty_path";
pub const REASON_EMPTY_CONTENT: &str = "empty_content";
pub const REASON_MIDDLEWARE_DROP: &str = "middleware_drop";
pub const REASON_ROLLBACK_AFTER_START_FAILURE: &str = "rollback_after_start_failure";

const PAYLOAD_PREVIEW_MAX_CHARS: usize = 64;

/// Pre-rendered event fields, built only when the target log level is enabled.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormattedEventFields {
    pub path: String,
    pub namespace: String,
    pub source: String,
    pub content_type: String,
    pub payload: String,
}

impl FormattedEventFields {
    pub fn from_event(event: &Event) -> Self {
        Self {
            path: event.path.clone(),
            namespace: format_namespace(event.namespace.as_ref()),
            source: format_source(event.source_connection_id.as_deref()),
            content_type: format!("{:?}", event.content_type),
            payload: format_payload_preview(&event.content),
        }
    }
}

pub fn format_namespace(namespace: Option<&Arc<NamespaceConfig>>) -> String {
    namespace
        .map(|namespace| namespace.path.clone())
        .unwrap_or_else(|| NONE.to_string())
}

pub fn format_source(source_connection_id: Option<&str>) -> String {
    source_connection_id.unwrap_or(NONE).to_string()
}

/// Short, log-safe rendering of a payload: text when it is UTF-8, a byte count otherwise.
pub fn format_payload_preview(content: &[u8]) -> String {
    match std::str::from_utf8(content) {
        Ok(text) if text.chars().count() > PAYLOAD_PREVIEW_MAX_CHARS => {
            let preview: String = text.chars().take(PAYLOAD_PREVIEW_MAX_CHARS).collect();
            format!("{preview}...")
        }
        Ok(text) => text.to_string(),
        Err(_) => format!("<{} bytes>", content.len()),
    }
}
