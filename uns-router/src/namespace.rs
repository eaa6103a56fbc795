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

use crate::event::ContentType;
use serde::{Deserialize, Serialize};

/// Structural shape of the data published under a namespace.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceKind {
    #[default]
    Homogeneous,
    Heterogeneous,
}

/// Semantic role of a namespace.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceType {
    #[default]
    Informational,
    Functional,
}

///
/// Metadata for a region of the path hierarchy, keyed by its path prefix.
///
/// # Examples
///
/// ```
/// use uns_router::{ContentType, NamespaceConfig, NamespaceKind, NamespaceType};
///
/// let erp = NamespaceConfig::new("Plant1/ERP")
///     .with_kind(NamespaceKind::Heterogeneous)
///     .with_type(NamespaceType::Functional)
///     .with_content_type(ContentType::Json);
///
/// assert_eq!(erp.path, "Plant1/ERP");
/// assert_eq!(erp.sender, None);
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceConfig {
    pub path: String,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub kind: NamespaceKind,
    #[serde(default, rename = "type")]
    pub namespace_type: NamespaceType,
    #[serde(default)]
    pub content_type: ContentType,
}

impl NamespaceConfig {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: NamespaceKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_type(mut self, namespace_type: NamespaceType) -> Self {
        self.namespace_type = namespace_type;
        self
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn with_sender(mut self, sender: &str) -> Self {
        self.sender = Some(sender.to_string());
        self
    }
}
