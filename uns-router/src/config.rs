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

//! Declarative router setup loaded from JSON5.
//!
//! ```json5
//! {
//!     name: "plant-router",
//!     namespaces: [
//!         { path: "Plant1/ERP", kind: "heterogeneous", type: "functional", content_type: "JSON" },
//!     ],
//!     middleware: [
//!         { type: "deadband_period", min_period_ms: 5000, pattern: "Plant1/#" },
//!         { type: "report_by_exception" },
//!     ],
//! }
//! ```

use crate::middleware::{DeadbandPeriod, DeadbandValue, Middleware, ReportByException};
use crate::namespace::NamespaceConfig;
use crate::observability::events;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const COMPONENT: &str = "config";

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    pub name: String,
    #[serde(default)]
    pub namespaces: Vec<NamespaceConfig>,
    /// Stages in pipeline order.
    #[serde(default)]
    pub middleware: Vec<MiddlewareConfig>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MiddlewareConfig {
    DeadbandPeriod {
        min_period_ms: u64,
        #[serde(default)]
        pattern: Option<String>,
    },
    DeadbandValue {
        min_delta: f64,
    },
    ReportByException,
}

impl MiddlewareConfig {
    pub(crate) fn build(&self) -> Arc<dyn Middleware> {
        match self {
            MiddlewareConfig::DeadbandPeriod {
                min_period_ms,
                pattern,
            } => {
                let stage = DeadbandPeriod::new(Duration::from_millis(*min_period_ms));
                match pattern.as_deref() {
                    Some(pattern) => Arc::new(stage.with_scope(pattern)),
                    None => Arc::new(stage),
                }
            }
            MiddlewareConfig::DeadbandValue { min_delta } => {
                Arc::new(DeadbandValue::new(*min_delta))
            }
            MiddlewareConfig::ReportByException => Arc::new(ReportByException::new()),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(json5::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, .. } => {
                write!(f, "unable to read router config '{}'", path.display())
            }
            ConfigError::Parse(err) => write!(f, "invalid router config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(err) => Some(err),
        }
    }
}

impl RouterConfig {
    pub fn from_json5_str(text: &str) -> Result<Self, ConfigError> {
        json5::from_str(text).map_err(ConfigError::Parse)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json5_str(&text)?;

        info!(
            event = events::CONFIG_LOADED,
            component = COMPONENT,
            config_path = %path.display(),
            router_id = config.name.as_str(),
            namespaces = config.namespaces.len(),
            middleware = config.middleware.len(),
            "loaded router config"
        );
        Ok(config)
    }
}
