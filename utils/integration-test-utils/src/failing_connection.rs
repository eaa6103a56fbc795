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

use crate::LifecycleJournal;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use uns_router::{
    Connection, ConnectionError, ConnectionErrorCode, Event, EventListener, InboundConnection,
    OutboundConnection,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureMode {
    Start,
    RegisterListener,
    Publish,
}

/// Connection that fails at one chosen step and succeeds at every other.
pub struct FailingConnection {
    id: String,
    mode: FailureMode,
    journal: Option<LifecycleJournal>,
}

impl FailingConnection {
    pub fn new(id: &str, mode: FailureMode) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            mode,
            journal: None,
        })
    }

    pub fn with_journal(id: &str, mode: FailureMode, journal: &LifecycleJournal) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            mode,
            journal: Some(journal.clone()),
        })
    }

    fn fail(&self, step: &str) -> ConnectionError {
        debug!("{}: failing {step}", self.id);
        ConnectionError::fail_with_code(
            ConnectionErrorCode::Unavailable,
            format!("{} failing {step}", self.id),
        )
    }

    fn journal(&self, action: &str) {
        if let Some(journal) = self.journal.as_ref() {
            journal.lock().push(format!("{action}:{}", self.id));
        }
    }
}

#[async_trait]
impl Connection for FailingConnection {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &str {
        "failing"
    }

    async fn start(&self) -> Result<(), ConnectionError> {
        self.journal("start");
        if self.mode == FailureMode::Start {
            return Err(self.fail("start"));
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), ConnectionError> {
        self.journal("stop");
        Ok(())
    }
}

#[async_trait]
impl InboundConnection for FailingConnection {
    async fn register_listener(
        &self,
        _listener: Arc<dyn EventListener>,
    ) -> Result<(), ConnectionError> {
        if self.mode == FailureMode::RegisterListener {
            return Err(self.fail("register_listener"));
        }
        Ok(())
    }

    async fn unregister_listener(
        &self,
        _listener: Arc<dyn EventListener>,
    ) -> Result<(), ConnectionError> {
        Ok(())
    }
}

#[async_trait]
impl OutboundConnection for FailingConnection {
    async fn publish(&self, _event: Event) -> Result<(), ConnectionError> {
        if self.mode == FailureMode::Publish {
            return Err(self.fail("publish"));
        }
        Ok(())
    }
}
