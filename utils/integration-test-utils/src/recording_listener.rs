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

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;
use uns_router::ConsumerListener;

/// Consumer listener that keeps every value it receives.
///
/// Clones share the same store, so one clone can be attached to a consumer and another kept
/// by the test for assertions.
#[derive(Clone)]
pub struct RecordingListener<T> {
    received: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone> RecordingListener<T> {
    pub fn new() -> Self {
        Self {
            received: Arc::new(Mutex::new(Vec::with_capacity(64))),
        }
    }

    pub fn received(&self) -> Vec<T> {
        self.received.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.received.lock().len()
    }
}

impl<T: Clone> Default for RecordingListener<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ConsumerListener<T> for RecordingListener<T>
where
    T: Clone + Send + Sync,
{
    fn on_receive(&self, value: &T) {
        debug!("recording listener received value");
        self.received.lock().push(value.clone());
    }
}
