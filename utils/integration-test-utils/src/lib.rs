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

mod failing_connection;
pub use failing_connection::{FailingConnection, FailureMode};
mod memory_connection;
pub use memory_connection::MemoryConnection;
mod recording_listener;
pub use recording_listener::RecordingListener;

/// Ordered `start:<id>` / `stop:<id>` entries shared between test connections.
pub type LifecycleJournal = Arc<Mutex<Vec<String>>>;

/// One-time `tracing` initialization; later calls are ignored.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
