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

//! Ordered event-transform pipeline.
//!
//! Each stage receives an [`Event`] by value and either returns the (possibly rewritten) event
//! or `None` to drop it. The first `None` stops the fold and the event is suppressed entirely.
//!
//! ```
//! use uns_router::{ContentType, Event, Middleware, ReportByException, UnsRouter};
//!
//! struct UppercasePaths;
//!
//! impl Middleware for UppercasePaths {
//!     fn id(&self) -> &str {
//!         "UPPERCASE_PATHS"
//!     }
//!
//!     fn process(&self, mut event: Event) -> Option<Event> {
//!         event.path = event.path.to_uppercase();
//!         Some(event)
//!     }
//! }
//!
//! let router = UnsRouter::new("middleware-doc");
//! router.add_middleware(ReportByException::new());
//! router.add_middleware(UppercasePaths);
//!
//! assert_eq!(router.middleware_ids(), vec!["REPORT_BY_EXCEPTION", "UPPERCASE_PATHS"]);
//! ```

mod deadband_period;
mod deadband_value;
mod report_by_exception;

pub use deadband_period::{DeadbandPeriod, DEADBAND_PERIOD_ID};
pub use deadband_value::{DeadbandValue, DEADBAND_VALUE_ID};
pub use report_by_exception::{ReportByException, REPORT_BY_EXCEPTION_ID};

use crate::event::Event;
use crate::observability::events;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

const COMPONENT: &str = "middleware_pipeline";

/// A named, non-blocking `Event -> Event | drop` transform.
pub trait Middleware: Send + Sync {
    /// Unique key within a pipeline.
    fn id(&self) -> &str;

    fn process(&self, event: Event) -> Option<Event>;
}

/// Stages in registration order.
#[derive(Default)]
pub(crate) struct MiddlewarePipeline {
    stages: RwLock<Vec<Arc<dyn Middleware>>>,
}

impl MiddlewarePipeline {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a stage; a stage with an existing id is replaced where it stands.
    pub(crate) fn add(&self, stage: Arc<dyn Middleware>) {
        if stage.id().is_empty() {
            return;
        }

        let stage_id = stage.id().to_string();
        let mut stages = self.stages.write();

        match stages.iter().position(|existing| existing.id() == stage_id) {
            Some(index) => {
                stages[index] = stage;
                debug!(
                    event = events::MIDDLEWARE_REPLACE,
                    component = COMPONENT,
                    middleware_id = stage_id.as_str(),
                    position = index,
                    "replaced middleware stage"
                );
            }
            None => {
                stages.push(stage);
                debug!(
                    event = events::MIDDLEWARE_ADD,
                    component = COMPONENT,
                    middleware_id = stage_id.as_str(),
                    position = stages.len() - 1,
                    "added middleware stage"
                );
            }
        }
    }

    pub(crate) fn remove(&self, stage_id: &str) -> bool {
        let mut stages = self.stages.write();
        let before = stages.len();
        stages.retain(|stage| stage.id() != stage_id);
        let removed = stages.len() != before;

        if removed {
            debug!(
                event = events::MIDDLEWARE_REMOVE,
                component = COMPONENT,
                middleware_id = stage_id,
                "removed middleware stage"
            );
        }
        removed
    }

    pub(crate) fn ids(&self) -> Vec<String> {
        self.stages
            .read()
            .iter()
            .map(|stage| stage.id().to_string())
            .collect()
    }

    /// Folds `event` through every stage in order.
    pub(crate) fn run(&self, event: Event) -> Option<Event> {
        let stages = self.stages.read().clone();

        stages
            .iter()
            .try_fold(event, |event, stage| stage.process(event))
    }
}

#[cfg(test)]
mod tests {
    use super::{Middleware, MiddlewarePipeline};
    use crate::event::{ContentType, Event};
    use std::sync::Arc;

    struct Suffix(&'static str);

    impl Middleware for Suffix {
        fn id(&self) -> &str {
            self.0
        }

        fn process(&self, mut event: Event) -> Option<Event> {
            event.path = format!("{}/{}", event.path, self.0);
            Some(event)
        }
    }

    struct DropAll;

    impl Middleware for DropAll {
        fn id(&self) -> &str {
            "DROP_ALL"
        }

        fn process(&self, _event: Event) -> Option<Event> {
            None
        }
    }

    fn event() -> Event {
        Event::new("root", ContentType::String, "x")
    }

    #[test]
    fn empty_pipeline_passes_event_through() {
        let pipeline = MiddlewarePipeline::new();
        assert_eq!(pipeline.run(event()).unwrap().path, "root");
    }

    #[test]
    fn stages_run_in_registration_order() {
        let pipeline = MiddlewarePipeline::new();
        pipeline.add(Arc::new(Suffix("a")));
        pipeline.add(Arc::new(Suffix("b")));

        assert_eq!(pipeline.run(event()).unwrap().path, "root/a/b");
    }

    #[test]
    fn first_drop_halts_the_fold() {
        let pipeline = MiddlewarePipeline::new();
        pipeline.add(Arc::new(DropAll));
        pipeline.add(Arc::new(Suffix("never")));

        assert!(pipeline.run(event()).is_none());
    }

    #[test]
    fn re_adding_an_id_replaces_in_place() {
        let pipeline = MiddlewarePipeline::new();
        pipeline.add(Arc::new(Suffix("a")));
        pipeline.add(Arc::new(Suffix("b")));
        pipeline.add(Arc::new(Suffix("a")));

        assert_eq!(pipeline.ids(), vec!["a", "b"]);

        assert!(pipeline.remove("a"));
        assert!(!pipeline.remove("a"));
        assert_eq!(pipeline.ids(), vec!["b"]);
    }
}
