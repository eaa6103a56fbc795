//! Time deadband: forwards at most one event per path per minimum period.

use crate::event::Event;
use crate::middleware::Middleware;
use crate::routing::path;
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::time::Duration;

pub const DEADBAND_PERIOD_ID: &str = "DEADBAND_PERIOD";

/// Suppresses events arriving sooner than `min_period` after the last forwarded one for the
/// same path.
///
/// Timestamps come from the events themselves, never from the wall clock.
pub struct DeadbandPeriod {
    min_period: TimeDelta,
    scope: Option<String>,
    last_forwarded: DashMap<String, DateTime<Utc>>,
}

impl DeadbandPeriod {
    pub fn new(min_period: Duration) -> Self {
        Self {
            min_period: TimeDelta::from_std(min_period).unwrap_or(TimeDelta::MAX),
            scope: None,
            last_forwarded: DashMap::new(),
        }
    }

    /// Restricts the deadband to paths matching `pattern`; other paths pass through.
    pub fn with_scope(mut self, pattern: &str) -> Self {
        self.scope = (!pattern.is_empty()).then(|| pattern.to_string());
        self
    }

    fn in_scope(&self, event_path: &str) -> bool {
        self.scope
            .as_deref()
            .map_or(true, |pattern| path::matches(pattern, event_path))
    }
}

impl Middleware for DeadbandPeriod {
    fn id(&self) -> &str {
        DEADBAND_PERIOD_ID
    }

    fn process(&self, event: Event) -> Option<Event> {
        if !self.in_scope(&event.path) {
            return Some(event);
        }

        // The entry guard serializes concurrent events for the same path.
        match self.last_forwarded.entry(event.path.clone()) {
            Entry::Vacant(vacant) => {
                vacant.insert(event.timestamp);
                Some(event)
            }
            Entry::Occupied(mut occupied) => {
                if event.timestamp.signed_duration_since(*occupied.get()) >= self.min_period {
                    occupied.insert(event.timestamp);
                    Some(event)
                } else {
                    None
                }
            }
        }
    }
}
