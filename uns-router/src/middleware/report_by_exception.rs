//! Report-by-exception: forwards a payload only when it changed.

use crate::event::Event;
use crate::middleware::Middleware;
use bytes::Bytes;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

pub const REPORT_BY_EXCEPTION_ID: &str = "REPORT_BY_EXCEPTION";

/// Suppresses an event whose payload is byte-for-byte equal to the last payload forwarded
/// for the same path.
#[derive(Default)]
pub struct ReportByException {
    last_forwarded: DashMap<String, Bytes>,
}

impl ReportByException {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Middleware for ReportByException {
    fn id(&self) -> &str {
        REPORT_BY_EXCEPTION_ID
    }

    fn process(&self, event: Event) -> Option<Event> {
        match self.last_forwarded.entry(event.path.clone()) {
            Entry::Vacant(vacant) => {
                vacant.insert(event.content.clone());
                Some(event)
            }
            Entry::Occupied(mut occupied) => {
                if *occupied.get() == event.content {
                    None
                } else {
                    occupied.insert(event.content.clone());
                    Some(event)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ReportByException;
    use crate::event::{ContentType, Event};
    use crate::middleware::Middleware;

    fn payload(path: &str, content: &'static str) -> Event {
        Event::new(path, ContentType::String, content)
    }

    #[test]
    fn identical_consecutive_payload_is_suppressed() {
        let stage = ReportByException::new();

        assert!(stage.process(payload("Line/State", "Running")).is_some());
        assert!(stage.process(payload("Line/State", "Running")).is_none());
    }

    #[test]
    fn differing_payload_is_always_forwarded() {
        let stage = ReportByException::new();

        assert!(stage.process(payload("Line/State", "Running")).is_some());
        assert!(stage.process(payload("Line/State", "Idle")).is_some());
        assert!(stage.process(payload("Line/State", "Running")).is_some());
    }

    #[test]
    fn first_occurrence_is_per_path() {
        let stage = ReportByException::new();

        assert!(stage.process(payload("Line1/State", "Running")).is_some());
        assert!(stage.process(payload("Line2/State", "Running")).is_some());
    }
}
