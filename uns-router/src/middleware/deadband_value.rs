//! Value deadband: forwards a numeric event only when it moved far enough.

use crate::event::Event;
use crate::middleware::Middleware;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

pub const DEADBAND_VALUE_ID: &str = "DEADBAND_VALUE";

/// Suppresses numeric events whose value differs from the last forwarded value for the same
/// path by less than `min_delta`. Payloads that do not parse as a finite number are dropped.
pub struct DeadbandValue {
    min_delta: f64,
    last_forwarded: DashMap<String, f64>,
}

impl DeadbandValue {
    pub fn new(min_delta: f64) -> Self {
        Self {
            min_delta,
            last_forwarded: DashMap::new(),
        }
    }

    fn parse_value(event: &Event) -> Option<f64> {
        event
            .text()?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
    }
}

impl Middleware for DeadbandValue {
    fn id(&self) -> &str {
        DEADBAND_VALUE_ID
    }

    fn process(&self, event: Event) -> Option<Event> {
        let value = Self::parse_value(&event)?;

        match self.last_forwarded.entry(event.path.clone()) {
            Entry::Vacant(vacant) => {
                vacant.insert(value);
                Some(event)
            }
            Entry::Occupied(mut occupied) => {
                if (value - *occupied.get()).abs() >= self.min_delta {
                    occupied.insert(value);
                    Some(event)
                } else {
                    None
                }
            }
        }
    }
}
