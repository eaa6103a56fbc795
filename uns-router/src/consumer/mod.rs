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

//! Typed subscriptions.
//!
//! A [`Consumer`] pairs a subscription pattern with a decoder. The router pushes every matching
//! event into it; the decoded value is handed synchronously to each attached
//! [`ConsumerListener`], in attachment order. There is no internal buffering, so a slow
//! listener delays the consumers dispatched after it for the same event.

pub mod decode;

use crate::event::Event;
use decode::DecodeFn;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Receives decoded values from a [`Consumer`].
///
/// Any `Fn(&T) + Send + Sync` closure is a listener.
pub trait ConsumerListener<T>: Send + Sync {
    fn on_receive(&self, value: &T);
}

impl<T, F> ConsumerListener<T> for F
where
    F: Fn(&T) + Send + Sync,
{
    fn on_receive(&self, value: &T) {
        self(value)
    }
}

/// Type-erased view of a consumer used by the router's directory.
pub(crate) trait Subscriber: Send + Sync {
    fn id(&self) -> &str;
    fn pattern(&self) -> &str;
    fn push(&self, event: &Event) -> bool;
}

/// A registered subscription.
///
/// The router only keeps a weak reference: dropping the last handle ends the subscription.
pub struct Consumer<T> {
    id: String,
    pattern: String,
    decode: DecodeFn<T>,
    listeners: RwLock<Vec<Arc<dyn ConsumerListener<T>>>>,
    delivered: AtomicU64,
}

impl<T: 'static> Consumer<T> {
    pub(crate) fn new(pattern: &str, decode: DecodeFn<T>) -> Self {
        Self {
            id: Uuid::new_v4().hyphenated().to_string(),
            pattern: pattern.to_string(),
            decode,
            listeners: RwLock::new(Vec::new()),
            delivered: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn add_listener<L>(&self, listener: L)
    where
        L: ConsumerListener<T> + 'static,
    {
        self.listeners.write().push(Arc::new(listener));
    }

    /// Number of events decoded and delivered so far.
    pub fn delivered_count(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Decodes `event` and notifies every listener.
    ///
    /// Returns `false` when the decoder produced no value; nothing is delivered in that case.
    pub fn push(&self, event: &Event) -> bool {
        let Some(value) = (self.decode)(event) else {
            return false;
        };

        let listeners = self.listeners.read().clone();
        for listener in &listeners {
            listener.on_receive(&value);
        }

        self.delivered.fetch_add(1, Ordering::Relaxed);
        true
    }
}

impl<T: 'static> Subscriber for Consumer<T> {
    fn id(&self) -> &str {
        Consumer::id(self)
    }

    fn pattern(&self) -> &str {
        Consumer::pattern(self)
    }

    fn push(&self, event: &Event) -> bool {
        Consumer::push(self, event)
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, Consumer};
    use crate::event::{ContentType, Event};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn push_notifies_listeners_in_order() {
        let consumer = Consumer::new("#", decode::scalar::<f64>());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = seen.clone();
        consumer.add_listener(move |value: &f64| first.lock().push(("first", *value)));
        let second = seen.clone();
        consumer.add_listener(move |value: &f64| second.lock().push(("second", *value)));

        assert!(consumer.push(&Event::new("a/b", ContentType::Double, "1.5")));

        assert_eq!(*seen.lock(), vec![("first", 1.5), ("second", 1.5)]);
        assert_eq!(consumer.delivered_count(), 1);
    }

    #[test]
    fn decode_failure_suppresses_delivery() {
        let consumer = Consumer::new("#", decode::scalar::<i64>());
        let seen = Arc::new(Mutex::new(0));
        let counter = seen.clone();
        consumer.add_listener(move |_: &i64| *counter.lock() += 1);

        assert!(!consumer.push(&Event::new("a/b", ContentType::String, "n/a")));
        assert_eq!(*seen.lock(), 0);
        assert_eq!(consumer.delivered_count(), 0);
    }

    #[test]
    fn consumers_get_distinct_ids() {
        let a = Consumer::new("#", decode::event());
        let b = Consumer::new("#", decode::event());

        assert_ne!(a.id(), b.id());
        assert_eq!(a.pattern(), "#");
    }
}
