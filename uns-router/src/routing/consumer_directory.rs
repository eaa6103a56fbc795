//! Consumer directory used by inbound dispatch.
//!
//! Subscriptions live in an immutable snapshot swapped atomically on every change, so a
//! dispatch in flight always iterates a consistent list no matter how many subscribe or
//! unsubscribe calls run concurrently.

use crate::consumer::Subscriber;
use crate::observability::events;
use arc_swap::ArcSwap;
use std::sync::{Arc, Weak};
use tracing::debug;

const COMPONENT: &str = "consumer_directory";

#[derive(Clone)]
struct ConsumerEntry {
    id: String,
    subscriber: Weak<dyn Subscriber>,
}

#[derive(Default)]
struct ConsumerSnapshot {
    version: u64,
    entries: Vec<ConsumerEntry>,
}

impl ConsumerSnapshot {
    fn next(&self, entries: Vec<ConsumerEntry>) -> Self {
        Self {
            version: self.version + 1,
            entries,
        }
    }
}

pub(crate) struct ConsumerDirectory {
    snapshot: ArcSwap<ConsumerSnapshot>,
}

impl ConsumerDirectory {
    pub(crate) fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(ConsumerSnapshot::default()),
        }
    }

    pub(crate) fn register(&self, subscriber: Weak<dyn Subscriber>, id: &str, pattern: &str) {
        let entry = ConsumerEntry {
            id: id.to_string(),
            subscriber,
        };

        self.snapshot.rcu(|current| {
            let mut entries = current.entries.clone();
            entries.retain(|existing| existing.id != entry.id);
            entries.push(entry.clone());
            current.next(entries)
        });

        debug!(
            event = events::CONSUMER_SUBSCRIBE,
            component = COMPONENT,
            consumer_id = id,
            pattern,
            "registered consumer"
        );
    }

    /// Removes a consumer by id. Returns `true` only when it was registered.
    pub(crate) fn unregister(&self, id: &str) -> bool {
        let mut removed = false;

        self.snapshot.rcu(|current| {
            let before = current.entries.len();
            let entries: Vec<ConsumerEntry> = current
                .entries
                .iter()
                .filter(|entry| entry.id != id)
                .cloned()
                .collect();
            removed = entries.len() != before;
            current.next(entries)
        });

        if removed {
            debug!(
                event = events::CONSUMER_UNSUBSCRIBE,
                component = COMPONENT,
                consumer_id = id,
                "unregistered consumer"
            );
        }
        removed
    }

    /// Returns the consumers still alive, in registration order.
    ///
    /// Entries whose handle has been dropped are pruned from the directory.
    pub(crate) fn live_subscribers(&self) -> Vec<Arc<dyn Subscriber>> {
        let snapshot = self.snapshot.load();
        let live: Vec<Arc<dyn Subscriber>> = snapshot
            .entries
            .iter()
            .filter_map(|entry| entry.subscriber.upgrade())
            .collect();

        if live.len() != snapshot.entries.len() {
            self.prune_dropped();
        }
        live
    }

    fn prune_dropped(&self) {
        self.snapshot.rcu(|current| {
            let entries: Vec<ConsumerEntry> = current
                .entries
                .iter()
                .filter(|entry| entry.subscriber.strong_count() > 0)
                .cloned()
                .collect();
            current.next(entries)
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot.load().entries.len()
    }

    #[cfg(test)]
    fn current_version(&self) -> u64 {
        self.snapshot.load().version
    }
}
