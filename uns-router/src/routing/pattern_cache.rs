//! Memoized subscription-pattern matching.

use crate::routing::path;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

type MatchLookup = HashMap<String, HashSet<String>>;

#[derive(Default)]
struct MatchCache {
    // pattern -> paths known to match it
    confirmed_matches: MatchLookup,
    // path -> patterns known not to match it
    confirmed_no_matches: MatchLookup,
}

impl MatchCache {
    fn lookup(&self, pattern: &str, event_path: &str) -> Option<bool> {
        if self
            .confirmed_matches
            .get(pattern)
            .is_some_and(|paths| paths.contains(event_path))
        {
            return Some(true);
        }

        if self
            .confirmed_no_matches
            .get(event_path)
            .is_some_and(|patterns| patterns.contains(pattern))
        {
            return Some(false);
        }

        None
    }

    fn record(&mut self, pattern: &str, event_path: &str, matched: bool) {
        let (outer, inner) = if matched {
            (&mut self.confirmed_matches, (pattern, event_path))
        } else {
            (&mut self.confirmed_no_matches, (event_path, pattern))
        };

        outer
            .entry(inner.0.to_string())
            .or_default()
            .insert(inner.1.to_string());
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.confirmed_matches.values().map(HashSet::len).sum::<usize>()
            + self
                .confirmed_no_matches
                .values()
                .map(HashSet::len)
                .sum::<usize>()
    }
}

/// Pattern matcher backed by an append-only match/no-match cache.
///
/// The cache is unbounded and never evicted: the predicate is a pure function of two
/// immutable strings and the path/pattern space of a deployment is expected to stay small.
#[derive(Default)]
pub(crate) struct PatternMatcher {
    cache: Mutex<MatchCache>,
}

impl PatternMatcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn test(&self, pattern: &str, event_path: &str) -> bool {
        if pattern.is_empty() || event_path.is_empty() {
            return false;
        }

        let mut cache = self.cache.lock();
        if let Some(cached) = cache.lookup(pattern, event_path) {
            return cached;
        }

        let matched = path::matches(pattern, event_path);
        cache.record(pattern, event_path, matched);
        matched
    }

    /// Number of memoized (pattern, path) outcomes.
    #[cfg(test)]
    fn cached_entries(&self) -> usize {
        self.cache.lock().len()
    }

    pub(crate) fn reset(&self) {
        *self.cache.lock() = MatchCache::default();
    }
}
