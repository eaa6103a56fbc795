//! Path-scoped namespace storage with a permanent per-path resolution cache.

use crate::namespace::NamespaceConfig;
use crate::observability::events;
use crate::routing::path;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

const COMPONENT: &str = "namespace_registry";

#[derive(Default)]
struct NamespaceState {
    // Ordered by path so resolution can scan in descending order.
    namespaces: BTreeMap<String, Arc<NamespaceConfig>>,
    // Event path -> winning namespace path. Never invalidated by later registrations.
    resolution_cache: HashMap<String, String>,
}

/// Namespace registry keyed by path prefix.
///
/// Registry and cache share a single lock so every call is linearizable.
#[derive(Default)]
pub(crate) struct NamespaceRegistry {
    state: Mutex<NamespaceState>,
}

impl NamespaceRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the namespace stored under `config.path`.
    pub(crate) fn register(&self, config: NamespaceConfig) -> bool {
        if config.path.is_empty() {
            warn!(
                event = events::NAMESPACE_REGISTER_REJECTED,
                component = COMPONENT,
                reason = "empty_path",
                "ignoring namespace without a path"
            );
            return false;
        }

        let namespace_path = config.path.clone();
        let replaced = self
            .state
            .lock()
            .namespaces
            .insert(namespace_path.clone(), Arc::new(config))
            .is_some();

        debug!(
            event = events::NAMESPACE_REGISTER,
            component = COMPONENT,
            namespace = namespace_path.as_str(),
            replaced,
            "registered namespace"
        );
        true
    }

    /// Resolves the namespace owning `event_path`.
    ///
    /// Candidates are scanned in descending lexicographic order of their path and the first
    /// strict ancestor wins. The winner is cached for `event_path`; a miss is not cached.
    pub(crate) fn resolve(&self, event_path: &str) -> Option<Arc<NamespaceConfig>> {
        if event_path.is_empty() {
            return None;
        }

        let mut state = self.state.lock();

        if let Some(namespace_path) = state.resolution_cache.get(event_path) {
            return state.namespaces.get(namespace_path).cloned();
        }

        let winner = state
            .namespaces
            .iter()
            .rev()
            .find(|(namespace_path, _)| path::is_descendant_of(namespace_path, event_path))
            .map(|(_, config)| config.clone())?;

        state
            .resolution_cache
            .insert(event_path.to_string(), winner.path.clone());

        debug!(
            event = events::NAMESPACE_RESOLVED,
            component = COMPONENT,
            path = event_path,
            namespace = winner.path.as_str(),
            "cached namespace resolution"
        );
        Some(winner)
    }

    pub(crate) fn get(&self, namespace_path: &str) -> Option<Arc<NamespaceConfig>> {
        self.state.lock().namespaces.get(namespace_path).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.state.lock().namespaces.len()
    }

    /// Clears cached resolutions; registered namespaces are kept.
    pub(crate) fn reset_cache(&self) {
        self.state.lock().resolution_cache.clear();
    }
}
