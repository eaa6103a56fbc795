//! Router lifecycle state and its watch channel.

use crate::observability::events;
use std::fmt::{Display, Formatter};
use tokio::sync::watch;
use tracing::{debug, info};

const COMPONENT: &str = "router_state";

/// `Stopped -> Starting -> Running -> Stopping -> Stopped`; `Stopped` may be re-entered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RouterState {
    #[default]
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl RouterState {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            RouterState::Stopped => "stopped",
            RouterState::Starting => "starting",
            RouterState::Running => "running",
            RouterState::Stopping => "stopping",
        }
    }
}

impl Display for RouterState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns the current state. Every change is broadcast to [`watch::Receiver`]s.
pub(crate) struct StateMachine {
    router_id: String,
    sender: watch::Sender<RouterState>,
}

impl StateMachine {
    pub(crate) fn new(router_id: &str) -> Self {
        let (sender, _) = watch::channel(RouterState::Stopped);
        Self {
            router_id: router_id.to_string(),
            sender,
        }
    }

    pub(crate) fn current(&self) -> RouterState {
        *self.sender.borrow()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<RouterState> {
        self.sender.subscribe()
    }

    /// Moves to `to` only when the current state is `from`.
    ///
    /// On rejection the observed state is returned.
    pub(crate) fn transition(&self, from: RouterState, to: RouterState) -> Result<(), RouterState> {
        let mut observed = from;
        let changed = self.sender.send_if_modified(|state| {
            observed = *state;
            if *state != from {
                return false;
            }
            *state = to;
            true
        });

        if !changed {
            debug!(
                event = events::ROUTER_TRANSITION_REJECTED,
                component = COMPONENT,
                router_id = self.router_id.as_str(),
                from = from.as_str(),
                to = to.as_str(),
                observed = observed.as_str(),
                "rejected router state transition"
            );
            return Err(observed);
        }

        info!(
            event = events::ROUTER_STATE_CHANGED,
            component = COMPONENT,
            router_id = self.router_id.as_str(),
            from = from.as_str(),
            to = to.as_str(),
            "router state changed"
        );
        Ok(())
    }
}
