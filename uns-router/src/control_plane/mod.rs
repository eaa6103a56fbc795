//! Control-plane ownership: connection tables, identity keys and router lifecycle.

pub(crate) mod connection_identity;
pub(crate) mod connection_table;
pub(crate) mod lifecycle;
pub(crate) mod router_state;
