//! Data-plane ownership: inbound listener and dispatch, outbound publish.

pub(crate) mod egress_publish;
pub(crate) mod inbound_dispatch;
pub(crate) mod ingress_listener;
