//! Canonical structured event names used across `uns-router`.

// Router lifecycle events.
pub const ROUTER_CREATED: &str = "router_created";
pub const ROUTER_STATE_CHANGED: &str = "router_state_changed";
pub const ROUTER_TRANSITION_REJECTED: &str = "router_transition_rejected";
pub const CONNECTION_START_OK: &str = "connection_start_ok";
pub const CONNECTION_START_FAILED: &str = "connection_start_failed";
pub const CONNECTION_STOP_OK: &str = "connection_stop_ok";
pub const CONNECTION_STOP_FAILED: &str = "connection_stop_failed";
pub const CONNECTION_ROLLBACK_STOP: &str = "connection_rollback_stop";

// Connection table events.
pub const CONNECTION_ADD: &str = "connection_add";
pub const CONNECTION_REPLACE: &str = "connection_replace";
pub const CONNECTION_REMOVE: &str = "connection_remove";
pub const CONNECTION_STATUS_CHANGED: &str = "connection_status_changed";

// Ingress and dispatch events.
pub const INGRESS_RECEIVE: &str = "ingress_receive";
pub const INGRESS_DROP_INVALID: &str = "ingress_drop_invalid";
pub const INGRESS_DROP_MIDDLEWARE: &str = "ingress_drop_middleware";
pub const INGRESS_ROUTER_GONE: &str = "ingress_router_gone";
pub const DISPATCH_SUMMARY: &str = "dispatch_summary";

// Egress publish events.
pub const EGRESS_PUBLISH_OK: &str = "egress_publish_ok";
pub const EGRESS_PUBLISH_FAILED: &str = "egress_publish_failed";
pub const EGRESS_DROP_INVALID: &str = "egress_drop_invalid";
pub const EGRESS_DROP_MIDDLEWARE: &str = "egress_drop_middleware";
pub const EGRESS_UNKNOWN_TARGET: &str = "egress_unknown_target";
pub const EGRESS_ENCODE_FAILED: &str = "egress_encode_failed";

// Registry and cache events.
pub const NAMESPACE_REGISTER: &str = "namespace_register";
pub const NAMESPACE_REGISTER_REJECTED: &str = "namespace_register_rejected";
pub const NAMESPACE_RESOLVED: &str = "namespace_resolved";
pub const CACHE_RESET: &str = "cache_reset";
pub const MIDDLEWARE_ADD: &str = "middleware_add";
pub const MIDDLEWARE_REPLACE: &str = "middleware_replace";
pub const MIDDLEWARE_REMOVE: &str = "middleware_remove";
pub const CONSUMER_SUBSCRIBE: &str = "consumer_subscribe";
pub const CONSUMER_UNSUBSCRIBE: &str = "consumer_unsubscribe";
pub const CONSUMER_DECODE_SKIPPED: &str = "consumer_decode_skipped";

// Configuration events.
pub const CONFIG_LOADED: &str = "config_loaded";
