//! Structured logging vocabulary.
//!
//! Library code emits `tracing` events carrying an `event` name from [`events`] and a
//! `component` field naming the emitting module. No subscriber is installed here.

pub mod events;
pub mod fields;
