//! Payload decoders used by typed consumers.
//!
//! A decoder turns an [`Event`] into a consumer value or `None`. `None` suppresses delivery for
//! that one consumer and is never an error.

use crate::event::Event;
use serde::de::DeserializeOwned;
use std::str::FromStr;
use std::sync::Arc;

pub type DecodeFn<T> = Arc<dyn Fn(&Event) -> Option<T> + Send + Sync>;

/// Enumerations decodable from a variant name, compared case-insensitively.
///
/// ```
/// use uns_router::NamedVariants;
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum MachineState {
///     Idle,
///     Running,
/// }
///
/// impl NamedVariants for MachineState {
///     fn variants() -> &'static [(&'static str, Self)] {
///         &[("Idle", MachineState::Idle), ("Running", MachineState::Running)]
///     }
/// }
///
/// assert_eq!(MachineState::from_name("RUNNING"), Some(MachineState::Running));
/// ```
pub trait NamedVariants: Clone + Sized + 'static {
    fn variants() -> &'static [(&'static str, Self)];

    fn from_name(name: &str) -> Option<Self> {
        Self::variants()
            .iter()
            .find(|(variant_name, _)| variant_name.eq_ignore_ascii_case(name))
            .map(|(_, variant)| variant.clone())
    }
}

fn payload_text(event: &Event) -> Option<&str> {
    event.text().map(str::trim)
}

/// Passes the event through unchanged.
pub fn event() -> DecodeFn<Event> {
    Arc::new(|event: &Event| Some(event.clone()))
}

/// Parses the trimmed UTF-8 payload with [`FromStr`].
///
/// Covers numbers, `bool`, `String` and RFC 3339 timestamps (`chrono::DateTime<Utc>`).
pub fn scalar<T>() -> DecodeFn<T>
where
    T: FromStr + 'static,
{
    Arc::new(|event: &Event| payload_text(event)?.parse::<T>().ok())
}

/// Matches the trimmed UTF-8 payload against the variant names of `T`.
pub fn named<T>() -> DecodeFn<T>
where
    T: NamedVariants,
{
    Arc::new(|event: &Event| T::from_name(payload_text(event)?))
}

/// Deserializes the payload as JSON.
pub fn json<T>() -> DecodeFn<T>
where
    T: DeserializeOwned + 'static,
{
    Arc::new(|event: &Event| serde_json::from_slice::<T>(&event.content).ok())
}
