//! # Host Record Layer
//!
//! timefield never owns attribute storage. The host model implements
//! [`TimeRecord`] to expose three things per instance:
//!
//! - **Structured storage**: `read_time` / `write_time` for the canonical value
//!   (the only part the host persists)
//! - **Field state**: the [`FieldStates`] map caching raw text and invalid flags
//! - **Named preparsers**: optional `fn(&Self, &str) -> String` methods looked
//!   up by name when a field is configured with [`Preparser::Method`]
//!
//! ## Implementations
//!
//! - [`memory::MemoryRecord`]: map-backed record for tests and simple callers
//!
//! [`Preparser::Method`]: crate::config::Preparser::Method

use crate::model::{FieldStates, Timestamp};

pub mod memory;

/// A text transform bound to the host type, addressable by name.
pub type MethodPreparser<M> = fn(&M, &str) -> String;

/// Storage and state seams a model must provide to carry time fields.
pub trait TimeRecord {
    /// Current structured value of `attr`.
    fn read_time(&self, attr: &str) -> Option<Timestamp>;

    /// Store a structured value for `attr` (`None` clears it).
    fn write_time(&mut self, attr: &str, value: Option<Timestamp>);

    fn field_states(&self) -> &FieldStates;

    fn field_states_mut(&mut self) -> &mut FieldStates;

    /// Resolve a preparser method by name.
    ///
    /// Called once when a field configuration is built, never per assignment.
    fn preparser(_name: &str) -> Option<MethodPreparser<Self>>
    where
        Self: Sized,
    {
        None
    }
}
