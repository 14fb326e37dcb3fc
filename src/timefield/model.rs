use std::collections::HashMap;

/// The structured time value an attribute holds.
///
/// Naive on purpose: bounds, parsing and rendering all happen in the
/// wall-clock time the host stores.
pub type Timestamp = chrono::NaiveDateTime;

/// Text-side state of one time attribute on one model instance.
///
/// Only the structured value is persisted by the host; this state lives as
/// long as the instance and is rebuilt empty when the instance is reloaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    /// Last text handed to the text setter, kept even when it failed to parse.
    pub raw_text: Option<String>,
    /// Set when the last text assignment was rejected.
    pub invalid: bool,
}

impl FieldState {
    /// Drops the cached text and the invalid flag.
    pub fn reset(&mut self) {
        self.raw_text = None;
        self.invalid = false;
    }
}

/// Per-instance collection of [`FieldState`]s, keyed by attribute name.
///
/// Hosts embed one of these and hand it out through
/// [`TimeRecord`](crate::record::TimeRecord). Entries are created on first
/// write; reading an attribute that was never touched yields `None`.
#[derive(Debug, Clone, Default)]
pub struct FieldStates {
    states: HashMap<String, FieldState>,
}

impl FieldStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, attr: &str) -> Option<&FieldState> {
        self.states.get(attr)
    }

    pub fn entry(&mut self, attr: &str) -> &mut FieldState {
        self.states.entry(attr.to_string()).or_default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
