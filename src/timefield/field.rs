//! # Field Synchronizer
//!
//! A [`TimeField`] keeps one attribute's two faces in step:
//!
//! - the **value**: a [`Timestamp`] held by the host record, the only thing
//!   that gets persisted
//! - the **text**: what the user typed, cached in the record's
//!   [`FieldState`] so it can be shown again, even when it did not parse
//!
//! ## Text Assignment
//!
//! `set_text` never fails. Text is cached first, then preparsed and parsed.
//! A rejected parse flips the invalid flag and leaves the stored value alone;
//! the validation rule picks the flag up later. An accepted parse stores the
//! value and, under [`RawTextPolicy::Retain`], keeps the typed text so the
//! field redisplays exactly what was entered.
//!
//! ## Value Assignment
//!
//! `set_value` is the canonical path: it writes through to the record and
//! drops the cached text and the invalid flag.

use crate::config::{FieldConfig, FieldDefault, FieldOptions, RawTextPolicy};
use crate::error::Result;
use crate::model::{FieldState, Timestamp};
use crate::record::TimeRecord;
use crate::validation::{self, ErrorSink, FieldError};
use chrono::Local;
use std::sync::Arc;
use tracing::{debug, trace};

/// Accessors and validation for one time attribute of `M`.
pub struct TimeField<M> {
    name: String,
    config: Arc<FieldConfig<M>>,
}

impl<M> Clone for TimeField<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<M> std::fmt::Debug for TimeField<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeField")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish()
    }
}

impl<M: TimeRecord> TimeField<M> {
    pub fn new(name: impl Into<String>, config: Arc<FieldConfig<M>>) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Build a standalone field from options merged over the process-wide
    /// defaults.
    pub fn build(name: impl Into<String>, options: FieldOptions) -> Result<Self> {
        let config = crate::config::default_options().merge(options).resolve()?;
        Ok(Self::new(name, Arc::new(config)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &FieldConfig<M> {
        &self.config
    }

    pub fn value(&self, record: &M) -> Option<Timestamp> {
        record.read_time(&self.name)
    }

    pub fn set_value(&self, record: &mut M, value: Option<Timestamp>) {
        record.write_time(&self.name, value);
        record.field_states_mut().entry(&self.name).reset();
    }

    /// Text to show for the attribute.
    ///
    /// Cached text wins, then the stored value, then the configured default.
    pub fn text(&self, record: &M) -> Option<String> {
        if let Some(raw) = self.raw_text(record) {
            return Some(raw.to_string());
        }

        if let Some(value) = self.value(record) {
            return self.config.render(value);
        }

        match &self.config.default {
            FieldDefault::Unset => None,
            FieldDefault::Now => self.config.render(Local::now().naive_local()),
            FieldDefault::Time(t) => self.config.render(*t),
            FieldDefault::Template(template) => match self.config.parse(record, template) {
                Ok(Some(t)) => self.config.render(t),
                Ok(None) => None,
                Err(e) => {
                    debug!(
                        attribute = %self.name,
                        %template,
                        error = %e,
                        "default template did not parse"
                    );
                    None
                }
            },
        }
    }

    /// Assign the attribute from text. Absent or empty text clears it.
    ///
    /// Whitespace-only text counts as blank, not empty: it is cached and
    /// clears the value only when `allow_blank` is set, otherwise it marks
    /// the attribute invalid.
    pub fn set_text(&self, record: &mut M, text: Option<&str>) {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            self.set_value(record, None);
            return;
        };

        record.field_states_mut().entry(&self.name).raw_text = Some(text.to_string());

        if text.trim().is_empty() {
            if self.config.allow_blank {
                record.write_time(&self.name, None);
                record.field_states_mut().entry(&self.name).invalid = false;
            } else {
                debug!(attribute = %self.name, "blank text rejected");
                record.field_states_mut().entry(&self.name).invalid = true;
            }
            return;
        }

        match self.config.parse(record, text) {
            Ok(Some(value)) => {
                record.write_time(&self.name, Some(value));
                let state = record.field_states_mut().entry(&self.name);
                state.invalid = false;
                if self.config.raw_text == RawTextPolicy::Clear {
                    state.raw_text = None;
                }
                trace!(attribute = %self.name, %text, %value, "text assigned");
            }
            Ok(None) => {
                debug!(attribute = %self.name, %text, "text did not resolve to a time");
                record.field_states_mut().entry(&self.name).invalid = true;
            }
            Err(e) => {
                debug!(attribute = %self.name, %text, error = %e, "text did not parse");
                record.field_states_mut().entry(&self.name).invalid = true;
            }
        }
    }

    /// The cached text, if the attribute was last assigned through text.
    pub fn raw_text<'a>(&self, record: &'a M) -> Option<&'a str> {
        record
            .field_states()
            .get(&self.name)
            .and_then(|state| state.raw_text.as_deref())
    }

    pub fn is_invalid(&self, record: &M) -> bool {
        record
            .field_states()
            .get(&self.name)
            .is_some_and(|state| state.invalid)
    }

    pub fn state(&self, record: &M) -> FieldState {
        record
            .field_states()
            .get(&self.name)
            .cloned()
            .unwrap_or_default()
    }

    /// Run the validation rule against the record's current state.
    pub fn validate(&self, record: &M) -> Option<FieldError> {
        validation::check(
            &self.name,
            &self.config,
            self.value(record),
            self.is_invalid(record),
        )
    }

    pub fn validate_into<S: ErrorSink>(&self, record: &M, sink: &mut S) {
        if let Some(error) = self.validate(record) {
            sink.add(error);
        }
    }
}
