//! # Field Registry
//!
//! [`TimeFields`] is how a model type declares its time attributes. One call
//! to [`register`](TimeFields::register) takes a list of attribute names and
//! one options mapping, resolves the configuration once and installs a
//! [`TimeField`] per name, all sharing that configuration.
//!
//! The registry then serves as the model's facade:
//! - **Accessors by name**: `value` / `set_value` / `text` / `set_text`
//! - **Validation**: one rule per attribute, run in registration order
//!
//! ```ignore
//! let mut fields = TimeFields::<Event>::new();
//! fields.register(
//!     &["starts_at", "ends_at"],
//!     FieldOptions::new().with_allow_nil(false),
//! )?;
//!
//! fields.set_text(&mut event, "starts_at", Some("tomorrow at 9am"))?;
//! let errors = fields.validate(&event);
//! ```

use crate::config::{default_options, FieldOptions};
use crate::error::{Result, TimeFieldError};
use crate::field::TimeField;
use crate::model::Timestamp;
use crate::record::TimeRecord;
use crate::validation::{ErrorSink, ValidationErrors};
use std::sync::Arc;
use tracing::debug;

/// The time attributes declared for a model type.
pub struct TimeFields<M> {
    fields: Vec<TimeField<M>>,
}

impl<M> Default for TimeFields<M> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<M> std::fmt::Debug for TimeFields<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.fields.iter()).finish()
    }
}

impl<M: TimeRecord> TimeFields<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a field for every name in `names`.
    ///
    /// `options` is merged over the process-wide defaults before resolution.
    /// Nothing is installed if any name is already registered or the options
    /// do not resolve.
    pub fn register<S: AsRef<str>>(&mut self, names: &[S], options: FieldOptions) -> Result<()> {
        for (i, name) in names.iter().enumerate() {
            let name = name.as_ref();
            let repeated = names[..i].iter().any(|n| n.as_ref() == name);
            if repeated || self.field(name).is_some() {
                return Err(TimeFieldError::DuplicateAttribute(name.to_string()));
            }
        }

        let config = Arc::new(default_options().merge(options).resolve::<M>()?);
        debug!(
            attributes = ?names.iter().map(AsRef::as_ref).collect::<Vec<_>>(),
            ?config,
            "registering time fields"
        );

        self.fields.extend(
            names
                .iter()
                .map(|name| TimeField::new(name.as_ref(), Arc::clone(&config))),
        );
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&TimeField<M>> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn require(&self, name: &str) -> Result<&TimeField<M>> {
        self.field(name)
            .ok_or_else(|| TimeFieldError::UnknownAttribute(name.to_string()))
    }

    pub fn value(&self, record: &M, name: &str) -> Result<Option<Timestamp>> {
        Ok(self.require(name)?.value(record))
    }

    pub fn set_value(&self, record: &mut M, name: &str, value: Option<Timestamp>) -> Result<()> {
        self.require(name)?.set_value(record, value);
        Ok(())
    }

    pub fn text(&self, record: &M, name: &str) -> Result<Option<String>> {
        Ok(self.require(name)?.text(record))
    }

    /// Assign from text. Only an unknown attribute is an error; rejected text
    /// is recorded on the field and surfaces through [`validate`](Self::validate).
    pub fn set_text(&self, record: &mut M, name: &str, text: Option<&str>) -> Result<()> {
        self.require(name)?.set_text(record, text);
        Ok(())
    }

    /// Run every field's rule against `record`.
    pub fn validate(&self, record: &M) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        self.validate_into(record, &mut errors);
        errors
    }

    pub fn validate_into<S: ErrorSink>(&self, record: &M, sink: &mut S) {
        for field in &self.fields {
            field.validate_into(record, sink);
        }
    }
}
