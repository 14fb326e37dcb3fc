//! Validation of time attributes.
//!
//! The rule never parses. It reads the state the synchronizer left behind
//! and reports at most one error per attribute, first match wins:
//!
//! 1. last text assignment was rejected → [`FieldErrorKind::InvalidFormat`]
//! 2. no value and nil not allowed → [`FieldErrorKind::Blank`]
//! 3. value before the minimum → [`FieldErrorKind::TooEarly`]
//! 4. value at or after the maximum → [`FieldErrorKind::TooLate`]

use crate::config::FieldConfig;
use crate::model::Timestamp;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Text failed to parse or was blank where blank is not allowed.
    InvalidFormat,
    Blank,
    TooEarly,
    TooLate,
}

/// A validation failure on one attribute, with its rendered message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{attribute} {message}")]
pub struct FieldError {
    pub attribute: String,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(
        attribute: impl Into<String>,
        kind: FieldErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Where validation errors are collected.
pub trait ErrorSink {
    fn add(&mut self, error: FieldError);
}

impl ErrorSink for Vec<FieldError> {
    fn add(&mut self, error: FieldError) {
        self.push(error);
    }
}

/// Errors gathered by a validation pass, in attribute registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// The error reported for `attribute`, if any.
    pub fn on(&self, attribute: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.attribute == attribute)
    }

    /// `"<attribute> <message>"` for every error.
    pub fn full_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.errors
    }
}

impl ErrorSink for ValidationErrors {
    fn add(&mut self, error: FieldError) {
        self.errors.push(error);
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// Apply the rule to one attribute's state.
pub fn check<M>(
    attribute: &str,
    config: &FieldConfig<M>,
    value: Option<Timestamp>,
    invalid: bool,
) -> Option<FieldError> {
    if invalid {
        return Some(FieldError::new(
            attribute,
            FieldErrorKind::InvalidFormat,
            config.message.as_str(),
        ));
    }

    let Some(value) = value else {
        if config.allow_nil || config.allow_blank {
            return None;
        }
        return Some(FieldError::new(
            attribute,
            FieldErrorKind::Blank,
            config.blank.as_str(),
        ));
    };

    if let Some(minimum) = config.minimum {
        if value < minimum {
            return Some(FieldError::new(
                attribute,
                FieldErrorKind::TooEarly,
                config.bound_message(&config.too_early, minimum),
            ));
        }
    }

    if let Some(maximum) = config.maximum {
        if value >= maximum {
            return Some(FieldError::new(
                attribute,
                FieldErrorKind::TooLate,
                config.bound_message(&config.too_late, maximum),
            ));
        }
    }

    None
}
