//! # timefield Architecture
//!
//! timefield lets a model attribute be **both** a structured point in time and
//! a user-editable string, with one set of validation rules covering both.
//! It is a helper that attaches to someone else's model: the host keeps its
//! own storage and persistence, timefield keeps the text side in step.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Registry (registry.rs)                                     │
//! │  - Declares time attributes on a model type                 │
//! │  - Accessors by attribute name, model-wide validation pass  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Field Synchronizer (field.rs)                              │
//! │  - Text ↔ value conversion for one attribute                │
//! │  - Caches raw text and the invalid flag per record          │
//! └─────────────────────────────────────────────────────────────┘
//!                │                               │
//!                ▼                               ▼
//! ┌──────────────────────────────┐ ┌────────────────────────────┐
//! │  Parsers (parser/)           │ │  Validation (validation.rs)│
//! │  - Natural / strict strategy │ │  - Pure rule over state    │
//! └──────────────────────────────┘ └────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host Record (record/)                                      │
//! │  - TimeRecord trait: storage, field state, named preparsers │
//! │  - MemoryRecord (testing, simple callers)                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: Text Never Fails Loudly
//!
//! Assigning text never returns an error and never panics on bad input. A
//! rejected string is remembered verbatim, the stored value is left as it
//! was, and the next validation pass reports it. That is what lets a form
//! show the user's own (wrong) input next to the error message.
//!
//! Configuration problems are the opposite: they surface as
//! [`error::TimeFieldError`] when a field is registered, never later.
//!
//! ## Module Overview
//!
//! - [`registry`]: `TimeFields`, the per-model facade
//! - [`field`]: `TimeField`, the synchronizer for one attribute
//! - [`validation`]: the validation rule, error kinds and sinks
//! - [`config`]: options, process-wide defaults, resolved configuration
//! - [`parser`]: parser strategies
//! - [`record`]: the host seams and an in-memory record
//! - [`model`]: `Timestamp`, `FieldState`
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod field;
pub mod model;
pub mod parser;
pub mod record;
pub mod registry;
pub mod validation;

pub use config::{FieldDefault, FieldOptions, Preparser, RawTextPolicy};
pub use error::{Result, TimeFieldError};
pub use field::TimeField;
pub use model::{FieldState, FieldStates, Timestamp};
pub use parser::{NaturalParser, ParserKind, StrictParser, TimeParser};
pub use record::TimeRecord;
pub use registry::TimeFields;
pub use validation::{ErrorSink, FieldError, FieldErrorKind, ValidationErrors};
