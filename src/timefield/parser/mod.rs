//! # Parser Strategies
//!
//! Text becomes a [`Timestamp`] through a [`TimeParser`]. The strategy is part
//! of a field's configuration and is chosen once, when the configuration is
//! built:
//!
//! - [`NaturalParser`]: relative phrases (`tomorrow at 3pm`, `in 2 days`,
//!   `next friday`) with a strict fallback. The default.
//! - [`StrictParser`]: calendar formats only (`2024-03-01 09:30`, RFC 3339).
//!
//! Custom strategies implement [`TimeParser`] and are installed with
//! [`FieldOptions::with_parser`](crate::config::FieldOptions::with_parser).
//!
//! ## Failure Channels
//!
//! A parser may reject text by returning `Ok(None)` or an `Err`. Callers of
//! [`TimeField::set_text`](crate::field::TimeField::set_text) never see either:
//! both collapse into the field's invalid flag.

use crate::model::Timestamp;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub mod natural;
pub mod strict;

pub use natural::NaturalParser;
pub use strict::StrictParser;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("Unrecognized time: {0:?}")]
    Unrecognized(String),

    #[error("Time out of range: {0:?}")]
    OutOfRange(String),
}

/// Converts text into a structured time.
pub trait TimeParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<Option<Timestamp>, TimeParseError>;
}

impl<F> TimeParser for F
where
    F: Fn(&str) -> Option<Timestamp> + Send + Sync,
{
    fn parse(&self, text: &str) -> Result<Option<Timestamp>, TimeParseError> {
        Ok(self(text))
    }
}

/// Built-in strategies selectable from an options file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    #[default]
    Natural,
    Strict,
}

impl ParserKind {
    pub fn build(self) -> Arc<dyn TimeParser> {
        match self {
            ParserKind::Natural => Arc::new(NaturalParser::new()),
            ParserKind::Strict => Arc::new(StrictParser),
        }
    }
}
