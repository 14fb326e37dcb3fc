//! # Field Configuration
//!
//! Options come in two shapes:
//!
//! - [`FieldOptions`]: the loose mapping callers write (every key optional,
//!   serde-backed so it can live in a JSON file). Options for a field are
//!   merged over the process-wide defaults (see [`default_options`]).
//! - [`FieldConfig`]: the resolved, immutable configuration one attribute
//!   runs with. Built once per registration and shared by every record
//!   through an `Arc`.
//!
//! Resolution is where everything that can be wrong with a configuration is
//! caught: unknown preparser methods and unrenderable format patterns both
//! fail here rather than on first use.

use crate::error::{Result, TimeFieldError};
use crate::model::Timestamp;
use crate::parser::{ParserKind, TimeParseError, TimeParser};
use crate::record::{MethodPreparser, TimeRecord};
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

pub const DEFAULT_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const DEFAULT_MESSAGE: &str = "is invalid";
pub const DEFAULT_BLANK: &str = "can't be blank";
pub const DEFAULT_TOO_EARLY: &str = "cannot be before %s";
pub const DEFAULT_TOO_LATE: &str = "cannot be on or after %s";

/// Fallback shown as text when an attribute has no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldDefault {
    /// No fallback; the text is absent.
    Unset,
    /// The current local time, taken at render.
    Now,
    Time(Timestamp),
    /// Text run through the preparser and parser on every render.
    Template(String),
}

/// What happens to the cached text after it parses successfully.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawTextPolicy {
    /// Keep showing exactly what was typed until the value is set directly.
    #[default]
    Retain,
    /// Drop the text; the value is rendered through the format from then on.
    Clear,
}

type TextTransform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Text transform applied before parsing.
#[derive(Clone)]
pub enum Preparser {
    /// Looked up on the record type through [`TimeRecord::preparser`].
    Method(String),
    Function(TextTransform),
}

impl Preparser {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Preparser::Function(Arc::new(f))
    }
}

impl fmt::Debug for Preparser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preparser::Method(name) => f.debug_tuple("Method").field(name).finish(),
            Preparser::Function(_) => f.write_str("Function(..)"),
        }
    }
}

// Only method names survive a trip through a file.
impl Serialize for Preparser {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Preparser::Method(name) => serializer.serialize_str(name),
            Preparser::Function(_) => Err(serde::ser::Error::custom(
                "function preparsers cannot be serialized",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Preparser {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(Preparser::Method)
    }
}

/// Options for one or more time attributes. Unset keys fall back to the
/// process-wide defaults when the options are registered.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldDefault>,

    /// strftime pattern used to render values and bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blank: Option<String>,

    /// `%s` is replaced by the rendered minimum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub too_early: Option<String>,

    /// `%s` is replaced by the rendered maximum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub too_late: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_nil: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_blank: Option<bool>,

    /// Inclusive lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Timestamp>,

    /// Exclusive upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparser: Option<Preparser>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<ParserKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<RawTextPolicy>,

    /// Programmatic parser; wins over `parser` when set.
    #[serde(skip)]
    pub custom_parser: Option<Arc<dyn TimeParser>>,
}

impl fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldOptions")
            .field("default", &self.default)
            .field("format", &self.format)
            .field("message", &self.message)
            .field("blank", &self.blank)
            .field("too_early", &self.too_early)
            .field("too_late", &self.too_late)
            .field("allow_nil", &self.allow_nil)
            .field("allow_blank", &self.allow_blank)
            .field("minimum", &self.minimum)
            .field("maximum", &self.maximum)
            .field("preparser", &self.preparser)
            .field("parser", &self.parser)
            .field("raw_text", &self.raw_text)
            .field("custom_parser", &self.custom_parser.is_some())
            .finish()
    }
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The options every field starts from unless the process-wide defaults
    /// were replaced.
    pub fn builtin() -> Self {
        Self {
            default: Some(FieldDefault::Now),
            format: Some(DEFAULT_FORMAT.to_string()),
            message: Some(DEFAULT_MESSAGE.to_string()),
            blank: Some(DEFAULT_BLANK.to_string()),
            too_early: Some(DEFAULT_TOO_EARLY.to_string()),
            too_late: Some(DEFAULT_TOO_LATE.to_string()),
            allow_nil: Some(true),
            allow_blank: Some(false),
            minimum: None,
            maximum: None,
            preparser: None,
            parser: Some(ParserKind::Natural),
            raw_text: Some(RawTextPolicy::Retain),
            custom_parser: None,
        }
    }

    /// Load options from a JSON file, or return empty options if it is missing.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(TimeFieldError::Io)?;
        let options: FieldOptions =
            serde_json::from_str(&content).map_err(TimeFieldError::Serialization)?;
        Ok(options)
    }

    /// Save options as pretty JSON, creating the parent directory if needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(TimeFieldError::Io)?;
            }
        }

        let content = serde_json::to_string_pretty(self).map_err(TimeFieldError::Serialization)?;
        fs::write(path, content).map_err(TimeFieldError::Io)?;
        Ok(())
    }

    /// Keys set in `overrides` win over keys set in `self`.
    pub fn merge(self, overrides: FieldOptions) -> FieldOptions {
        FieldOptions {
            default: overrides.default.or(self.default),
            format: overrides.format.or(self.format),
            message: overrides.message.or(self.message),
            blank: overrides.blank.or(self.blank),
            too_early: overrides.too_early.or(self.too_early),
            too_late: overrides.too_late.or(self.too_late),
            allow_nil: overrides.allow_nil.or(self.allow_nil),
            allow_blank: overrides.allow_blank.or(self.allow_blank),
            minimum: overrides.minimum.or(self.minimum),
            maximum: overrides.maximum.or(self.maximum),
            preparser: overrides.preparser.or(self.preparser),
            parser: overrides.parser.or(self.parser),
            raw_text: overrides.raw_text.or(self.raw_text),
            custom_parser: overrides.custom_parser.or(self.custom_parser),
        }
    }

    pub fn with_default(mut self, default: FieldDefault) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_blank(mut self, blank: impl Into<String>) -> Self {
        self.blank = Some(blank.into());
        self
    }

    pub fn with_too_early(mut self, too_early: impl Into<String>) -> Self {
        self.too_early = Some(too_early.into());
        self
    }

    pub fn with_too_late(mut self, too_late: impl Into<String>) -> Self {
        self.too_late = Some(too_late.into());
        self
    }

    pub fn with_allow_nil(mut self, allow_nil: bool) -> Self {
        self.allow_nil = Some(allow_nil);
        self
    }

    pub fn with_allow_blank(mut self, allow_blank: bool) -> Self {
        self.allow_blank = Some(allow_blank);
        self
    }

    pub fn with_minimum(mut self, minimum: Timestamp) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn with_maximum(mut self, maximum: Timestamp) -> Self {
        self.maximum = Some(maximum);
        self
    }

    pub fn with_preparser(mut self, preparser: Preparser) -> Self {
        self.preparser = Some(preparser);
        self
    }

    pub fn with_parser_kind(mut self, kind: ParserKind) -> Self {
        self.parser = Some(kind);
        self
    }

    pub fn with_parser<P: TimeParser + 'static>(mut self, parser: P) -> Self {
        self.custom_parser = Some(Arc::new(parser));
        self
    }

    pub fn with_raw_text(mut self, policy: RawTextPolicy) -> Self {
        self.raw_text = Some(policy);
        self
    }

    /// Resolve into the immutable configuration a field runs with.
    ///
    /// Keys left unset fall back to the values of [`FieldOptions::builtin`].
    pub fn resolve<M: TimeRecord>(&self) -> Result<FieldConfig<M>> {
        let options = self.clone();

        let format = options
            .format
            .unwrap_or_else(|| DEFAULT_FORMAT.to_string());
        check_format(&format)?;

        let preparser = match options.preparser {
            None => None,
            Some(Preparser::Function(f)) => Some(ResolvedPreparser::Function(f)),
            Some(Preparser::Method(name)) => match M::preparser(&name) {
                Some(method) => Some(ResolvedPreparser::Method(method)),
                None => return Err(TimeFieldError::UnknownPreparser(name)),
            },
        };

        let parser = match options.custom_parser {
            Some(parser) => parser,
            None => options.parser.unwrap_or_default().build(),
        };

        Ok(FieldConfig {
            default: options.default.unwrap_or(FieldDefault::Now),
            format,
            message: options
                .message
                .unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
            blank: options.blank.unwrap_or_else(|| DEFAULT_BLANK.to_string()),
            too_early: options
                .too_early
                .unwrap_or_else(|| DEFAULT_TOO_EARLY.to_string()),
            too_late: options
                .too_late
                .unwrap_or_else(|| DEFAULT_TOO_LATE.to_string()),
            allow_nil: options.allow_nil.unwrap_or(true),
            allow_blank: options.allow_blank.unwrap_or(false),
            minimum: options.minimum,
            maximum: options.maximum,
            raw_text: options.raw_text.unwrap_or_default(),
            preparser,
            parser,
        })
    }
}

static DEFAULT_OPTIONS: Lazy<RwLock<FieldOptions>> =
    Lazy::new(|| RwLock::new(FieldOptions::builtin()));

/// The options every registration is merged over.
pub fn default_options() -> FieldOptions {
    match DEFAULT_OPTIONS.read() {
        Ok(options) => options.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Replace the process-wide defaults. Fields registered earlier keep the
/// configuration they were resolved with.
pub fn set_default_options(options: FieldOptions) {
    match DEFAULT_OPTIONS.write() {
        Ok(mut current) => *current = options,
        Err(poisoned) => *poisoned.into_inner() = options,
    }
}

/// Rejects patterns chrono cannot parse or cannot render for a naive time
/// (offset and zone specifiers).
fn check_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(TimeFieldError::InvalidPattern(format.to_string()));
    }

    let sample = NaiveDate::from_ymd_opt(2000, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
    match sample.and_then(|t| render_with(format, t)) {
        Some(_) => Ok(()),
        None => Err(TimeFieldError::InvalidPattern(format.to_string())),
    }
}

fn render_with(format: &str, value: Timestamp) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", value.format(format)).ok()?;
    Some(out)
}

enum ResolvedPreparser<M> {
    Method(MethodPreparser<M>),
    Function(TextTransform),
}

impl<M> ResolvedPreparser<M> {
    fn apply(&self, record: &M, text: &str) -> String {
        match self {
            ResolvedPreparser::Method(method) => method(record, text),
            ResolvedPreparser::Function(f) => f(text),
        }
    }
}

/// Resolved configuration of one time attribute.
pub struct FieldConfig<M> {
    pub default: FieldDefault,
    pub format: String,
    pub message: String,
    pub blank: String,
    pub too_early: String,
    pub too_late: String,
    pub allow_nil: bool,
    pub allow_blank: bool,
    pub minimum: Option<Timestamp>,
    pub maximum: Option<Timestamp>,
    pub raw_text: RawTextPolicy,
    preparser: Option<ResolvedPreparser<M>>,
    parser: Arc<dyn TimeParser>,
}

impl<M> FieldConfig<M> {
    /// Render a value through the configured format.
    pub fn render(&self, value: Timestamp) -> Option<String> {
        render_with(&self.format, value)
    }

    /// Fill a message template's `%s` with a rendered bound.
    pub fn bound_message(&self, template: &str, bound: Timestamp) -> String {
        let rendered = self.render(bound).unwrap_or_default();
        template.replacen("%s", &rendered, 1)
    }

    /// Run text through the preparser, if any, and then the parser.
    pub fn parse(
        &self,
        record: &M,
        text: &str,
    ) -> std::result::Result<Option<Timestamp>, TimeParseError> {
        match &self.preparser {
            Some(preparser) => self.parser.parse(&preparser.apply(record, text)),
            None => self.parser.parse(text),
        }
    }

    pub fn has_preparser(&self) -> bool {
        self.preparser.is_some()
    }
}

impl<M> fmt::Debug for FieldConfig<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldConfig")
            .field("default", &self.default)
            .field("format", &self.format)
            .field("message", &self.message)
            .field("blank", &self.blank)
            .field("too_early", &self.too_early)
            .field("too_late", &self.too_late)
            .field("allow_nil", &self.allow_nil)
            .field("allow_blank", &self.allow_blank)
            .field("minimum", &self.minimum)
            .field("maximum", &self.maximum)
            .field("raw_text", &self.raw_text)
            .field("preparser", &self.preparser.is_some())
            .finish_non_exhaustive()
    }
}
