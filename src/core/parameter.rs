//! Settings fields for content block configuration
//!
//! This module defines the field descriptors a manifest declares, the values
//! a block stores for them, and the per-field validation errors reported back
//! to the admin form.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::localized::LocalizedText;

/// Settings field definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Setting key, e.g. `title` or `link_url_2`
    pub name: String,
    /// Field type
    pub field_type: FieldType,
    /// Whether this field must hold a value
    pub required: bool,
    /// Explicit default; required fields without one get a generated placeholder
    pub default_value: Option<SettingValue>,
    /// Optional constraints
    pub constraints: FieldConstraints,
}

impl FieldSpec {
    /// Create an optional field of the given type
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            default_value: None,
            constraints: FieldConstraints::new(),
        }
    }

    /// Localized plain text field
    pub fn localized(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::LocalizedText)
    }

    /// Localized rich text field (HTML bodies)
    pub fn rich_text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::LocalizedRichText)
    }

    /// Localized URL field
    pub fn url(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::LocalizedUrl)
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the default value
    pub fn with_default(mut self, value: impl Into<SettingValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set constraints
    pub fn with_constraints(mut self, constraints: FieldConstraints) -> Self {
        self.constraints = constraints;
        self
    }
}

/// Field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Per-locale plain text
    LocalizedText,
    /// Per-locale HTML text
    LocalizedRichText,
    /// Per-locale link target
    LocalizedUrl,
    /// Single plain string
    Text,
    /// Icon identifier
    Icon,
    /// Integer number
    Integer,
    /// List of plain strings
    TextList,
}

impl FieldType {
    /// Whether values of this type are stored per locale
    pub fn is_localized(self) -> bool {
        matches!(
            self,
            FieldType::LocalizedText | FieldType::LocalizedRichText | FieldType::LocalizedUrl
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::LocalizedText => "a map of locale to text",
            FieldType::LocalizedRichText => "a map of locale to rich text",
            FieldType::LocalizedUrl => "a map of locale to URL",
            FieldType::Text => "a string",
            FieldType::Icon => "an icon name",
            FieldType::Integer => "an integer",
            FieldType::TextList => "a list of strings",
        };
        f.write_str(name)
    }
}

/// Stored setting value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Explicitly cleared value
    Null,
    /// Integer number
    Integer(i64),
    /// Plain string
    Text(String),
    /// List of strings
    List(Vec<String>),
    /// Per-locale text
    Localized(LocalizedText),
}

impl SettingValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, SettingValue::Null)
    }

    /// Try to convert to localized text
    pub fn as_localized(&self) -> Option<&LocalizedText> {
        match self {
            SettingValue::Localized(text) => Some(text),
            _ => None,
        }
    }

    /// Try to convert to string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to convert to integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SettingValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to convert to list
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            SettingValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<LocalizedText> for SettingValue {
    fn from(text: LocalizedText) -> Self {
        SettingValue::Localized(text)
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::Text(s)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::Text(s.to_string())
    }
}

impl From<i64> for SettingValue {
    fn from(i: i64) -> Self {
        SettingValue::Integer(i)
    }
}

impl From<Vec<String>> for SettingValue {
    fn from(items: Vec<String>) -> Self {
        SettingValue::List(items)
    }
}

/// Named configuration payload of a content block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(BTreeMap<String, SettingValue>);

impl Settings {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.0.get(name)
    }

    /// Localized setting, if present and localized
    pub fn localized(&self, name: &str) -> Option<&LocalizedText> {
        self.get(name).and_then(SettingValue::as_localized)
    }

    /// Translated text of a localized setting with default-locale fallback
    pub fn translated(&self, name: &str, locale: &str, default_locale: &str) -> Option<&str> {
        self.localized(name)
            .and_then(|text| text.translate(locale, default_locale))
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SettingValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Field constraints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldConstraints {
    /// Minimum value (for integers)
    pub min: Option<i64>,
    /// Maximum value (for integers)
    pub max: Option<i64>,
    /// Allowed values (for icons and lists)
    pub allowed_values: Option<Vec<String>>,
    /// Maximum length in characters (for text, per locale)
    pub max_length: Option<usize>,
}

impl FieldConstraints {
    /// Create a new empty constraints object
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an inclusive integer range
    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Set allowed values
    pub fn with_allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Set maximum length
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Whether `value` is permitted by `allowed_values`
    pub fn allows(&self, value: &str) -> bool {
        self.allowed_values
            .as_ref()
            .map_or(true, |allowed| allowed.iter().any(|v| v == value))
    }
}

/// A rejected settings field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Offending setting key
    pub field: String,
    /// What is wrong with it
    pub reason: FieldErrorReason,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: FieldErrorReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

/// Reasons a field value is rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum FieldErrorReason {
    #[error("is not a setting of this content block")]
    UnknownField,

    #[error("must be {expected}")]
    TypeMismatch { expected: FieldType },

    #[error("is required")]
    Required,

    #[error("must be set for the default locale '{0}'")]
    MissingDefaultLocale(String),

    #[error("has a value for unavailable locale '{0}'")]
    UnsupportedLocale(String),

    #[error("'{url}' is not a valid URL for locale '{locale}'")]
    InvalidUrl { locale: String, url: String },

    #[error("{value} is out of range")]
    OutOfRange { value: i64 },

    #[error("'{0}' is not an allowed value")]
    NotAllowed(String),

    #[error("is longer than {max} characters for locale '{locale}'")]
    TooLong { locale: String, max: usize },

    #[error("payload must be an object of setting names to values")]
    NotAnObject,
}

/// Validation result
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether validation passed
    pub valid: bool,
    /// Rejected fields
    pub errors: Vec<FieldError>,
    /// Warning messages
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Create a validation result with an error
    pub fn error(field: impl Into<String>, reason: FieldErrorReason) -> Self {
        Self {
            valid: false,
            errors: vec![FieldError::new(field, reason)],
            warnings: Vec::new(),
        }
    }

    /// Record an error
    pub fn add_error(&mut self, field: impl Into<String>, reason: FieldErrorReason) {
        self.valid = false;
        self.errors.push(FieldError::new(field, reason));
    }

    /// Add a warning to the validation result
    pub fn with_warning(mut self, msg: impl Into<String>) -> Self {
        self.warnings.push(msg.into());
        self
    }

    /// Check if the validation has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the validation has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Merge another validation result into this one
    pub fn merge(mut self, other: ValidationResult) -> Self {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self
    }
}
