//! Settings validation engine
//!
//! Checks a partial settings payload against a manifest schema and merges it
//! into the current settings. Every offending field is collected so the admin
//! form can highlight all of them at once; nothing is merged unless the whole
//! payload is accepted.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::core::block::LandingError;
use crate::core::localized::{LocalizedText, TranslationProvider};
use crate::core::manifest::ManifestSchema;
use crate::core::parameter::{
    FieldErrorReason, FieldSpec, FieldType, SettingValue, Settings, ValidationResult,
};

/// Absolute http(s) URLs, root-relative paths and mailto links
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://[^\s/$.?#][^\s]*|/[^\s]*|mailto:[^\s@]+@[^\s@]+)$").unwrap()
});

/// Whether `url` is an accepted link target
pub fn is_valid_url(url: &str) -> bool {
    URL_PATTERN.is_match(url)
}

/// Validates settings of one manifest
pub struct SettingsValidator<'a> {
    schema: &'a ManifestSchema,
    translations: &'a dyn TranslationProvider,
    validate_urls: bool,
}

impl<'a> SettingsValidator<'a> {
    pub fn new(
        schema: &'a ManifestSchema,
        translations: &'a dyn TranslationProvider,
        validate_urls: bool,
    ) -> Self {
        Self {
            schema,
            translations,
            validate_urls,
        }
    }

    /// Merge `patch` into `current`, returning the new settings
    ///
    /// Keys absent from `patch` are kept. Localized values are merged per
    /// locale. On any error `current` is left as it was and every rejected
    /// field is reported.
    pub fn apply(&self, current: &Settings, patch: &Value) -> Result<Settings, LandingError> {
        let Some(entries) = patch.as_object() else {
            return Err(LandingError::SchemaValidation {
                errors: ValidationResult::error("settings", FieldErrorReason::NotAnObject).errors,
            });
        };

        let mut merged = current.clone();
        let mut result = ValidationResult::ok();

        for (name, raw) in entries {
            let Some(spec) = self.schema.field_spec(name) else {
                result.add_error(name.as_str(), FieldErrorReason::UnknownField);
                continue;
            };

            match self.coerce(spec, raw) {
                Ok(value) => {
                    let next = merge_value(merged.get(name), value);
                    result = result.merge(self.check(spec, &next));
                    merged.insert(name.as_str(), next);
                }
                Err(reason) => result.add_error(name.as_str(), reason),
            }
        }

        self.finish(result)?;
        Ok(merged)
    }

    /// Check every field of complete settings, including missing required ones
    pub fn validate_all(&self, settings: &Settings) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for (name, value) in settings.iter() {
            match self.schema.field_spec(name) {
                Some(spec) => result = result.merge(self.check(spec, value)),
                None => result.add_error(name, FieldErrorReason::UnknownField),
            }
        }

        for spec in self.schema.fields.iter().filter(|f| f.required) {
            if !settings.contains_key(&spec.name) {
                result.add_error(spec.name.as_str(), FieldErrorReason::Required);
            }
        }

        result
    }

    fn finish(&self, result: ValidationResult) -> Result<(), LandingError> {
        for warning in &result.warnings {
            tracing::debug!(manifest = %self.schema.name, "{}", warning);
        }

        if result.has_errors() {
            tracing::warn!(
                manifest = %self.schema.name,
                fields = ?result.errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>(),
                "rejected content block settings"
            );
            return Err(LandingError::SchemaValidation {
                errors: result.errors,
            });
        }

        Ok(())
    }

    /// Convert a raw JSON value into the field's value type
    fn coerce(&self, spec: &FieldSpec, raw: &Value) -> Result<SettingValue, FieldErrorReason> {
        let mismatch = || FieldErrorReason::TypeMismatch {
            expected: spec.field_type,
        };

        if raw.is_null() {
            return if spec.required {
                Err(FieldErrorReason::Required)
            } else {
                Ok(SettingValue::Null)
            };
        }

        match spec.field_type {
            FieldType::LocalizedText | FieldType::LocalizedRichText | FieldType::LocalizedUrl => {
                let map = raw.as_object().ok_or_else(mismatch)?;
                let mut text = LocalizedText::new();
                for (locale, value) in map {
                    if !self.translations.is_available(locale) {
                        return Err(FieldErrorReason::UnsupportedLocale(locale.clone()));
                    }
                    text.set(locale.as_str(), value.as_str().ok_or_else(mismatch)?);
                }
                Ok(SettingValue::Localized(text))
            }
            FieldType::Text | FieldType::Icon => {
                raw.as_str().map(SettingValue::from).ok_or_else(mismatch)
            }
            FieldType::Integer => raw.as_i64().map(SettingValue::Integer).ok_or_else(mismatch),
            FieldType::TextList => raw
                .as_array()
                .ok_or_else(mismatch)?
                .iter()
                .map(|item| item.as_str().map(str::to_string).ok_or_else(mismatch))
                .collect::<Result<Vec<_>, _>>()
                .map(SettingValue::List),
        }
    }

    /// Check a value against the field's requirements and constraints
    fn check(&self, spec: &FieldSpec, value: &SettingValue) -> ValidationResult {
        let mut result = ValidationResult::ok();
        let name = spec.name.as_str();
        let constraints = &spec.constraints;

        match value {
            SettingValue::Null if spec.required => {
                result.add_error(name, FieldErrorReason::Required);
            }
            SettingValue::Null => {}
            SettingValue::Localized(text) => {
                if !spec.field_type.is_localized() {
                    result.add_error(name, FieldErrorReason::TypeMismatch {
                        expected: spec.field_type,
                    });
                    return result;
                }

                let default_locale = self.translations.default_locale();
                if spec.required && !text.has_locale(default_locale) {
                    result.add_error(
                        name,
                        FieldErrorReason::MissingDefaultLocale(default_locale.to_string()),
                    );
                }

                // One error per field and reason; the first offending locale is reported
                let check_urls = spec.field_type == FieldType::LocalizedUrl && self.validate_urls;
                let mut too_long = None;
                let mut invalid_url = None;

                for (locale, translation) in text.iter() {
                    if let Some(max) = constraints.max_length {
                        if too_long.is_none() && translation.chars().count() > max {
                            too_long = Some(FieldErrorReason::TooLong {
                                locale: locale.to_string(),
                                max,
                            });
                        }
                    }
                    if check_urls
                        && invalid_url.is_none()
                        && !translation.is_empty()
                        && !is_valid_url(translation)
                    {
                        invalid_url = Some(FieldErrorReason::InvalidUrl {
                            locale: locale.to_string(),
                            url: translation.to_string(),
                        });
                    }
                    if spec.required && translation.is_empty() && locale != default_locale {
                        result = result.with_warning(format!(
                            "{name} is empty for '{locale}' and falls back to '{default_locale}'"
                        ));
                    }
                }

                for reason in [too_long, invalid_url].into_iter().flatten() {
                    result.add_error(name, reason);
                }
            }
            SettingValue::Text(text) => {
                if spec.required && text.is_empty() {
                    result.add_error(name, FieldErrorReason::Required);
                }
                if !text.is_empty() && !constraints.allows(text) {
                    result.add_error(name, FieldErrorReason::NotAllowed(text.clone()));
                }
            }
            SettingValue::Integer(number) => {
                let below = constraints.min.is_some_and(|min| *number < min);
                let above = constraints.max.is_some_and(|max| *number > max);
                if below || above {
                    result.add_error(name, FieldErrorReason::OutOfRange { value: *number });
                }
            }
            SettingValue::List(items) => {
                for item in items.iter().filter(|item| !constraints.allows(item)) {
                    result.add_error(name, FieldErrorReason::NotAllowed(item.clone()));
                }
            }
        }

        result
    }
}

/// Overlay a new value on the current one; localized values merge per locale
fn merge_value(current: Option<&SettingValue>, value: SettingValue) -> SettingValue {
    match (current, value) {
        (Some(SettingValue::Localized(existing)), SettingValue::Localized(update)) => {
            let mut merged = existing.clone();
            merged.merge(&update);
            SettingValue::Localized(merged)
        }
        (_, value) => value,
    }
}
