//! Localized text values
//!
//! Settings such as titles, bodies and link texts carry one value per
//! locale. `LocalizedText` keeps them in a sorted map and resolves lookups
//! through the default locale when a translation is missing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from locale code to plain or rich text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    /// Create an empty localized value
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Same text for every given locale
    pub fn literal<'a>(locales: impl IntoIterator<Item = &'a str>, text: &str) -> Self {
        Self(
            locales
                .into_iter()
                .map(|locale| (locale.to_string(), text.to_string()))
                .collect(),
        )
    }

    /// Same text for every given locale, wrapped in an opening and closing tag
    ///
    /// Rich text bodies are stored as `<p>...</p>`.
    pub fn wrapped<'a>(
        locales: impl IntoIterator<Item = &'a str>,
        open: &str,
        close: &str,
        text: &str,
    ) -> Self {
        Self::literal(locales, &format!("{open}{text}{close}"))
    }

    /// Builder-style insert
    pub fn with(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.set(locale, text);
        self
    }

    /// Set the text for one locale
    pub fn set(&mut self, locale: impl Into<String>, text: impl Into<String>) {
        self.0.insert(locale.into(), text.into());
    }

    /// Raw value for a locale, without fallback
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    /// Value for `locale`, falling back to `default_locale` when the
    /// requested translation is missing or empty
    pub fn translate(&self, locale: &str, default_locale: &str) -> Option<&str> {
        self.get(locale)
            .filter(|text| !text.is_empty())
            .or_else(|| self.get(default_locale).filter(|text| !text.is_empty()))
    }

    /// Whether a non-empty value exists for `locale`
    pub fn has_locale(&self, locale: &str) -> bool {
        self.get(locale).is_some_and(|text| !text.is_empty())
    }

    /// Overlay `other` on top of this value, locale by locale
    pub fn merge(&mut self, other: &LocalizedText) {
        for (locale, text) in &other.0 {
            self.0.insert(locale.clone(), text.clone());
        }
    }

    /// Locales present in this value
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Source of the locales settings are written in
pub trait TranslationProvider: Send + Sync {
    /// Locale every localized setting must be filled for
    fn default_locale(&self) -> &str;

    /// Locales a localized setting may carry
    fn available_locales(&self) -> &[String];

    fn is_available(&self, locale: &str) -> bool {
        self.available_locales().iter().any(|l| l == locale)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalizedText {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
