//! Default settings for new content blocks
//!
//! Fields with an explicit default get it. Required fields without one get a
//! placeholder so a freshly placed block renders something: titles use the
//! manifest's public name, rich text bodies are wrapped in `<p>`, link targets
//! point at the site root.

use crate::core::localized::{LocalizedText, TranslationProvider};
use crate::core::manifest::ManifestSchema;
use crate::core::parameter::{FieldSpec, FieldType, SettingValue, Settings};

/// Link target used for required URL fields
pub const PLACEHOLDER_URL: &str = "/";

/// Build the initial settings of a block of `schema`
pub fn default_settings(schema: &ManifestSchema, translations: &dyn TranslationProvider) -> Settings {
    let mut settings = Settings::new();

    for field in &schema.fields {
        let value = match &field.default_value {
            Some(value) => Some(value.clone()),
            None if field.required => placeholder(schema, field, translations),
            None => None,
        };

        if let Some(value) = value {
            settings.insert(field.name.as_str(), value);
        }
    }

    settings
}

fn placeholder(
    schema: &ManifestSchema,
    field: &FieldSpec,
    translations: &dyn TranslationProvider,
) -> Option<SettingValue> {
    let locales = translations.available_locales().iter().map(String::as_str);
    let label = if field.name == "title" {
        schema.public_name.clone()
    } else {
        humanize(&field.name)
    };

    let value = match field.field_type {
        FieldType::LocalizedText => LocalizedText::literal(locales, &label).into(),
        FieldType::LocalizedRichText => LocalizedText::wrapped(locales, "<p>", "</p>", &label).into(),
        FieldType::LocalizedUrl => LocalizedText::literal(locales, PLACEHOLDER_URL).into(),
        FieldType::Text => SettingValue::Text(label),
        FieldType::Icon => SettingValue::Text(field.constraints.allowed_values.as_ref()?.first()?.clone()),
        FieldType::Integer => SettingValue::Integer(field.constraints.min.unwrap_or(0)),
        FieldType::TextList => SettingValue::List(Vec::new()),
    };

    Some(value)
}

/// `link_text_1` -> `Link text 1`
fn humanize(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
