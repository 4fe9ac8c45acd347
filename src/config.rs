//! Configuration for the content block service
//!
//! Settings can be built in code or read from TOML:
//!
//! ```toml
//! default_locale = "en"
//! available_locales = ["en", "ca", "es"]
//! validate_urls = true
//! max_image_bytes = 10485760
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::localized::TranslationProvider;

/// Default upload limit for images (10 MiB)
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Locale every localized setting must be filled for
    pub default_locale: String,
    /// Locales a localized setting may carry
    pub available_locales: Vec<String>,
    /// Reject malformed link URLs
    pub validate_urls: bool,
    /// Largest accepted image upload, in bytes
    pub max_image_bytes: u64,
}

impl Configuration {
    /// Create a configuration with defaults (English only)
    pub fn new() -> Self {
        Self {
            default_locale: "en".to_string(),
            available_locales: vec!["en".to_string()],
            validate_urls: true,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    /// Set the locales; the first one becomes the default
    pub fn with_locales<I, S>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available_locales = locales.into_iter().map(Into::into).collect();
        if let Some(first) = self.available_locales.first() {
            self.default_locale = first.clone();
        }
        self
    }

    /// Set the default locale
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    /// Turn URL validation on or off
    pub fn with_url_validation(mut self, enabled: bool) -> Self {
        self.validate_urls = enabled;
        self
    }

    /// Set the image upload limit
    pub fn with_max_image_bytes(mut self, bytes: u64) -> Self {
        self.max_image_bytes = bytes;
        self
    }

    /// Parse and validate TOML configuration
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Configuration = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.available_locales.is_empty() {
            return Err(ConfigError::Invalid("available_locales cannot be empty".into()));
        }
        if !self.available_locales.contains(&self.default_locale) {
            return Err(ConfigError::Invalid(format!(
                "default_locale '{}' is not among available_locales",
                self.default_locale
            )));
        }
        if self.max_image_bytes == 0 {
            return Err(ConfigError::Invalid("max_image_bytes must be positive".into()));
        }
        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationProvider for Configuration {
    fn default_locale(&self) -> &str {
        &self.default_locale
    }

    fn available_locales(&self) -> &[String] {
        &self.available_locales
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
