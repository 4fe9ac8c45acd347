//! Content block runtime
//!
//! This module provides the service that instantiates and edits content
//! blocks, the settings validator and default settings generation.

pub mod defaults;
pub mod service;
pub mod validation;

pub use service::ContentBlockService;
pub use validation::SettingsValidator;
