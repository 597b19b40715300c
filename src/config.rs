//! Store settings: key sets, defaults, and validation.

use std::collections::HashSet;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::key::{
    LocaleKey,
    NamespaceKey,
};

/// One invalid field in a settings document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid setting '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "namespaces[2]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// Failure to obtain usable settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Settings validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Renders validation errors as a numbered list for the error message.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Declarative description of a translation store's key sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettings {
    /// Namespaces the store manages, in declaration order.
    pub namespaces: Vec<NamespaceKey>,

    /// Locales each namespace can load, in declaration order.
    pub locales: Vec<LocaleKey>,

    /// Locale to prefer when the caller does not name one.
    /// If set, it must appear in `locales`.
    pub default_locale: Option<LocaleKey>,
}

impl StoreSettings {
    /// # Errors
    /// - A namespace or locale key is empty
    /// - A namespace or locale key is listed more than once
    /// - `defaultLocale` names a locale missing from `locales`
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        check_keys(&mut errors, "namespaces", self.namespaces.iter().map(NamespaceKey::as_str));
        check_keys(&mut errors, "locales", self.locales.iter().map(LocaleKey::as_str));

        if let Some(default_locale) = &self.default_locale
            && !self.locales.contains(default_locale)
        {
            errors.push(ValidationError::new(
                "defaultLocale",
                format!("Locale '{default_locale}' is not listed in 'locales'"),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Parses and validates settings from a JSON document.
    ///
    /// # Errors
    /// [`ConfigError::Parse`] when the document does not deserialize;
    /// [`ConfigError::Validation`] when the parsed settings are invalid.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate().map_err(ConfigError::Validation)?;
        Ok(settings)
    }
}

/// Reports empty and repeated keys in one list field.
#[allow(single_use_lifetimes)] // impl Trait cannot elide this lifetime (E0658)
fn check_keys<'k>(
    errors: &mut Vec<ValidationError>,
    field: &str,
    keys: impl Iterator<Item = &'k str>,
) {
    let mut seen = HashSet::new();
    for (index, key) in keys.enumerate() {
        if key.is_empty() {
            errors.push(ValidationError::new(
                format!("{field}[{index}]"),
                "Keys cannot be empty",
            ));
        } else if !seen.insert(key) {
            errors.push(ValidationError::new(
                format!("{field}[{index}]"),
                format!("Key '{key}' is listed more than once"),
            ));
        }
    }
}
