//! Model version domain entity
//!
//! A registered version of a named model. Versions are immutable once
//! registered and unique per model name.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Maximum length of a version label
pub const MAX_VERSION_LEN: usize = 64;

/// Maximum length of a version description
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Unique identifier for a model version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelVersionId(pub Uuid);

impl ModelVersionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ModelVersionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ModelVersionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered model version
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelVersion {
    pub id: ModelVersionId,
    pub model_name: String,
    pub version: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data needed to register a new model version
#[derive(Debug, Clone)]
pub struct NewModelVersion {
    pub model_name: String,
    pub version: String,
    pub description: Option<String>,
}

impl NewModelVersion {
    /// Check name, version and description against the registry rules
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_model_name(&self.model_name)?;
        validate_version(&self.version)?;
        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(DomainError::Validation(format!(
                    "Description must be at most {} characters",
                    MAX_DESCRIPTION_LEN
                )));
            }
        }
        Ok(())
    }
}

fn model_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,127}$").expect("model name pattern is valid")
    })
}

/// Validate a model name.
///
/// Names start with an alphanumeric character, followed by up to 127
/// alphanumerics, dots, underscores or dashes.
pub fn validate_model_name(name: &str) -> Result<(), DomainError> {
    if model_name_pattern().is_match(name) {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "Invalid model name '{}': use 1-128 characters from [A-Za-z0-9._-], starting with a letter or digit",
            name
        )))
    }
}

/// Validate a version label: 1..=64 characters, no whitespace
pub fn validate_version(version: &str) -> Result<(), DomainError> {
    if version.is_empty() || version.chars().count() > MAX_VERSION_LEN {
        return Err(DomainError::Validation(format!(
            "Version must be between 1 and {} characters",
            MAX_VERSION_LEN
        )));
    }
    if version.chars().any(char::is_whitespace) {
        return Err(DomainError::Validation(format!(
            "Version '{}' must not contain whitespace",
            version
        )));
    }
    Ok(())
}
