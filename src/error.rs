//! Error types for skillboard

use serde::Serialize;
use thiserror::Error;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum SkillboardError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        details: Vec<FieldError>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SkillboardError {
    pub fn not_found(entity: &'static str, key: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Invalid input with a single offending field
    pub fn invalid_field(
        message: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details: vec![FieldError::new(field, reason)],
        }
    }

    /// Invalid input collected from a validation pass
    pub fn invalid(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Field-level details, empty for anything but `InvalidInput`
    pub fn details(&self) -> &[FieldError] {
        match self {
            Self::InvalidInput { details, .. } => details,
            _ => &[],
        }
    }
}

/// Result type alias for skillboard operations
pub type Result<T> = std::result::Result<T, SkillboardError>;
