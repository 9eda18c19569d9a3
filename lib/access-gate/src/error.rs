//! Gate configuration errors.
//!
//! Every variant is raised while gates are being bound to fields, before any
//! request is served. Denying a caller is never an error.

use std::fmt;

use crate::directive::{DIRECTIVE_NAME, REQUIRED_ROLE_ARGUMENT};

/// A gate was bound without a usable configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The `requiredRole` argument was not supplied.
    MissingRequiredRole,
    /// The `requiredRole` argument was empty or only whitespace.
    EmptyRequiredRole,
    /// A field coordinate was not of the form `Type.field`.
    InvalidFieldCoordinate { input: String },
    /// The field already has a gate attached.
    DuplicateAttachment { field: String },
    /// The field is not one the schema protects.
    UnknownField { field: String },
    /// Binding a gate to a specific field failed.
    AtField { field: String, reason: String },
}

impl ConfigurationError {
    /// Wraps this error with the field it was raised for.
    #[must_use]
    pub fn at_field(self, field: impl fmt::Display) -> Self {
        Self::AtField {
            field: field.to_string(),
            reason: self.to_string(),
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequiredRole => {
                write!(
                    f,
                    "missing argument '{REQUIRED_ROLE_ARGUMENT}' for directive '@{DIRECTIVE_NAME}'"
                )
            }
            Self::EmptyRequiredRole => {
                write!(
                    f,
                    "argument '{REQUIRED_ROLE_ARGUMENT}' for directive '@{DIRECTIVE_NAME}' is empty"
                )
            }
            Self::InvalidFieldCoordinate { input } => {
                write!(f, "invalid field coordinate '{input}', expected 'Type.field'")
            }
            Self::DuplicateAttachment { field } => {
                write!(f, "field '{field}' already has '@{DIRECTIVE_NAME}' attached")
            }
            Self::UnknownField { field } => {
                write!(f, "field '{field}' is not a protected field")
            }
            Self::AtField { field, reason } => {
                write!(f, "invalid '@{DIRECTIVE_NAME}' on '{field}': {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}
