//! Server error types.
//!
//! `StartupError` covers everything that can stop the server from coming up.
//! Resolver failures are logged in full and reported to clients with a
//! generic message through [`internal_error`].

use juniper::FieldError;
use std::fmt;
use tracing::error;

/// Errors raised while starting the server.
#[derive(Debug)]
pub enum StartupError {
    /// Configuration could not be loaded.
    Config { details: String },
    /// A gate on a schema field was misconfigured.
    Gates { details: String },
    /// A seeded account could not be provisioned.
    Seed { email: String, details: String },
    /// The listener could not be bound.
    Bind { address: String, details: String },
    /// The server stopped with an error.
    Serve { details: String },
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { details } => write!(f, "failed to load configuration: {details}"),
            Self::Gates { details } => write!(f, "invalid field gates: {details}"),
            Self::Seed { email, details } => {
                write!(f, "failed to provision user '{email}': {details}")
            }
            Self::Bind { address, details } => {
                write!(f, "failed to bind to '{address}': {details}")
            }
            Self::Serve { details } => write!(f, "server error: {details}"),
        }
    }
}

impl std::error::Error for StartupError {}

/// Logs `err` and returns a client-safe field error.
pub fn internal_error(context: &str, err: impl fmt::Display) -> FieldError {
    error!(error = %err, "{context}");
    FieldError::new("Internal server error", juniper::Value::null())
}
