//! Error types for the platform-access crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `StoreError`: Failures of a user or token store
//! - `AuthenticationError`: Failures of token issue and logout operations
//!
//! Presenting an unknown, revoked, or expired token is not an error: it
//! authenticates to no caller.

use fieldgate_core::{TokenId, UserId};
use std::fmt;

/// Errors from user and token stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A record with this key already exists.
    Conflict { key: String },
    /// The backing store could not be reached or failed the operation.
    Unavailable { reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict { key } => write!(f, "record already exists: {key}"),
            Self::Unavailable { reason } => write!(f, "store unavailable: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Errors from authentication operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// The operation needs an authenticated caller holding a token.
    NotAuthenticated,
    /// User not found.
    UserNotFound { user_id: UserId },
    /// Token not found.
    TokenNotFound { token_id: TokenId },
    /// A store operation failed.
    Store { reason: String },
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "not authenticated"),
            Self::UserNotFound { user_id } => write!(f, "user not found: {user_id}"),
            Self::TokenNotFound { token_id } => write!(f, "token not found: {token_id}"),
            Self::Store { reason } => write!(f, "authentication store error: {reason}"),
        }
    }
}

impl std::error::Error for AuthenticationError {}

impl From<StoreError> for AuthenticationError {
    fn from(err: StoreError) -> Self {
        Self::Store {
            reason: err.to_string(),
        }
    }
}
