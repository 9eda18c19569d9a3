//! User domain type.
//!
//! A User is a registered account that can hold access tokens. Its role set
//! is read at authentication time to build the request's [`Caller`].
//!
//! [`Caller`]: crate::caller::Caller

use chrono::{DateTime, Utc};
use fieldgate_core::UserId;
use serde::{Deserialize, Serialize};

use crate::role::RoleSet;

/// A registered user of the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Internal platform user ID.
    id: UserId,
    /// Display name.
    name: String,
    /// Email address, unique per user by convention of the user store.
    email: String,
    /// Roles assigned to the user.
    roles: RoleSet,
    /// When the user record was created.
    created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user without roles.
    ///
    /// The user ID is generated automatically.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            roles: RoleSet::none(),
            created_at: Utc::now(),
        }
    }

    /// Sets the initial roles.
    #[must_use]
    pub fn with_roles(mut self, roles: RoleSet) -> Self {
        self.roles = roles;
        self
    }

    /// Returns the user's internal platform ID.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the user's roles.
    #[must_use]
    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    /// Returns true if the user holds the named role.
    #[must_use]
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.contains(name)
    }

    /// Returns when the user was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
