//! The acting identity of a single request.
//!
//! A `Caller` is built by [`AuthService::authenticate`] once per request and
//! handed to resolvers explicitly. Absence of a caller (`Option::None`) means
//! the request is unauthenticated.
//!
//! [`AuthService::authenticate`]: crate::service::AuthService::authenticate

use fieldgate_core::{TokenId, UserId};

use crate::role::RoleSet;
use crate::user::User;

/// Authenticated identity for one request.
///
/// Read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    user_id: UserId,
    roles: RoleSet,
    token_id: Option<TokenId>,
}

impl Caller {
    /// Creates a caller with the given identity and roles.
    #[must_use]
    pub fn new(user_id: UserId, roles: RoleSet) -> Self {
        Self {
            user_id,
            roles,
            token_id: None,
        }
    }

    /// Creates a caller for a user's current role set.
    #[must_use]
    pub fn for_user(user: &User) -> Self {
        Self::new(user.id(), user.roles().clone())
    }

    /// Records the access token the request authenticated with.
    #[must_use]
    pub fn with_token(mut self, token_id: TokenId) -> Self {
        self.token_id = Some(token_id);
        self
    }

    /// Returns the caller's user ID.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the caller's roles.
    #[must_use]
    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    /// Returns true if the caller holds the named role.
    #[must_use]
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.contains(name)
    }

    /// Returns true if the caller holds the administrator role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.is_admin()
    }

    /// Returns the token the request authenticated with, if any.
    #[must_use]
    pub fn token_id(&self) -> Option<TokenId> {
        self.token_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_for_user_copies_roles() {
        let user = User::new("Alice", "alice@example.com")
            .with_roles(RoleSet::from_names(["admin", "editor"]));

        let caller = Caller::for_user(&user);

        assert_eq!(caller.user_id(), user.id());
        assert!(caller.has_role("admin"));
        assert!(caller.has_role("editor"));
        assert!(caller.is_admin());
        assert!(caller.token_id().is_none());
    }

    #[test]
    fn caller_without_roles() {
        let caller = Caller::new(UserId::new(), RoleSet::none());
        assert!(!caller.has_role("admin"));
        assert!(!caller.is_admin());
    }

    #[test]
    fn caller_with_token() {
        let token_id = TokenId::new();
        let caller = Caller::new(UserId::new(), RoleSet::none()).with_token(token_id);
        assert_eq!(caller.token_id(), Some(token_id));
    }
}
