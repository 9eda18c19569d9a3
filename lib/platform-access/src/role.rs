//! Role types for platform access control.
//!
//! Roles are plain names assigned to users (`"admin"`, `"editor"`, ...).
//! Field gates compare a required role name against the caller's role set
//! by exact, case-sensitive match.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named role assigned to a user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Name of the administrator role.
    pub const ADMIN: &'static str = "admin";

    /// Creates a role from its name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates the administrator role.
    #[must_use]
    pub fn admin() -> Self {
        Self::new(Self::ADMIN)
    }

    /// Returns the role name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this is the administrator role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0 == Self::ADMIN
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Set of roles assigned to a user.
///
/// Insertion order is kept and duplicates are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet {
    roles: Vec<Role>,
}

impl RoleSet {
    /// Creates an empty role set.
    #[must_use]
    pub fn none() -> Self {
        Self { roles: Vec::new() }
    }

    /// Creates a role set from role names, dropping duplicates.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::none();
        for name in names {
            set.insert(Role::new(name));
        }
        set
    }

    /// Adds a role. Returns false if it was already present.
    pub fn insert(&mut self, role: Role) -> bool {
        if self.roles.contains(&role) {
            return false;
        }
        self.roles.push(role);
        true
    }

    /// Returns true if the set holds a role with exactly this name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.as_str() == name)
    }

    /// Returns true if the set holds the administrator role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(Role::is_admin)
    }

    /// Returns true if no roles are assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Returns the roles as a slice.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Returns the role names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(Role::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_names(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_is_admin() {
        assert!(Role::admin().is_admin());
        assert!(!Role::new("editor").is_admin());
        assert!(!Role::new("Admin").is_admin());
    }

    #[test]
    fn role_set_none_is_empty() {
        let roles = RoleSet::none();
        assert!(roles.is_empty());
        assert!(!roles.is_admin());
        assert!(!roles.contains("admin"));
    }

    #[test]
    fn from_names_drops_duplicates() {
        let roles = RoleSet::from_names(["editor", "admin", "editor"]);
        assert_eq!(roles.roles().len(), 2);
        assert_eq!(roles.names().collect::<Vec<_>>(), vec!["editor", "admin"]);
    }

    #[test]
    fn contains_is_exact_and_case_sensitive() {
        let roles: RoleSet = ["admin", "editor"].into_iter().collect();
        assert!(roles.contains("admin"));
        assert!(roles.contains("editor"));
        assert!(!roles.contains("ADMIN"));
        assert!(!roles.contains("admin "));
        assert!(!roles.contains(""));
    }

    #[test]
    fn insert_reports_new_roles() {
        let mut roles = RoleSet::none();
        assert!(roles.insert(Role::new("editor")));
        assert!(!roles.insert(Role::new("editor")));
        assert!(roles.insert(Role::admin()));
        assert!(roles.is_admin());
    }

    #[test]
    fn role_set_serializes_as_name_list() {
        let roles = RoleSet::from_names(["admin", "editor"]);
        let json = serde_json::to_string(&roles).expect("serialize");
        assert_eq!(json, r#"["admin","editor"]"#);
        let parsed: RoleSet = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(roles, parsed);
    }
}
