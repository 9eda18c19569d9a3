//! GraphQL schema definition.

use super::context::{GraphQLContext, not_authenticated};
use fieldgate_access_gate::{
    CAN_ACCESS_DEFINITION, CanAccess, ConfigurationError, FieldCoordinate, FieldGates,
};
use fieldgate_platform_access::{AuthenticationError, LogoutOutcome, Role, User};
use juniper::{EmptySubscription, FieldResult, RootNode};
use rootcause::Report;
use std::collections::HashSet;

use crate::error::internal_error;

const QUERY: &str = "Query";

/// The account behind a request.
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct Viewer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
    /// Registration time, RFC 3339.
    pub created_at: String,
}

impl From<&User> for Viewer {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            roles: user.roles().names().map(str::to_string).collect(),
            created_at: user.created_at().to_rfc3339(),
        }
    }
}

/// Platform-wide counts for administrators.
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct AdminReport {
    pub users: i32,
    pub active_tokens: i32,
}

/// Result of a logout.
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct LogoutResponse {
    pub status: String,
    pub message: String,
}

impl From<LogoutOutcome> for LogoutResponse {
    fn from(outcome: LogoutOutcome) -> Self {
        Self {
            status: outcome.status,
            message: outcome.message,
        }
    }
}

fn count(n: usize) -> FieldResult<i32> {
    i32::try_from(n).map_err(|e| internal_error("count out of range", e))
}

pub struct Query;

#[juniper::graphql_object(context = GraphQLContext)]
impl Query {
    /// The authenticated account, or null for anonymous requests.
    async fn viewer(ctx: &GraphQLContext) -> FieldResult<Option<Viewer>> {
        let Some(caller) = ctx.caller.as_ref() else {
            return Ok(None);
        };
        let user = ctx
            .auth
            .find_user(caller.user_id())
            .await
            .map_err(|e| internal_error("failed to load viewer", e))?;
        Ok(user.as_ref().map(Viewer::from))
    }

    /// Platform counts (requires the admin role)
    async fn admin_report(ctx: &GraphQLContext) -> FieldResult<Option<AdminReport>> {
        ctx.gated(QUERY, "adminReport", || async move {
            let users = ctx
                .auth
                .list_users()
                .await
                .map_err(|e| internal_error("failed to list users", e))?;
            let tokens = ctx
                .auth
                .count_usable_tokens()
                .await
                .map_err(|e| internal_error("failed to count tokens", e))?;
            Ok(AdminReport {
                users: count(users.len())?,
                active_tokens: count(tokens)?,
            })
        })
        .await
    }

    /// All registered accounts (requires the admin role)
    async fn users(ctx: &GraphQLContext) -> FieldResult<Option<Vec<Viewer>>> {
        ctx.gated(QUERY, "users", || async move {
            let users = ctx
                .auth
                .list_users()
                .await
                .map_err(|e| internal_error("failed to list users", e))?;
            Ok(users.iter().map(Viewer::from).collect())
        })
        .await
    }
}

pub struct Mutation;

#[juniper::graphql_object(context = GraphQLContext)]
impl Mutation {
    /// Revoke the token used for this request.
    async fn logout(ctx: &GraphQLContext) -> FieldResult<LogoutResponse> {
        let caller = ctx.require_caller()?;
        let outcome = ctx.auth.logout(caller).await.map_err(|e| {
            match e.current_context() {
                AuthenticationError::NotAuthenticated
                | AuthenticationError::TokenNotFound { .. } => not_authenticated(),
                _ => internal_error("logout failed", &e),
            }
        })?;
        Ok(outcome.into())
    }
}

pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<GraphQLContext>>;

pub fn create_schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}

/// Renders the schema as SDL, including the `@canAccess` definition.
pub fn schema_sdl(schema: &Schema) -> String {
    format!("{CAN_ACCESS_DEFINITION}\n\n{}", schema.as_sdl())
}

/// `@canAccess` attachments declared by the schema.
pub fn protected_fields() -> Vec<CanAccess> {
    vec![
        CanAccess::new(FieldCoordinate::new(QUERY, "adminReport"), Role::ADMIN),
        CanAccess::new(FieldCoordinate::new(QUERY, "users"), Role::ADMIN),
    ]
}

/// Binds a gate to every protected field, applying configured overrides.
///
/// # Errors
///
/// Fails if an override names an unprotected field or repeats a field, or
/// if any resulting gate has a missing or empty role.
pub fn build_field_gates(overrides: &[CanAccess]) -> Result<FieldGates, Report<ConfigurationError>> {
    let mut declarations = protected_fields();
    let mut overridden = HashSet::new();

    for o in overrides {
        if !overridden.insert(o.field.clone()) {
            return Err(ConfigurationError::DuplicateAttachment {
                field: o.field.to_string(),
            }
            .into());
        }
        let slot = declarations
            .iter_mut()
            .find(|d| d.field == o.field)
            .ok_or_else(|| ConfigurationError::UnknownField {
                field: o.field.to_string(),
            })?;
        *slot = o.clone();
    }

    Ok(FieldGates::builder().attach_all(declarations)?.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(s: &str) -> FieldCoordinate {
        s.parse().expect("valid coordinate")
    }

    #[test]
    fn sdl_declares_directive_and_fields() {
        let sdl = schema_sdl(&create_schema());

        assert!(sdl.starts_with(CAN_ACCESS_DEFINITION));
        assert!(sdl.contains("adminReport: AdminReport"));
        assert!(sdl.contains("activeTokens"));
        assert!(sdl.contains("logout"));
    }

    #[test]
    fn every_protected_field_gets_a_gate() {
        let gates = build_field_gates(&[]).unwrap();

        assert_eq!(gates.len(), protected_fields().len());
        for decl in protected_fields() {
            let gate = gates
                .gate(decl.field.type_name(), decl.field.field_name())
                .expect("gate bound");
            assert_eq!(gate.required_role().as_str(), Role::ADMIN);
        }
        assert!(gates.gate(QUERY, "viewer").is_none());
    }

    #[test]
    fn override_changes_required_role() {
        let gates = build_field_gates(&[CanAccess::new(field("Query.users"), "auditor")]).unwrap();

        assert_eq!(
            gates.gate(QUERY, "users").map(|g| g.required_role().as_str()),
            Some("auditor")
        );
        assert_eq!(
            gates
                .gate(QUERY, "adminReport")
                .map(|g| g.required_role().as_str()),
            Some(Role::ADMIN)
        );
    }

    #[test]
    fn override_for_unknown_field_fails() {
        let err = build_field_gates(&[CanAccess::new(field("Query.viewer"), "admin")]).unwrap_err();

        assert_eq!(
            err.current_context(),
            &ConfigurationError::UnknownField {
                field: "Query.viewer".to_string()
            }
        );
    }

    #[test]
    fn override_with_empty_role_fails() {
        let err = build_field_gates(&[CanAccess::new(field("Query.users"), "")]).unwrap_err();

        assert_eq!(
            err.current_context(),
            &ConfigurationError::EmptyRequiredRole.at_field("Query.users")
        );
    }

    #[test]
    fn override_without_role_fails() {
        let overrides = [CanAccess {
            field: field("Query.adminReport"),
            required_role: None,
        }];

        let err = build_field_gates(&overrides).unwrap_err();

        assert_eq!(
            err.current_context(),
            &ConfigurationError::MissingRequiredRole.at_field("Query.adminReport")
        );
    }

    #[test]
    fn repeated_override_fails() {
        let overrides = [
            CanAccess::new(field("Query.users"), "auditor"),
            CanAccess::new(field("Query.users"), "admin"),
        ];

        let err = build_field_gates(&overrides).unwrap_err();

        assert_eq!(
            err.current_context(),
            &ConfigurationError::DuplicateAttachment {
                field: "Query.users".to_string()
            }
        );
    }
}
