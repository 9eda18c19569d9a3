//! Request authentication and shared server state.
//!
//! Requests authenticate with `Authorization: Bearer <secret>`. The secret is
//! resolved to a [`Caller`](fieldgate_platform_access::Caller) once per
//! request and handed to resolvers through the GraphQL context; field gates
//! read it from there.
//!
//! A missing, malformed, unknown, revoked, or expired token is not an error:
//! the request proceeds anonymously and gated fields resolve to null.

pub mod middleware;

use fieldgate_access_gate::FieldGates;
use fieldgate_platform_access::AuthService;
use std::sync::Arc;

use crate::graphql::Schema;

pub use middleware::{AuthRejection, BearerCaller};

/// Shared application state.
pub struct AppState {
    /// Authentication service.
    pub auth: AuthService,
    /// Gates bound to protected schema fields.
    pub gates: Arc<FieldGates>,
    /// The GraphQL schema.
    pub schema: Arc<Schema>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(auth: AuthService, gates: FieldGates, schema: Schema) -> Self {
        Self {
            auth,
            gates: Arc::new(gates),
            schema: Arc::new(schema),
        }
    }
}
