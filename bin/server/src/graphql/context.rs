//! Per-request GraphQL context.

use fieldgate_access_gate::FieldGates;
use fieldgate_platform_access::{AuthService, Caller};
use juniper::{FieldError, FieldResult};
use std::future::Future;
use std::sync::Arc;

use crate::error::internal_error;

/// GraphQL request context
///
/// Carries the request's caller and the shared services resolvers need.
pub struct GraphQLContext {
    pub caller: Option<Caller>,
    pub auth: AuthService,
    pub gates: Arc<FieldGates>,
}

impl juniper::Context for GraphQLContext {}

impl GraphQLContext {
    pub fn new(caller: Option<Caller>, auth: AuthService, gates: Arc<FieldGates>) -> Self {
        Self {
            caller,
            auth,
            gates,
        }
    }

    /// Resolves a protected field through its gate.
    ///
    /// Denied callers get `None` and `resolve` never runs. A field with no
    /// bound gate fails instead of resolving unprotected.
    pub async fn gated<T, F, Fut>(
        &self,
        type_name: &str,
        field_name: &str,
        resolve: F,
    ) -> FieldResult<Option<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FieldResult<T>>,
    {
        let gate = self.gates.gate(type_name, field_name).ok_or_else(|| {
            internal_error(
                "protected field has no gate",
                format!("{type_name}.{field_name}"),
            )
        })?;
        gate.evaluate_async(self.caller.as_ref(), resolve).await
    }

    /// Returns the caller, or a "Not Authenticated" error.
    pub fn require_caller(&self) -> FieldResult<&Caller> {
        self.caller.as_ref().ok_or_else(not_authenticated)
    }
}

pub(super) fn not_authenticated() -> FieldError {
    FieldError::new("Not Authenticated", juniper::Value::null())
}
