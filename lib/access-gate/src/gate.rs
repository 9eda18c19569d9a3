//! Role-based gating of field resolution.
//!
//! A gate is configured once, when the schema is built, with the role a
//! caller must hold. At request time it decides whether to run the wrapped
//! resolution:
//!
//! 1. No caller (unauthenticated): deny.
//! 2. Caller lacks the required role: deny.
//! 3. Otherwise: run the resolution and return its result untouched.
//!
//! A denial is a value, not an error. The field resolves to "no data", the
//! same shape as a field that legitimately has no value, so callers cannot
//! tell "not logged in" from "wrong role" from "nothing there".
//!
//! Gates hold no mutable state and may be shared freely across tasks.

use fieldgate_platform_access::{Caller, Role};
use rootcause::Report;
use std::future::Future;

use crate::error::ConfigurationError;

/// Why a gate denied a caller.
///
/// Only visible in-process; it never reaches the resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// The request has no authenticated caller.
    Unauthenticated,
    /// The caller does not hold the required role.
    MissingRole,
}

/// Outcome of checking a caller against a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Run the resolution.
    Permit,
    /// Suppress the resolution.
    Deny(Denial),
}

/// The required role bound to one gated field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfiguration {
    required_role: Role,
}

impl GateConfiguration {
    /// Validates and binds a required role.
    ///
    /// # Errors
    ///
    /// `MissingRequiredRole` if `required_role` is `None`, and
    /// `EmptyRequiredRole` if it is empty or only whitespace.
    pub fn configure(required_role: Option<&str>) -> Result<Self, Report<ConfigurationError>> {
        let name = required_role.ok_or(ConfigurationError::MissingRequiredRole)?;
        if name.trim().is_empty() {
            return Err(ConfigurationError::EmptyRequiredRole.into());
        }
        Ok(Self {
            required_role: Role::new(name),
        })
    }

    /// Returns the role a caller must hold.
    #[must_use]
    pub fn required_role(&self) -> &Role {
        &self.required_role
    }
}

/// Checks a caller against a gate configuration.
///
/// Authentication is checked before the role.
#[must_use]
pub fn check(caller: Option<&Caller>, config: &GateConfiguration) -> Decision {
    match caller {
        None => Decision::Deny(Denial::Unauthenticated),
        Some(caller) if !caller.has_role(config.required_role.as_str()) => {
            Decision::Deny(Denial::MissingRole)
        }
        Some(_) => Decision::Permit,
    }
}

/// Runs `resolve` only if the caller passes the gate.
///
/// Returns `Ok(None)` on denial without calling `resolve`. Otherwise
/// `resolve` is called exactly once and its error, if any, is returned
/// verbatim.
pub fn evaluate<T, E, F>(
    caller: Option<&Caller>,
    config: &GateConfiguration,
    resolve: F,
) -> Result<Option<T>, E>
where
    F: FnOnce() -> Result<T, E>,
{
    match check(caller, config) {
        Decision::Permit => resolve().map(Some),
        Decision::Deny(_) => Ok(None),
    }
}

/// Async form of [`evaluate`].
///
/// The resolution future is only created when the gate permits, and is
/// awaited in place with no timeout or retry.
pub async fn evaluate_async<T, E, F, Fut>(
    caller: Option<&Caller>,
    config: &GateConfiguration,
    resolve: F,
) -> Result<Option<T>, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    match check(caller, config) {
        Decision::Permit => resolve().await.map(Some),
        Decision::Deny(_) => Ok(None),
    }
}

/// A configured gate for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGate {
    config: GateConfiguration,
}

impl AccessGate {
    /// Wraps a validated configuration.
    #[must_use]
    pub fn new(config: GateConfiguration) -> Self {
        Self { config }
    }

    /// Validates a required role and builds a gate for it.
    ///
    /// # Errors
    ///
    /// See [`GateConfiguration::configure`].
    pub fn configure(required_role: Option<&str>) -> Result<Self, Report<ConfigurationError>> {
        GateConfiguration::configure(required_role).map(Self::new)
    }

    /// Returns the gate's configuration.
    #[must_use]
    pub fn config(&self) -> &GateConfiguration {
        &self.config
    }

    /// Returns the role a caller must hold.
    #[must_use]
    pub fn required_role(&self) -> &Role {
        self.config.required_role()
    }

    /// See [`check`].
    #[must_use]
    pub fn check(&self, caller: Option<&Caller>) -> Decision {
        check(caller, &self.config)
    }

    /// See [`evaluate`].
    pub fn evaluate<T, E, F>(&self, caller: Option<&Caller>, resolve: F) -> Result<Option<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        evaluate(caller, &self.config, resolve)
    }

    /// See [`evaluate_async`].
    pub async fn evaluate_async<T, E, F, Fut>(
        &self,
        caller: Option<&Caller>,
        resolve: F,
    ) -> Result<Option<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        evaluate_async(caller, &self.config, resolve).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldgate_core::UserId;
    use fieldgate_platform_access::RoleSet;
    use std::cell::Cell;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn caller_with(roles: &[&str]) -> Caller {
        Caller::new(UserId::new(), RoleSet::from_names(roles.iter().copied()))
    }

    fn admin_gate() -> GateConfiguration {
        GateConfiguration::configure(Some("admin")).expect("valid role")
    }

    #[test]
    fn configure_accepts_role_name() {
        let config = GateConfiguration::configure(Some("admin")).unwrap();
        assert_eq!(config.required_role().as_str(), "admin");
    }

    #[test]
    fn configure_rejects_missing_role() {
        let err = GateConfiguration::configure(None).unwrap_err();
        assert_eq!(
            err.current_context(),
            &ConfigurationError::MissingRequiredRole
        );
    }

    #[test]
    fn configure_rejects_empty_role() {
        let err = GateConfiguration::configure(Some("")).unwrap_err();
        assert_eq!(err.current_context(), &ConfigurationError::EmptyRequiredRole);

        let err = GateConfiguration::configure(Some("  \t")).unwrap_err();
        assert_eq!(err.current_context(), &ConfigurationError::EmptyRequiredRole);
    }

    #[test]
    fn configure_keeps_role_name_verbatim() {
        let config = GateConfiguration::configure(Some("Admin")).unwrap();
        assert_eq!(config.required_role().as_str(), "Admin");
        assert!(check(Some(&caller_with(&["admin"])), &config) != Decision::Permit);
    }

    #[test]
    fn unauthenticated_caller_is_denied_without_resolving() {
        let called = Cell::new(false);

        let result: Result<Option<&str>, ()> = evaluate(None, &admin_gate(), || {
            called.set(true);
            Ok("secret")
        });

        assert_eq!(result, Ok(None));
        assert!(!called.get());
        assert_eq!(
            check(None, &admin_gate()),
            Decision::Deny(Denial::Unauthenticated)
        );
    }

    #[test]
    fn caller_without_roles_is_denied_without_resolving() {
        let caller = caller_with(&[]);
        let called = Cell::new(false);

        let result: Result<Option<&str>, ()> = evaluate(Some(&caller), &admin_gate(), || {
            called.set(true);
            Ok("secret")
        });

        assert_eq!(result, Ok(None));
        assert!(!called.get());
    }

    #[test]
    fn caller_with_other_role_is_denied() {
        let caller = caller_with(&["editor"]);
        let called = Cell::new(false);

        let result: Result<Option<&str>, ()> = evaluate(Some(&caller), &admin_gate(), || {
            called.set(true);
            Ok("secret")
        });

        assert_eq!(result, Ok(None));
        assert!(!called.get());
        assert_eq!(
            check(Some(&caller), &admin_gate()),
            Decision::Deny(Denial::MissingRole)
        );
    }

    #[test]
    fn caller_with_role_resolves_once() {
        let caller = caller_with(&["admin", "editor"]);
        let calls = Cell::new(0);

        let result: Result<Option<&str>, ()> = evaluate(Some(&caller), &admin_gate(), || {
            calls.set(calls.get() + 1);
            Ok("secret")
        });

        assert_eq!(result, Ok(Some("secret")));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn resolver_errors_pass_through_unchanged() {
        #[derive(Debug, PartialEq)]
        struct DownstreamFailure(&'static str);

        let caller = caller_with(&["admin"]);

        let result: Result<Option<()>, _> = evaluate(Some(&caller), &admin_gate(), || {
            Err(DownstreamFailure("database offline"))
        });

        assert_eq!(result, Err(DownstreamFailure("database offline")));
    }

    #[test]
    fn resolver_none_is_returned_as_is() {
        let caller = caller_with(&["admin"]);

        let result: Result<Option<Option<u32>>, ()> =
            evaluate(Some(&caller), &admin_gate(), || Ok(None));

        assert_eq!(result, Ok(Some(None)));
    }

    #[test]
    fn repeated_evaluation_resolves_every_time() {
        let gate = AccessGate::configure(Some("admin")).unwrap();
        let caller = caller_with(&["admin"]);
        let calls = Cell::new(0);

        for _ in 0..3 {
            let result: Result<Option<u32>, ()> = gate.evaluate(Some(&caller), || {
                calls.set(calls.get() + 1);
                Ok(7)
            });
            assert_eq!(result, Ok(Some(7)));
        }

        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn async_evaluation_awaits_resolver_when_permitted() {
        let gate = AccessGate::configure(Some("admin")).unwrap();
        let caller = caller_with(&["admin"]);

        let result: Result<Option<u32>, ()> = gate
            .evaluate_async(Some(&caller), || async {
                tokio::task::yield_now().await;
                Ok(42)
            })
            .await;

        assert_eq!(result, Ok(Some(42)));
    }

    #[tokio::test]
    async fn async_evaluation_never_builds_future_when_denied() {
        let gate = AccessGate::configure(Some("admin")).unwrap();
        let caller = caller_with(&["editor"]);
        let calls = AtomicUsize::new(0);

        let result: Result<Option<u32>, ()> = gate
            .evaluate_async(Some(&caller), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(42) }
            })
            .await;

        assert_eq!(result, Ok(None));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn gate_is_shared_across_tasks() {
        let gate = Arc::new(AccessGate::configure(Some("admin")).unwrap());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for i in 0..16 {
            let gate = Arc::clone(&gate);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                let caller = if i % 2 == 0 {
                    caller_with(&["admin"])
                } else {
                    caller_with(&["editor"])
                };
                let result: Result<Option<usize>, ()> = gate
                    .evaluate_async(Some(&caller), || async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(i)
                    })
                    .await;
                (i, result)
            }));
        }

        for handle in handles {
            let (i, result) = handle.await.unwrap();
            if i % 2 == 0 {
                assert_eq!(result, Ok(Some(i)));
            } else {
                assert_eq!(result, Ok(None));
            }
        }
        assert_eq!(calls.load(Ordering::SeqCst), 8);
    }
}
