//! Role-based access gates for GraphQL field resolution.
//!
//! A gate wraps a field's resolution with a role check. It is configured
//! when the schema is built (`@canAccess(requiredRole: "admin")`) and
//! evaluated per request against the request's [`Caller`]:
//!
//! - no caller, or a caller without the role: the field resolves to nothing
//!   and the wrapped resolution never runs;
//! - otherwise the resolution runs once and its result, including any error,
//!   is returned untouched.
//!
//! Missing or empty roles are rejected with [`ConfigurationError`] while the
//! gates are being bound, so a misconfigured field fails the build instead
//! of shipping unprotected.
//!
//! # Example
//!
//! ```
//! use fieldgate_access_gate::AccessGate;
//! use fieldgate_core::UserId;
//! use fieldgate_platform_access::{Caller, RoleSet};
//!
//! let gate = AccessGate::configure(Some("admin")).expect("role is set");
//!
//! let admin = Caller::new(UserId::new(), RoleSet::from_names(["admin", "editor"]));
//! let editor = Caller::new(UserId::new(), RoleSet::from_names(["editor"]));
//!
//! let report = || Ok::<_, std::convert::Infallible>("quarterly numbers");
//! assert_eq!(gate.evaluate(Some(&admin), report), Ok(Some("quarterly numbers")));
//! assert_eq!(gate.evaluate(Some(&editor), report), Ok(None));
//! assert_eq!(gate.evaluate(None, report), Ok(None));
//!
//! assert!(AccessGate::configure(Some("")).is_err());
//! ```
//!
//! [`Caller`]: fieldgate_platform_access::Caller

mod directive;
mod error;
mod gate;

pub use directive::{
    CAN_ACCESS_DEFINITION, CanAccess, DIRECTIVE_NAME, FieldCoordinate, FieldGates,
    FieldGatesBuilder, REQUIRED_ROLE_ARGUMENT,
};
pub use error::ConfigurationError;
pub use gate::{
    AccessGate, Decision, Denial, GateConfiguration, check, evaluate, evaluate_async,
};
