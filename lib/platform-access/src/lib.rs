//! Identity, tokens, and logout for fieldgate.
//!
//! This crate provides the collaborators the access gate relies on:
//! - Users and their named roles (`User`, `Role`, `RoleSet`)
//! - The per-request identity (`Caller`)
//! - Access tokens with digest-only storage (`AccessToken`, `IssuedToken`)
//! - Store traits with in-memory implementations
//! - Authentication events (`AuthEvent`, `EventSink`)
//! - `AuthService`: issue tokens, resolve bearer secrets to callers, log out
//!
//! # Example
//!
//! ```
//! use fieldgate_platform_access::{Caller, RoleSet, User};
//!
//! // Users carry named roles
//! let user = User::new("Alice", "alice@example.com")
//!     .with_roles(RoleSet::from_names(["admin", "editor"]));
//!
//! // Each request acts as a caller built from the user's roles
//! let caller = Caller::for_user(&user);
//!
//! assert!(caller.has_role("admin"));
//! assert!(!caller.has_role("viewer"));
//! ```

pub mod caller;
pub mod error;
pub mod event;
pub mod role;
pub mod service;
pub mod store;
pub mod token;
pub mod user;

// Re-export main types at crate root
pub use caller::Caller;
pub use error::{AuthenticationError, StoreError};
pub use event::{AuthEvent, BroadcastEventSink, EventSink};
pub use role::{Role, RoleSet};
pub use service::{AuthService, LOGOUT_MESSAGE, LOGOUT_STATUS, LogoutOutcome};
pub use store::{InMemoryTokenStore, InMemoryUserStore, TokenStore, UserStore};
pub use token::{AccessToken, IssuedToken, SecretDigest};
pub use user::User;
