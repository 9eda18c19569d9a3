//! Identifiers for users and issued tokens.
//!
//! Both wrap a ULID, so they are unique and order by creation time. They
//! render as `usr_<ulid>` / `tok_<ulid>` in logs and GraphQL output, and
//! serialize as the bare ULID.

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

macro_rules! ulid_id {
    ($(#[$meta:meta])* $name:ident => $tag:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Ulid);

        impl $name {
            /// Generates a fresh identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Ulid::new())
            }

            /// The wrapped ULID; identifiers minted later compare greater.
            #[must_use]
            pub const fn as_ulid(&self) -> Ulid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "_{}"), self.0)
            }
        }
    };
}

ulid_id!(
    /// Unique identifier for a user.
    UserId => "usr"
);

ulid_id!(
    /// Unique identifier for an issued access token.
    ///
    /// This identifies the token record; it is never the bearer secret.
    TokenId => "tok"
);
