//! Canonical identifiers for users and posts.
//!
//! Identifiers compare by exact equality of their canonical form: the
//! lowercase, hyphenated UUID string. Parsing accepts nothing else, so a
//! braced, upper-case or URN spelling of a valid UUID is treated as unknown.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! canonical_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID.
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Parses the canonical string form, returning `None` for anything else.
            pub fn parse(s: &str) -> Option<Self> {
                let id = Uuid::try_parse(s).ok()?;
                if id.hyphenated().to_string() == s {
                    Some(Self(id))
                } else {
                    None
                }
            }

            /// Returns the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0.hyphenated(), f)
            }
        }
    };
}

canonical_id! {
    /// Identifier of a registered user.
    UserId
}

canonical_id! {
    /// Identifier of a post.
    PostId
}
