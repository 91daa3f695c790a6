//! Opaque identifiers for issues, comments and activity-log entries
//!
//! Fresh ids are `<PREFIX>-<ULID>`, so they sort by creation time. Ids read
//! back from storage are accepted in any string shape.

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

macro_rules! prefixed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix used for generated ids
            pub const PREFIX: &'static str = $prefix;

            /// Generate a new unique id
            #[inline]
            #[must_use]
            pub fn generate() -> Self {
                Self(format!("{}-{}", Self::PREFIX, Ulid::new()))
            }

            /// Borrow the raw id string
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

prefixed_id!(
    /// Issue identifier, immutable after creation
    IssueId,
    "ISS"
);

prefixed_id!(
    /// Comment identifier
    CommentId,
    "COM"
);

prefixed_id!(
    /// Activity-log entry identifier
    ActivityId,
    "ACT"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_prefix() {
        assert!(IssueId::generate().as_str().starts_with("ISS-"));
        assert!(CommentId::generate().as_str().starts_with("COM-"));
        assert!(ActivityId::generate().as_str().starts_with("ACT-"));
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = IssueId::generate();
        let b = IssueId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn foreign_ids_are_accepted() {
        let id: IssueId = serde_json::from_str("\"ISS-1700000000000-abc123xyz\"").unwrap();
        assert_eq!(id.as_str(), "ISS-1700000000000-abc123xyz");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"ISS-1700000000000-abc123xyz\"");
    }
}
