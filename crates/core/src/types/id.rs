//! Newtype IDs for type-safe entity references.
//!
//! Accounts and orders are keyed by `BIGSERIAL` columns, so the wrappers
//! hold an `i64`. With the `postgres` feature enabled they encode and
//! decode transparently as `BIGINT`.

use serde::{Deserialize, Serialize};

/// Database ID of an account row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
pub struct AccountId(i64);

/// Database ID of an order row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
pub struct OrderId(i64);

macro_rules! id_impls {
    ($name:ident) => {
        impl $name {
            /// Create an ID from a raw database value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying database value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

id_impls!(AccountId);
id_impls!(OrderId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let id = AccountId::new(42);
        assert_eq!(id.as_i64(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(AccountId::from(42), id);
    }

    #[test]
    fn test_display() {
        assert_eq!(OrderId::new(7).to_string(), "7");
    }

    #[test]
    fn test_serde_transparent() {
        let id = AccountId::new(5);
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "5");
    }
}
