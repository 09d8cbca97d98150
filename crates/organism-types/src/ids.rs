//! Type-safe identifier wrappers around [`Uuid`].
//!
//! World entities the agent can remember or lock onto (food sources and
//! enemies) carry a strongly-typed ID so a food reference can never be
//! compared against an enemy reference. IDs use UUID v7 (time-ordered).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Newtype over a v7 [`Uuid`], ordered and displayable.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id! {
    /// Unique identifier for a food source in the world.
    FoodId
}

define_id! {
    /// Unique identifier for a hostile actor in the world.
    EnemyId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_distinct() {
        let a = FoodId::new();
        let b = FoodId::new();
        assert_ne!(a, b);
        assert_ne!(a.0, Uuid::nil());
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = EnemyId::new();
        assert_eq!(id.to_string(), id.0.to_string());
    }

    #[test]
    fn id_serializes_as_plain_uuid() {
        let id = EnemyId::new();
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, format!("\"{}\"", id.0));
    }
}
