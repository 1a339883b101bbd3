//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every record the engine reads has a strongly-typed ID so that a
//! challenge id can never be passed where a POI id is expected. The
//! upstream API issues the ids; the `new()` constructors here exist for
//! tests and seed data.
//!
//! Inventory items are the exception: the item catalogue uses small
//! integer ids, wrapped by [`ItemId`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
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

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a point of interest.
    PoiId
}

define_id! {
    /// Unique identifier for a tiered challenge attached to a POI.
    ChallengeId
}

define_id! {
    /// Unique identifier for one answer submitted against a challenge.
    SubmissionId
}

define_id! {
    /// Identifier of an acting entity: a team, or a user playing solo.
    EntityId
}

define_id! {
    /// Unique identifier for a quest.
    QuestId
}

define_id! {
    /// Unique identifier for a tag attached to POIs.
    TagId
}

define_id! {
    /// Unique identifier for an authored map zone.
    ZoneId
}

define_id! {
    /// Identifier of a match or play session. Adjacency memoization is
    /// scoped to one session.
    SessionId
}

/// Numeric identifier of an inventory item in the item catalogue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct ItemId(pub u32);

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let poi = PoiId::new();
        let challenge = ChallengeId::new();
        assert_ne!(poi.into_inner(), Uuid::nil());
        assert_ne!(challenge.into_inner(), Uuid::nil());
    }

    #[test]
    fn id_serializes_as_bare_uuid() {
        let id = EntityId::from(Uuid::nil());
        let json = serde_json::to_string(&id).ok();
        assert_eq!(
            json.as_deref(),
            Some("\"00000000-0000-0000-0000-000000000000\"")
        );
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = SessionId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }

    #[test]
    fn item_id_is_numeric_on_the_wire() {
        let json = serde_json::to_string(&ItemId(1)).ok();
        assert_eq!(json.as_deref(), Some("1"));
    }
}
