//! Error types for the `waypoint-core` crate.
//!
//! Every query in this crate is total over well-formed input: missing
//! control, missing matches, and missing effects are values, not errors.
//! [`CoreError`] only covers input that is malformed in shape, surfaced
//! while a snapshot is loaded and validated.

use waypoint_types::{ChallengeId, EntityId, PoiId, ZoneId};
use waypoint_world::GeoError;

/// Errors raised while loading or validating engine input.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Snapshot JSON could not be decoded.
    #[error("failed to decode snapshot JSON: {source}")]
    Json {
        /// The underlying decode error.
        #[from]
        source: serde_json::Error,
    },

    /// A POI carries a coordinate outside WGS84 ranges.
    #[error("point of interest {poi} has an invalid coordinate: {source}")]
    InvalidCoordinate {
        /// The offending POI.
        poi: PoiId,
        /// The validation failure.
        source: GeoError,
    },

    /// A challenge declares tier 0. Tiers start at 1.
    #[error("challenge {challenge} on point of interest {poi} has tier 0")]
    InvalidTier {
        /// The POI owning the challenge.
        poi: PoiId,
        /// The offending challenge.
        challenge: ChallengeId,
    },

    /// A challenge is nested under a POI other than the one it names.
    #[error("challenge {challenge} names point of interest {claimed} but is attached to {actual}")]
    MisattachedChallenge {
        /// The offending challenge.
        challenge: ChallengeId,
        /// The POI the challenge claims to belong to.
        claimed: PoiId,
        /// The POI it was found under.
        actual: PoiId,
    },

    /// A zone boundary vertex lies outside WGS84 ranges.
    #[error("zone {zone} has an invalid boundary vertex: {source}")]
    InvalidZoneBoundary {
        /// The offending zone.
        zone: ZoneId,
        /// The validation failure.
        source: GeoError,
    },

    /// An entity's location fix could not be parsed.
    #[error("location fix for entity {entity} is malformed: {source}")]
    InvalidLocation {
        /// The entity the fix belongs to.
        entity: EntityId,
        /// The parse failure.
        source: GeoError,
    },
}
