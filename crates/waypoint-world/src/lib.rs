//! Geodesic math and proximity rules for the Waypoint engine.
//!
//! This crate answers "how far" and "close enough" questions about
//! real-world positions. It holds no state.
//!
//! # Modules
//!
//! - [`error`] -- Validation errors for raw positional input.
//! - [`geo`] -- Haversine distance, coordinate validation, location-fix parsing.
//! - [`proximity`] -- Fail-closed range gates for discovery, capture, and
//!   treasure-chest actions.
//! - [`zone`] -- Point-in-polygon containment for zone boundaries.

pub mod error;
pub mod geo;
pub mod proximity;
pub mod zone;

// Re-export primary items at crate root.
pub use error::GeoError;
pub use geo::{
    EARTH_RADIUS_METERS, LocationFix, coordinate, distance_meters, parse_coordinate,
    parse_location_fix,
};
pub use proximity::{
    CAPTURE_RANGE_METERS, DISCOVERY_RANGE_METERS, ProximityAction, ProximityThresholds,
    TREASURE_CHEST_RANGE_METERS, distance_to, is_within_range,
};
pub use zone::{containing_zone, is_within_zone};
