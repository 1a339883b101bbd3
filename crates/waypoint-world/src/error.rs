//! Error types for the `waypoint-world` crate.
//!
//! Distance and proximity queries are total and never fail. Errors only
//! arise when raw input has to be turned into a [`Coordinate`] first.
//!
//! [`Coordinate`]: waypoint_types::Coordinate

/// Errors raised while validating or parsing positional input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoError {
    /// Latitude is non-finite or outside -90..=90.
    #[error("latitude out of range: {0}")]
    InvalidLatitude(f64),

    /// Longitude is non-finite or outside -180..=180.
    #[error("longitude out of range: {0}")]
    InvalidLongitude(f64),

    /// A coordinate component is not a decimal number.
    #[error("malformed {component}: {value:?}")]
    MalformedCoordinate {
        /// Which component failed (`latitude`, `longitude`, `accuracy`).
        component: &'static str,
        /// The raw input.
        value: String,
    },

    /// A location fix string does not have the `lat,lng[,accuracy]` shape.
    #[error("malformed location fix: {0:?}")]
    MalformedLocationFix(String),
}
