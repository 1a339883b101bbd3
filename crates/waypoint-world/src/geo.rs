//! Great-circle distance and coordinate validation.
//!
//! Distances use the Haversine formula on a spherical Earth of radius
//! [`EARTH_RADIUS_METERS`]. That is accurate to well under a meter at the
//! 10 m to 1 km scales the game cares about.

use waypoint_types::Coordinate;

use crate::error::GeoError;

/// Mean Earth radius used for all distance math.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine great-circle distance between two coordinates, in meters.
///
/// The intermediate `sin²` term is clamped to `[0, 1]` so rounding near
/// antipodal points cannot push `asin` out of its domain.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let phi_a = a.latitude.to_radians();
    let phi_b = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (phi_a.cos() * phi_b.cos())
        .mul_add((d_lambda / 2.0).sin().powi(2), (d_phi / 2.0).sin().powi(2));
    let central_angle = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_METERS * central_angle
}

/// Build a validated [`Coordinate`].
///
/// # Errors
///
/// Returns [`GeoError::InvalidLatitude`] or [`GeoError::InvalidLongitude`]
/// when a component is non-finite or outside WGS84 ranges.
pub fn coordinate(latitude: f64, longitude: f64) -> Result<Coordinate, GeoError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(GeoError::InvalidLatitude(latitude));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(GeoError::InvalidLongitude(longitude));
    }
    Ok(Coordinate::new(latitude, longitude))
}

/// Parse a coordinate from the decimal strings the POI API stores.
///
/// # Errors
///
/// Returns [`GeoError::MalformedCoordinate`] for non-numeric input, or a
/// range error from [`coordinate`].
pub fn parse_coordinate(latitude: &str, longitude: &str) -> Result<Coordinate, GeoError> {
    let lat = parse_component("latitude", latitude)?;
    let lng = parse_component("longitude", longitude)?;
    coordinate(lat, lng)
}

/// A device position reported by the liveness service.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LocationFix {
    /// Reported position.
    pub coordinate: Coordinate,
    /// Horizontal accuracy radius in meters, when the device reported one.
    pub accuracy_meters: Option<f64>,
}

/// Parse a `lat,lng[,accuracy]` location string.
///
/// # Errors
///
/// Returns [`GeoError::MalformedLocationFix`] when fewer than two fields are
/// present, or the component errors from [`parse_coordinate`].
pub fn parse_location_fix(raw: &str) -> Result<LocationFix, GeoError> {
    let mut parts = raw.split(',');
    let (Some(lat), Some(lng)) = (parts.next(), parts.next()) else {
        return Err(GeoError::MalformedLocationFix(raw.to_owned()));
    };
    let coordinate = parse_coordinate(lat, lng)?;
    let accuracy_meters = match parts.next() {
        Some(acc) if !acc.trim().is_empty() => Some(parse_component("accuracy", acc)?),
        _ => None,
    };
    Ok(LocationFix {
        coordinate,
        accuracy_meters,
    })
}

fn parse_component(component: &'static str, raw: &str) -> Result<f64, GeoError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_parse| GeoError::MalformedCoordinate {
            component,
            value: raw.to_owned(),
        })
}
