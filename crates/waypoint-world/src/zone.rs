//! Zone containment.
//!
//! Zones are polygons drawn by content authors; rewards shared with party
//! members only go to members standing inside the challenge's zone. The
//! test is planar ray casting on `(longitude, latitude)`, which is fine for
//! city-sized polygons away from the antimeridian.

use waypoint_types::{Coordinate, Zone};

/// Whether `point` lies inside the polygon described by `ring`.
///
/// `ring` is the outer boundary; closing the ring by repeating the first
/// vertex is optional. Rings with fewer than three vertices contain
/// nothing.
pub fn is_within_zone(point: Coordinate, ring: &[Coordinate]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let Some(mut previous) = ring.last() else {
        return false;
    };

    let (x, y) = (point.longitude, point.latitude);
    let mut inside = false;
    for current in ring {
        let (xi, yi) = (current.longitude, current.latitude);
        let (xj, yj) = (previous.longitude, previous.latitude);
        // yi != yj is implied when the edge straddles the ray.
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        previous = current;
    }

    tracing::trace!(inside, vertices = ring.len(), "zone containment");
    inside
}

/// The first zone in `zones` whose boundary contains `point`.
pub fn containing_zone(point: Coordinate, zones: &[Zone]) -> Option<&Zone> {
    zones
        .iter()
        .find(|zone| is_within_zone(point, &zone.boundary_coords))
}
