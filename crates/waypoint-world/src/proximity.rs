//! Real-world proximity gating for discovery, capture, and chest actions.
//!
//! Every gate fails closed: an entity without a location fix is never in
//! range. A missing fix is the normal state right after app start or when
//! the device denies location access, so it is not an error.

use serde::Deserialize;
use waypoint_types::Coordinate;

use crate::geo::distance_meters;

/// Default range for revealing a POI's content.
pub const DISCOVERY_RANGE_METERS: f64 = 100.0;

/// Default range for submitting an answer to a POI challenge.
pub const CAPTURE_RANGE_METERS: f64 = 100.0;

/// Default range for opening a treasure chest.
pub const TREASURE_CHEST_RANGE_METERS: f64 = 10.0;

/// An action gated by distance to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProximityAction {
    /// Reveal a POI's name, image, and description.
    Discover,
    /// Submit an answer to a POI challenge.
    Capture,
    /// Open a cached reward.
    OpenChest,
}

/// Per-action distance thresholds in meters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ProximityThresholds {
    /// Range for [`ProximityAction::Discover`].
    #[serde(default = "default_discover")]
    pub discover_meters: f64,
    /// Range for [`ProximityAction::Capture`].
    #[serde(default = "default_capture")]
    pub capture_meters: f64,
    /// Range for [`ProximityAction::OpenChest`].
    #[serde(default = "default_open_chest")]
    pub open_chest_meters: f64,
}

impl ProximityThresholds {
    /// Threshold applied to `action`.
    pub const fn threshold_for(&self, action: ProximityAction) -> f64 {
        match action {
            ProximityAction::Discover => self.discover_meters,
            ProximityAction::Capture => self.capture_meters,
            ProximityAction::OpenChest => self.open_chest_meters,
        }
    }

    /// Whether an entity at `entity` may perform `action` on `target`.
    pub fn allows(
        &self,
        action: ProximityAction,
        entity: Option<Coordinate>,
        target: Coordinate,
    ) -> bool {
        let allowed = is_within_range(entity, target, self.threshold_for(action));
        tracing::trace!(?action, allowed, "proximity gate");
        allowed
    }
}

impl Default for ProximityThresholds {
    fn default() -> Self {
        Self {
            discover_meters: default_discover(),
            capture_meters: default_capture(),
            open_chest_meters: default_open_chest(),
        }
    }
}

const fn default_discover() -> f64 {
    DISCOVERY_RANGE_METERS
}

const fn default_capture() -> f64 {
    CAPTURE_RANGE_METERS
}

const fn default_open_chest() -> f64 {
    TREASURE_CHEST_RANGE_METERS
}

/// Whether `entity` is within `threshold_meters` of `target` (inclusive).
///
/// Returns `false` when the entity has no location fix. A non-finite
/// distance (from a corrupt coordinate) also compares false.
pub fn is_within_range(
    entity: Option<Coordinate>,
    target: Coordinate,
    threshold_meters: f64,
) -> bool {
    distance_to(entity, target).is_some_and(|d| d <= threshold_meters)
}

/// Distance from the entity to `target`, or `None` without a location fix.
pub fn distance_to(entity: Option<Coordinate>, target: Coordinate) -> Option<f64> {
    entity.map(|position| distance_meters(position, target))
}
