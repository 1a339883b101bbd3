//! Adjacency pairs between POIs and the control links drawn over them.
//!
//! Two POIs closer than the threshold form an [`AdjacencyPair`]. The pair
//! list for a match never changes while the match runs, so
//! [`AdjacencyClusterer`] memoizes it per [`SessionId`]. The clusterer is
//! owned by the caller: create one per match and drop it when the match
//! ends.
//!
//! A pair is drawn as a [`Link`] only when the viewer has discovered both
//! ends. The link takes the controlling entity's color when one entity
//! holds both ends, and the neutral style otherwise.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use sha2::{Digest, Sha256};
use waypoint_types::{EntityId, PoiId, PointOfInterest, SessionId};
use waypoint_world::distance_meters;

use crate::capture::{CaptureResolver, Control};
use crate::config::{AdjacencyConfig, LinkConfig};
use crate::discovery::DiscoveryIndex;

/// POIs strictly closer than this are linked by default.
pub const DEFAULT_ADJACENCY_THRESHOLD_METERS: f64 = 800.0;

/// An unordered pair of nearby POIs. `first` always sorts below `second`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjacencyPair {
    /// Lower POI id.
    pub first: PoiId,
    /// Higher POI id.
    pub second: PoiId,
    /// Great-circle distance between the two.
    pub distance_meters: f64,
}

impl AdjacencyPair {
    /// Whether `poi` is one end of this pair.
    pub fn touches(&self, poi: PoiId) -> bool {
        self.first == poi || self.second == poi
    }
}

/// Memoizing pair finder for one match at a time.
#[derive(Debug, Clone)]
pub struct AdjacencyClusterer {
    threshold_meters: f64,
    session: Option<SessionId>,
    fingerprint: Vec<PoiId>,
    pairs: Option<Arc<[AdjacencyPair]>>,
    distances: HashMap<(PoiId, PoiId), f64>,
}

impl Default for AdjacencyClusterer {
    fn default() -> Self {
        Self::new(DEFAULT_ADJACENCY_THRESHOLD_METERS)
    }
}

impl AdjacencyClusterer {
    /// Create an empty clusterer linking POIs closer than `threshold_meters`.
    pub fn new(threshold_meters: f64) -> Self {
        Self {
            threshold_meters,
            session: None,
            fingerprint: Vec::new(),
            pairs: None,
            distances: HashMap::new(),
        }
    }

    /// Create a clusterer from configuration.
    pub fn from_config(config: &AdjacencyConfig) -> Self {
        Self::new(config.threshold_meters)
    }

    /// The link threshold in meters.
    pub const fn threshold_meters(&self) -> f64 {
        self.threshold_meters
    }

    /// Unique pairs among `pois` closer than the threshold.
    ///
    /// For a fixed `session` and an unchanged POI id list, repeated calls
    /// return the same `Arc`. A new session drops every memo. A changed POI
    /// list recomputes the pairs but reuses measured distances. Duplicate
    /// POI ids in the input are measured once.
    pub fn unique_pairs_within_distance<P: Borrow<PointOfInterest>>(
        &mut self,
        session: SessionId,
        pois: &[P],
    ) -> Arc<[AdjacencyPair]> {
        if self.session != Some(session) {
            if let Some(previous) = self.session {
                tracing::debug!(
                    %previous,
                    %session,
                    "adjacency session changed, clearing memo"
                );
            }
            self.clear();
            self.session = Some(session);
        }

        let fingerprint: Vec<PoiId> = pois
            .iter()
            .map(|p| <P as Borrow<PointOfInterest>>::borrow(p).id)
            .collect();
        if let Some(pairs) = self.pairs.as_ref().filter(|_| self.fingerprint == fingerprint) {
            tracing::debug!(%session, pairs = pairs.len(), "adjacency memo hit");
            return Arc::clone(pairs);
        }

        let mut seen = HashSet::new();
        let unique: Vec<&PointOfInterest> = pois
            .iter()
            .map(<P as Borrow<PointOfInterest>>::borrow)
            .filter(|p: &&PointOfInterest| seen.insert(p.id))
            .collect();

        let mut found = Vec::new();
        let mut rest = unique.as_slice();
        while let Some((head, tail)) = rest.split_first() {
            for other in tail {
                let distance = self.distance(head, other);
                if distance < self.threshold_meters {
                    let (first, second) = ordered(head.id, other.id);
                    found.push(AdjacencyPair {
                        first,
                        second,
                        distance_meters: distance,
                    });
                }
            }
            rest = tail;
        }

        let pairs: Arc<[AdjacencyPair]> = found.into();
        tracing::debug!(
            %session,
            pois = unique.len(),
            pairs = pairs.len(),
            threshold_meters = self.threshold_meters,
            "adjacency memo miss, recomputed pairs"
        );
        self.fingerprint = fingerprint;
        self.pairs = Some(Arc::clone(&pairs));
        pairs
    }

    /// Drop every memo.
    pub fn clear(&mut self) {
        self.session = None;
        self.fingerprint.clear();
        self.pairs = None;
        self.distances.clear();
    }

    fn distance(&mut self, a: &PointOfInterest, b: &PointOfInterest) -> f64 {
        *self
            .distances
            .entry(ordered(a.id, b.id))
            .or_insert_with(|| distance_meters(a.coordinate, b.coordinate))
    }
}

fn ordered(a: PoiId, b: PoiId) -> (PoiId, PoiId) {
    if a <= b { (a, b) } else { (b, a) }
}

// ---------------------------------------------------------------------------
// Link styling
// ---------------------------------------------------------------------------

/// Color and opacity of one drawn link.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStyle {
    /// CSS color.
    pub color: String,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// The entity holding both ends, when one does.
    pub controller: Option<EntityId>,
}

/// Style a link from the control of its two ends.
///
/// Full opacity and the team color only when both ends resolve to the same
/// entity; the neutral style otherwise, including when either end is
/// unclaimed.
pub fn resolve_link_style(
    first: Option<&Control>,
    second: Option<&Control>,
    config: &LinkConfig,
) -> LinkStyle {
    match (first, second) {
        (Some(a), Some(b)) if a.entity_id == b.entity_id => LinkStyle {
            color: team_color(a.entity_id),
            opacity: config.controlled_opacity,
            controller: Some(a.entity_id),
        },
        _ => LinkStyle {
            color: config.neutral_color.clone(),
            opacity: config.neutral_opacity,
            controller: None,
        },
    }
}

/// Stable `#rrggbb` color for an entity.
pub fn team_color(entity: EntityId) -> String {
    let digest = Sha256::digest(entity.to_string().as_bytes());
    match digest.as_slice() {
        [r, g, b, ..] => format!("#{r:02x}{g:02x}{b:02x}"),
        _ => String::from("#000000"),
    }
}

/// A drawable adjacency pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// The two POIs joined.
    pub pair: AdjacencyPair,
    /// How to draw it.
    pub style: LinkStyle,
}

/// Links the viewer may see: pairs with both ends discovered by `viewer`,
/// each styled from current control.
///
/// Pairs naming a POI missing from `pois` are skipped.
pub fn visible_links<P: Borrow<PointOfInterest>>(
    pairs: &[AdjacencyPair],
    pois: &[P],
    resolver: &CaptureResolver<'_>,
    discoveries: &DiscoveryIndex,
    viewer: EntityId,
    config: &LinkConfig,
) -> Vec<Link> {
    let by_id: HashMap<PoiId, &PointOfInterest> = pois
        .iter()
        .map(<P as Borrow<PointOfInterest>>::borrow)
        .map(|p: &PointOfInterest| (p.id, p))
        .collect();

    pairs
        .iter()
        .filter(|pair| {
            discoveries.has_discovered(viewer, pair.first)
                && discoveries.has_discovered(viewer, pair.second)
        })
        .filter_map(|pair| {
            let first = by_id.get(&pair.first)?;
            let second = by_id.get(&pair.second)?;
            let style = resolve_link_style(
                resolver.controlling_entity(first).as_ref(),
                resolver.controlling_entity(second).as_ref(),
                config,
            );
            Some(Link { pair: *pair, style })
        })
        .collect()
}
