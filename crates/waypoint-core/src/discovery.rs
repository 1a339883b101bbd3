//! Per-entity discovery state.
//!
//! Discovery reveals a POI's content to one entity. Teams and solo players
//! never share discovery state, so every lookup is keyed by entity.

use std::collections::{HashMap, HashSet};

use waypoint_types::{Discovery, EntityId, PoiId};

/// Whether `entity` has discovered `poi` according to `discoveries`.
pub fn has_discovered(poi: PoiId, entity: EntityId, discoveries: &[Discovery]) -> bool {
    discoveries
        .iter()
        .any(|d| d.poi_id == poi && d.entity_id == entity)
}

/// Discovery log indexed by entity.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryIndex {
    by_entity: HashMap<EntityId, HashSet<PoiId>>,
}

impl DiscoveryIndex {
    /// Index a discovery log. Repeated discoveries collapse.
    pub fn new(discoveries: &[Discovery]) -> Self {
        let mut by_entity: HashMap<EntityId, HashSet<PoiId>> = HashMap::new();
        for discovery in discoveries {
            by_entity
                .entry(discovery.entity_id)
                .or_default()
                .insert(discovery.poi_id);
        }
        Self { by_entity }
    }

    /// Whether `entity` has discovered `poi`.
    pub fn has_discovered(&self, entity: EntityId, poi: PoiId) -> bool {
        self.by_entity
            .get(&entity)
            .is_some_and(|pois| pois.contains(&poi))
    }

    /// Number of distinct POIs `entity` has discovered.
    pub fn discovered_count(&self, entity: EntityId) -> usize {
        self.by_entity.get(&entity).map_or(0, HashSet::len)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn discovery(entity: EntityId, poi: PoiId) -> Discovery {
        Discovery {
            entity_id: entity,
            poi_id: poi,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn discovery_is_per_entity() {
        let (team, solo) = (EntityId::new(), EntityId::new());
        let poi = PoiId::new();
        let log = vec![discovery(team, poi)];

        assert!(has_discovered(poi, team, &log));
        assert!(!has_discovered(poi, solo, &log));

        let index = DiscoveryIndex::new(&log);
        assert!(index.has_discovered(team, poi));
        assert!(!index.has_discovered(solo, poi));
        assert!(!index.has_discovered(team, PoiId::new()));
    }

    #[test]
    fn repeated_discoveries_collapse() {
        let team = EntityId::new();
        let poi = PoiId::new();
        let index = DiscoveryIndex::new(&[discovery(team, poi), discovery(team, poi)]);
        assert_eq!(index.discovered_count(team), 1);
        assert_eq!(index.discovered_count(EntityId::new()), 0);
    }
}
