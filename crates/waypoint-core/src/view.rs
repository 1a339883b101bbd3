//! What one viewing entity is shown.
//!
//! This module runs the full data flow for a single viewer over one
//! [`MatchSnapshot`]: quests decide which POIs are unlocked, the submission
//! log decides control, adjacency pairs become links, and active effects
//! decide how clue and question text reads. Undiscovered POIs keep their
//! position and clue but hide their name, description, image, and tags.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use waypoint_types::{
    ChallengeId, Coordinate, Discovery, EntityId, InventoryItemEffect, ItemId, Objective, PoiId,
    PointOfInterest, Quest, QuestId, SessionId, Submission, Zone, ZoneId,
};
use waypoint_world::{
    ProximityAction, containing_zone, coordinate, distance_to, parse_location_fix,
};

use crate::adjacency::{AdjacencyClusterer, Link, visible_links};
use crate::capture::{CaptureResolver, Control, TierScope};
use crate::config::{EngineConfig, TierScopeMode};
use crate::discovery::DiscoveryIndex;
use crate::effects::EffectModifier;
use crate::error::CoreError;
use crate::quest::{
    all_nodes, collect_reachable_points_of_interest_by, count_progress, is_root_point_of_interest,
    pending_challenges_by, quest_tags, reported_completions, tracked_point_of_interest_ids,
};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Everything the engine reads for one match, as fetched from the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    /// Match or session the snapshot belongs to.
    pub session_id: SessionId,
    /// Instant effects are evaluated at.
    pub now: DateTime<Utc>,
    /// Quests available to the viewer.
    #[serde(default)]
    pub quests: Vec<Quest>,
    /// Quests the viewer is tracking.
    #[serde(default)]
    pub tracked_quest_ids: Vec<QuestId>,
    /// Standalone match POIs (team battles), visible regardless of quests.
    #[serde(default)]
    pub points_of_interest: Vec<PointOfInterest>,
    /// The global submission log.
    #[serde(default)]
    pub submissions: Vec<Submission>,
    /// The global discovery log.
    #[serde(default)]
    pub discoveries: Vec<Discovery>,
    /// Inventory item effects in play.
    #[serde(default)]
    pub effects: Vec<InventoryItemEffect>,
    /// Authored map zones.
    #[serde(default)]
    pub zones: Vec<Zone>,
    /// Latest `lat,lng[,accuracy]` location fix per entity.
    #[serde(default)]
    pub locations: BTreeMap<EntityId, String>,
}

impl MatchSnapshot {
    /// Decode and validate a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Json`] for undecodable input, or the first
    /// validation failure from [`MatchSnapshot::validate`].
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check shape invariants the queries rely on.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`], [`CoreError::InvalidTier`],
    /// [`CoreError::MisattachedChallenge`], [`CoreError::InvalidZoneBoundary`],
    /// or [`CoreError::InvalidLocation`].
    pub fn validate(&self) -> Result<(), CoreError> {
        let quest_pois = self
            .quests
            .iter()
            .flat_map(all_nodes)
            .map(|node| &node.point_of_interest);
        for poi in self.points_of_interest.iter().chain(quest_pois) {
            coordinate(poi.coordinate.latitude, poi.coordinate.longitude)
                .map_err(|source| CoreError::InvalidCoordinate { poi: poi.id, source })?;
            for challenge in &poi.challenges {
                if challenge.tier == 0 {
                    return Err(CoreError::InvalidTier {
                        poi: poi.id,
                        challenge: challenge.id,
                    });
                }
                if challenge.poi_id != poi.id {
                    return Err(CoreError::MisattachedChallenge {
                        challenge: challenge.id,
                        claimed: challenge.poi_id,
                        actual: poi.id,
                    });
                }
            }
        }
        for zone in &self.zones {
            for vertex in &zone.boundary_coords {
                coordinate(vertex.latitude, vertex.longitude).map_err(|source| {
                    CoreError::InvalidZoneBoundary {
                        zone: zone.id,
                        source,
                    }
                })?;
            }
        }
        for (entity, raw) in &self.locations {
            parse_location_fix(raw).map_err(|source| CoreError::InvalidLocation {
                entity: *entity,
                source,
            })?;
        }
        Ok(())
    }

    /// Parsed location of `entity`, or `None` without a usable fix.
    pub fn location_of(&self, entity: EntityId) -> Option<Coordinate> {
        self.locations
            .get(&entity)
            .and_then(|raw| parse_location_fix(raw).ok())
            .map(|fix| fix.coordinate)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One challenge as the viewer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeView {
    /// Challenge id.
    pub id: ChallengeId,
    /// Tier, starting at 1.
    pub tier: u32,
    /// Question text after effects.
    pub question: String,
    /// Reward item, if any.
    pub reward_item_id: Option<ItemId>,
    /// Someone has already answered correctly.
    pub spent: bool,
    /// The viewer has answered correctly.
    pub completed_by_viewer: bool,
    /// The viewer may submit an answer now.
    pub can_submit: bool,
}

/// One POI as the viewer sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiView {
    /// POI id.
    pub id: PoiId,
    /// Map position.
    pub coordinate: Coordinate,
    /// Clue text after effects.
    pub clue: String,
    /// Whether the viewer has discovered this POI.
    pub discovered: bool,
    /// Name, once discovered.
    pub name: Option<String>,
    /// Description, once discovered.
    pub description: Option<String>,
    /// Image URL, once discovered.
    pub image_url: Option<String>,
    /// Tag names, empty until discovered.
    pub tags: Vec<String>,
    /// Current controller.
    pub control: Option<Control>,
    /// Per-tier lock state.
    pub tier_map: BTreeMap<u32, bool>,
    /// Distance from the viewer, when a fix exists.
    pub distance_meters: Option<f64>,
    /// The viewer is close enough to discover it and has not yet.
    pub can_discover: bool,
    /// Challenges in authoring order.
    pub challenges: Vec<ChallengeView>,
}

/// Per-quest progress for the quest log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestSummary {
    /// Quest id.
    pub id: QuestId,
    /// Display name.
    pub name: String,
    /// Root POI.
    pub root_point_of_interest_id: PoiId,
    /// Unlocked nodes completed.
    pub completed: u32,
    /// Unlocked nodes.
    pub total: u32,
    /// Every unlocked node is complete.
    pub is_complete: bool,
    /// The viewer is tracking this quest.
    pub tracked: bool,
    /// Tag names across the quest.
    pub tags: Vec<String>,
    /// Unlocked challenges still open, in tree order.
    pub pending_challenge_ids: Vec<ChallengeId>,
}

/// The full projection for one viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    /// Match or session.
    pub session_id: SessionId,
    /// The viewing entity.
    pub viewer: EntityId,
    /// Evaluation instant.
    pub generated_at: DateTime<Utc>,
    /// Text is scrambled for this viewer.
    pub obscured: bool,
    /// When the scramble lifts.
    pub obscured_until: Option<DateTime<Utc>>,
    /// Unlocked POIs.
    pub points_of_interest: Vec<PoiView>,
    /// Visible control links.
    pub links: Vec<Link>,
    /// Quest log.
    pub quests: Vec<QuestSummary>,
    /// Unlocked POIs that start a quest.
    pub quest_root_point_of_interest_ids: BTreeSet<PoiId>,
    /// Unlocked POIs on tracked quests.
    pub tracked_point_of_interest_ids: BTreeSet<PoiId>,
    /// Zone the viewer is standing in, when it has a fix inside one.
    pub current_zone_id: Option<ZoneId>,
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Inputs shared by every per-POI projection for one viewer.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    /// The viewing entity.
    pub viewer: EntityId,
    /// Viewer location fix.
    pub location: Option<Coordinate>,
    /// Control index over the submission log.
    pub resolver: &'a CaptureResolver<'a>,
    /// Discovery index.
    pub discoveries: &'a DiscoveryIndex,
    /// Effects active against the viewer.
    pub effects: &'a EffectModifier,
    /// Engine configuration.
    pub config: &'a EngineConfig,
}

impl ViewContext<'_> {
    const fn tier_scope(&self) -> TierScope {
        match self.config.capture.tier_scope {
            TierScopeMode::Global => TierScope::Global,
            TierScopeMode::Viewer => TierScope::Entity(self.viewer),
        }
    }
}

/// Project one POI for the context's viewer.
pub fn project_point_of_interest(poi: &PointOfInterest, ctx: &ViewContext<'_>) -> PoiView {
    let discovered = ctx.discoveries.has_discovered(ctx.viewer, poi.id);
    let reveal = |value: &str| discovered.then(|| value.to_owned());

    let challenges = poi
        .challenges
        .iter()
        .map(|challenge| ChallengeView {
            id: challenge.id,
            tier: challenge.tier,
            question: ctx.effects.display_text(&challenge.question).into_owned(),
            reward_item_id: challenge.reward_item_id,
            spent: ctx.resolver.is_challenge_spent(challenge.id),
            completed_by_viewer: ctx.resolver.has_completed(challenge.id, ctx.viewer),
            can_submit: ctx.resolver.can_submit_answer(
                challenge,
                ctx.location,
                poi,
                &ctx.config.proximity,
            ),
        })
        .collect();

    PoiView {
        id: poi.id,
        coordinate: poi.coordinate,
        clue: ctx.effects.display_text(&poi.clue).into_owned(),
        discovered,
        name: reveal(&poi.name),
        description: reveal(&poi.description),
        image_url: reveal(&poi.image_url),
        tags: if discovered {
            poi.tags.iter().map(|t| t.name.clone()).collect()
        } else {
            Vec::new()
        },
        control: ctx.resolver.controlling_entity(poi),
        tier_map: ctx.resolver.tier_map(poi, ctx.tier_scope()),
        distance_meters: distance_to(ctx.location, poi.coordinate),
        can_discover: !discovered
            && ctx
                .config
                .proximity
                .allows(ProximityAction::Discover, ctx.location, poi.coordinate),
        challenges,
    }
}

/// Run the full data flow for `viewer` over `snapshot`.
///
/// An objective counts as complete when the quest log reports it or the
/// viewer holds a correct submission for its challenge.
pub fn project_match(
    snapshot: &MatchSnapshot,
    viewer: EntityId,
    config: &EngineConfig,
    clusterer: &mut AdjacencyClusterer,
) -> MatchView {
    let resolver = CaptureResolver::new(&snapshot.submissions);
    let discoveries = DiscoveryIndex::new(&snapshot.discoveries);
    let effects = EffectModifier::for_viewer(viewer, &snapshot.effects, snapshot.now);
    let ctx = ViewContext {
        viewer,
        location: snapshot.location_of(viewer),
        resolver: &resolver,
        discoveries: &discoveries,
        effects: &effects,
        config,
    };

    let objective_done =
        |o: &Objective| o.is_completed || resolver.has_completed(o.challenge.id, viewer);

    let mut seen = HashSet::new();
    let pois: Vec<&PointOfInterest> = snapshot
        .points_of_interest
        .iter()
        .chain(collect_reachable_points_of_interest_by(&snapshot.quests, objective_done))
        .filter(|p| seen.insert(p.id))
        .collect();

    let pairs = clusterer.unique_pairs_within_distance(snapshot.session_id, &pois);
    let links = visible_links(&pairs, &pois, &resolver, &discoveries, viewer, &config.links);

    let quests = snapshot
        .quests
        .iter()
        .map(|quest| {
            let reported = reported_completions(quest);
            let progress = count_progress(&quest.root_node, |challenge| {
                reported.contains(&challenge) || resolver.has_completed(challenge, viewer)
            });
            QuestSummary {
                id: quest.id,
                name: quest.name.clone(),
                root_point_of_interest_id: quest.root_node.point_of_interest.id,
                completed: progress.completed,
                total: progress.total,
                is_complete: progress.is_complete(),
                tracked: snapshot.tracked_quest_ids.contains(&quest.id),
                tags: quest_tags(quest),
                pending_challenge_ids: pending_challenges_by(quest, objective_done)
                    .into_iter()
                    .map(|c| c.id)
                    .collect(),
            }
        })
        .collect();

    let quest_root_point_of_interest_ids = pois
        .iter()
        .map(|p| p.id)
        .filter(|id| is_root_point_of_interest(&snapshot.quests, *id))
        .collect();
    let mut tracked = tracked_point_of_interest_ids(&snapshot.quests, &snapshot.tracked_quest_ids);
    tracked.retain(|id| pois.iter().any(|p| p.id == *id));
    let current_zone_id = ctx
        .location
        .and_then(|at| containing_zone(at, &snapshot.zones))
        .map(|zone| zone.id);

    let points_of_interest: Vec<PoiView> = pois
        .iter()
        .map(|poi| project_point_of_interest(poi, &ctx))
        .collect();

    tracing::debug!(
        session = %snapshot.session_id,
        %viewer,
        pois = points_of_interest.len(),
        links = links.len(),
        obscured = effects.is_obscured(),
        "projected match view"
    );

    MatchView {
        session_id: snapshot.session_id,
        viewer,
        generated_at: snapshot.now,
        obscured: effects.is_obscured(),
        obscured_until: effects.obscured_until(),
        points_of_interest,
        links,
        quests,
        quest_root_point_of_interest_ids,
        tracked_point_of_interest_ids: tracked,
        current_zone_id,
    }
}
