//! Core records read by the engine.
//!
//! These mirror the JSON collections delivered by the upstream API: points
//! of interest with nested challenges, the append-only submission and
//! discovery logs, inventory item effects, and quest trees. The engine
//! only reads them; nothing in the workspace mutates a record after it is
//! deserialized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ItemKind;
use crate::ids::{ChallengeId, EntityId, ItemId, PoiId, QuestId, SubmissionId, TagId, ZoneId};

// ---------------------------------------------------------------------------
// Coordinate
// ---------------------------------------------------------------------------

/// A WGS84 position in decimal degrees.
///
/// Values arriving from the API are assumed valid. Untrusted input should
/// go through the validating constructors in `waypoint-world`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Coordinate {
    /// Latitude in degrees, -90 to 90.
    pub latitude: f64,
    /// Longitude in degrees, -180 to 180.
    pub longitude: f64,
}

impl Coordinate {
    /// Construct a coordinate without range checks.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

// ---------------------------------------------------------------------------
// Points of interest and challenges
// ---------------------------------------------------------------------------

/// A label attached to POIs, used for quest filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Tag {
    /// Tag identifier.
    pub id: TagId,
    /// Display name; tag filtering matches on this.
    pub name: String,
}

/// One tiered question attached to a point of interest.
///
/// Tiers are ordered per POI, 1 being the first and lowest. Cracking a
/// higher tier subsumes every lower one for control purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Challenge {
    /// Challenge identifier.
    pub id: ChallengeId,
    /// The POI this challenge belongs to.
    pub poi_id: PoiId,
    /// Position in the POI's tier ladder (1 = lowest).
    pub tier: u32,
    /// Question text shown to players. Subject to effect transforms.
    pub question: String,
    /// Item awarded for the first correct answer, if any.
    #[serde(default)]
    pub reward_item_id: Option<ItemId>,
}

/// A real-world location carrying one or more tiered challenges.
///
/// `name`, `description`, and `image_url` are only shown to entities that
/// have discovered the POI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PointOfInterest {
    /// POI identifier.
    pub id: PoiId,
    /// Anchor position.
    pub coordinate: Coordinate,
    /// Clue text shown before and after discovery. Subject to effect transforms.
    pub clue: String,
    /// Display name, revealed on discovery.
    #[serde(default)]
    pub name: String,
    /// Long-form description, revealed on discovery.
    #[serde(default)]
    pub description: String,
    /// Image URL, revealed on discovery.
    #[serde(default)]
    pub image_url: String,
    /// Tags used for quest filtering.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Tiered challenges in authoring order.
    #[serde(default)]
    pub challenges: Vec<Challenge>,
}

impl PointOfInterest {
    /// Look up one of this POI's challenges by id.
    pub fn challenge(&self, id: ChallengeId) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id == id)
    }

    /// Highest tier defined on this POI, or `None` when it has no challenges.
    pub fn max_tier(&self) -> Option<u32> {
        self.challenges.iter().map(|c| c.tier).max()
    }
}

// ---------------------------------------------------------------------------
// Zones
// ---------------------------------------------------------------------------

/// An authored map region bounded by a polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Zone {
    /// Zone identifier.
    pub id: ZoneId,
    /// Display name.
    pub name: String,
    /// Author description.
    #[serde(default)]
    pub description: String,
    /// Outer ring of the boundary polygon.
    #[serde(default)]
    pub boundary_coords: Vec<Coordinate>,
}

// ---------------------------------------------------------------------------
// Append-only logs
// ---------------------------------------------------------------------------

/// One answer submitted by an entity against a challenge.
///
/// The log is append-only. An entity may submit many times per challenge;
/// only correct submissions count toward control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Submission {
    /// Submission identifier.
    pub id: SubmissionId,
    /// The challenge answered.
    pub challenge_id: ChallengeId,
    /// The submitting team or solo user.
    pub entity_id: EntityId,
    /// Whether the judge accepted the answer.
    pub is_correct: bool,
    /// Server-side creation time; the tie-break key for control.
    pub created_at: DateTime<Utc>,
}

/// Record that a POI's content has been revealed to one entity.
///
/// Discovery state is never shared: a team discovering a POI does not
/// reveal it to its members playing solo, and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Discovery {
    /// The discovering entity.
    pub entity_id: EntityId,
    /// The POI revealed.
    pub poi_id: PoiId,
    /// When the discovery happened.
    pub created_at: DateTime<Utc>,
}

/// A time-boxed effect produced by using an inventory item in a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct InventoryItemEffect {
    /// Catalogue id of the item used.
    pub item_id: ItemId,
    /// Scope the effect was recorded against (the match or roster it lands on).
    pub target_entity_id: EntityId,
    /// The entity that cast the effect. Its own view is never transformed;
    /// every other entity's is.
    pub applies_against_entity_id: EntityId,
    /// The effect is active strictly before this instant.
    pub expires_at: DateTime<Utc>,
}

impl InventoryItemEffect {
    /// Classify the item behind this effect.
    pub const fn kind(&self) -> ItemKind {
        ItemKind::from_item_id(self.item_id)
    }
}

// ---------------------------------------------------------------------------
// Quests
// ---------------------------------------------------------------------------

/// One step in a quest tree: a challenge and the node it unlocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Objective {
    /// The challenge that completes this objective.
    pub challenge: Challenge,
    /// The node unlocked once this objective is complete, if the branch continues.
    #[serde(default)]
    pub next_node: Option<Box<QuestNode>>,
    /// Completion as reported by the quest-log API for the requesting entity.
    #[serde(default)]
    pub is_completed: bool,
}

/// A quest node: a POI plus the ordered objectives to clear there.
///
/// Authoring data is a DAG in practice, so the same node may hang under
/// several parents. Traversals guard against revisits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct QuestNode {
    /// The POI this node takes place at.
    pub point_of_interest: PointOfInterest,
    /// Objectives in display order.
    #[serde(default)]
    pub objectives: Vec<Objective>,
}

/// A quest rooted at a single node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Quest {
    /// Quest identifier.
    pub id: QuestId,
    /// Display name.
    pub name: String,
    /// Long-form description.
    #[serde(default)]
    pub description: String,
    /// Cover image URL.
    #[serde(default)]
    pub image_url: String,
    /// Entry node of the quest tree.
    pub root_node: QuestNode,
    /// Completion as reported by the quest-log API.
    #[serde(default)]
    pub is_completed: bool,
}
