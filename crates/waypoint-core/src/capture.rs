//! Territory control derived from the submission log.
//!
//! Control is never stored. It is recomputed from the append-only
//! [`Submission`] log on every read, so the same snapshot always yields
//! the same answer no matter how often the caller polls.
//!
//! # Resolution rules
//!
//! 1. Only correct submissions count.
//! 2. Tiers are scanned from highest to lowest. The first tier holding a
//!    correct submission decides control: cracking tier III implicitly
//!    holds tiers I and II.
//! 3. Within that tier the earliest `created_at` wins; identical
//!    timestamps fall back to the lowest submission id. Array order in the
//!    log never matters.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;
use waypoint_types::{
    Challenge, ChallengeId, Coordinate, EntityId, PointOfInterest, Submission, SubmissionId,
};
use waypoint_world::{ProximityAction, ProximityThresholds};

/// The entity holding a POI and the winning submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    /// The controlling team or solo player.
    pub entity_id: EntityId,
    /// Highest tier with a correct submission.
    pub tier: u32,
    /// Challenge the winning submission answered.
    pub challenge_id: ChallengeId,
    /// The winning submission.
    pub submission_id: SubmissionId,
    /// When the winning submission was made.
    pub captured_at: DateTime<Utc>,
}

/// Which correct submissions close a tier in [`CaptureResolver::tier_map`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierScope {
    /// A correct answer by anyone spends the tier.
    Global,
    /// Only this entity's correct answers close a tier.
    Entity(EntityId),
}

impl TierScope {
    fn admits(self, submission: &Submission) -> bool {
        match self {
            Self::Global => true,
            Self::Entity(entity) => submission.entity_id == entity,
        }
    }
}

/// Index of correct submissions by challenge, answering per-POI control
/// queries.
#[derive(Debug, Clone, Default)]
pub struct CaptureResolver<'a> {
    /// Correct submissions per challenge, earliest first.
    correct: HashMap<ChallengeId, Vec<&'a Submission>>,
}

impl<'a> CaptureResolver<'a> {
    /// Index the global submission log.
    pub fn new(submissions: &'a [Submission]) -> Self {
        let mut correct: HashMap<ChallengeId, Vec<&'a Submission>> = HashMap::new();
        for submission in submissions.iter().filter(|s| s.is_correct) {
            correct.entry(submission.challenge_id).or_default().push(submission);
        }
        for list in correct.values_mut() {
            list.sort_by_key(|s| (s.created_at, s.id));
        }
        tracing::trace!(
            submissions = submissions.len(),
            challenges = correct.len(),
            "indexed correct submissions"
        );
        Self { correct }
    }

    /// Earliest correct submission for `challenge`, if any.
    pub fn first_correct(&self, challenge: ChallengeId) -> Option<&'a Submission> {
        self.correct.get(&challenge).and_then(|list| list.first().copied())
    }

    /// Resolve the entity controlling `poi`, or `None` when it is unclaimed.
    pub fn controlling_entity(&self, poi: &PointOfInterest) -> Option<Control> {
        let control = tiers_descending(poi).find_map(|(tier, challenges)| {
            challenges
                .iter()
                .filter_map(|c| self.first_correct(c.id))
                .min_by_key(|s| (s.created_at, s.id))
                .map(|winner| Control {
                    entity_id: winner.entity_id,
                    tier,
                    challenge_id: winner.challenge_id,
                    submission_id: winner.id,
                    captured_at: winner.created_at,
                })
        });
        tracing::trace!(
            poi = %poi.id,
            controller = ?control.map(|c| c.entity_id),
            tier = ?control.map(|c| c.tier),
            "resolved control"
        );
        control
    }

    /// Whether `entity` currently controls `poi`.
    pub fn is_controlled_by(&self, poi: &PointOfInterest, entity: EntityId) -> bool {
        self.controlling_entity(poi)
            .is_some_and(|control| control.entity_id == entity)
    }

    /// Per-tier lock state for `poi`.
    ///
    /// Every tier defined on the POI appears as a key. A tier maps to `true`
    /// when it is at or below the highest tier holding a correct submission
    /// admitted by `scope`.
    pub fn tier_map(&self, poi: &PointOfInterest, scope: TierScope) -> BTreeMap<u32, bool> {
        let highest_closed = tiers_descending(poi)
            .find(|(_, challenges)| {
                challenges.iter().any(|c| {
                    self.correct
                        .get(&c.id)
                        .is_some_and(|list| list.iter().any(|s| scope.admits(s)))
                })
            })
            .map(|(tier, _)| tier);

        poi.challenges
            .iter()
            .map(|c| (c.tier, highest_closed.is_some_and(|high| c.tier <= high)))
            .collect()
    }

    /// Whether anyone has answered `challenge` correctly.
    pub fn is_challenge_spent(&self, challenge: ChallengeId) -> bool {
        self.first_correct(challenge).is_some()
    }

    /// Whether `entity` has answered `challenge` correctly.
    pub fn has_completed(&self, challenge: ChallengeId, entity: EntityId) -> bool {
        self.correct
            .get(&challenge)
            .is_some_and(|list| list.iter().any(|s| s.entity_id == entity))
    }

    /// Objective-completion predicate for `entity`, suitable for
    /// [`count_progress`](crate::quest::count_progress).
    pub fn is_objective_complete_for(
        &self,
        entity: EntityId,
    ) -> impl Fn(ChallengeId) -> bool + '_ {
        move |challenge| self.has_completed(challenge, entity)
    }

    /// Whether an entity at `location` may submit an answer to `challenge`.
    ///
    /// Requires capture range to `poi` and a challenge nobody has cracked yet.
    pub fn can_submit_answer(
        &self,
        challenge: &Challenge,
        location: Option<Coordinate>,
        poi: &PointOfInterest,
        thresholds: &ProximityThresholds,
    ) -> bool {
        thresholds.allows(ProximityAction::Capture, location, poi.coordinate)
            && !self.is_challenge_spent(challenge.id)
    }
}

/// One-shot control resolution without keeping an index around.
pub fn controlling_entity(poi: &PointOfInterest, submissions: &[Submission]) -> Option<Control> {
    CaptureResolver::new(submissions).controlling_entity(poi)
}

/// A POI's challenges grouped by tier, highest tier first.
fn tiers_descending(poi: &PointOfInterest) -> impl Iterator<Item = (u32, Vec<&Challenge>)> {
    let mut by_tier: BTreeMap<u32, Vec<&Challenge>> = BTreeMap::new();
    for challenge in &poi.challenges {
        by_tier.entry(challenge.tier).or_default().push(challenge);
    }
    by_tier.into_iter().rev()
}
