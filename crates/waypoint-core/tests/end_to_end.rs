//! End-to-end tests for the Waypoint core data flow.
//!
//! Snapshots are built as JSON in the camelCase shape the API serves, then
//! decoded, validated, and projected for one viewer.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::arithmetic_side_effects
)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Value, json};
use waypoint_core::{
    AdjacencyClusterer, CaptureResolver, CoreError, EngineConfig, MatchSnapshot,
    controlling_entity, project_match, scramble_text, team_color,
};
use waypoint_types::{
    ChallengeId, EntityId, PoiId, PointOfInterest, SessionId, Submission, SubmissionId,
};

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(seconds)
}

struct Fixture {
    poi: PoiId,
    tier_one: ChallengeId,
    tier_two: ChallengeId,
    neighbor: PoiId,
    neighbor_challenge: ChallengeId,
}

impl Fixture {
    fn new() -> Self {
        Self {
            poi: PoiId::new(),
            tier_one: ChallengeId::new(),
            tier_two: ChallengeId::new(),
            neighbor: PoiId::new(),
            neighbor_challenge: ChallengeId::new(),
        }
    }

    /// Two POIs roughly 330 m apart; `poi` carries tiers 1 and 2.
    fn points_of_interest(&self) -> Value {
        json!([
            {
                "id": self.poi,
                "coordinate": { "latitude": 44.9778, "longitude": -93.265 },
                "clue": "Where the falls once turned the mills",
                "name": "Mill Ruins",
                "description": "Ruins of the washburn mill.",
                "imageUrl": "https://img.example/mill.png",
                "tags": [],
                "challenges": [
                    { "id": self.tier_one, "poiId": self.poi, "tier": 1,
                      "question": "How many stories tall?", "rewardItemId": 1 },
                    { "id": self.tier_two, "poiId": self.poi, "tier": 2,
                      "question": "What year did it burn?", "rewardItemId": 2 }
                ]
            },
            {
                "id": self.neighbor,
                "coordinate": { "latitude": 44.9808, "longitude": -93.265 },
                "clue": "Stone arches over the river",
                "challenges": [
                    { "id": self.neighbor_challenge, "poiId": self.neighbor, "tier": 1,
                      "question": "How many arches?" }
                ]
            }
        ])
    }

    fn poi(&self) -> PointOfInterest {
        serde_json::from_value(self.points_of_interest()[0].clone()).unwrap()
    }
}

fn correct(challenge: ChallengeId, entity: EntityId, t: i64) -> Submission {
    Submission {
        id: SubmissionId::new(),
        challenge_id: challenge,
        entity_id: entity,
        is_correct: true,
        created_at: at(t),
    }
}

#[test]
fn two_team_capture_scenario() {
    let fixture = Fixture::new();
    let poi = fixture.poi();
    let (t1, t2) = (EntityId::new(), EntityId::new());

    let mut log = vec![
        correct(fixture.tier_one, t1, 0),
        correct(fixture.tier_two, t2, 5),
    ];
    let control = controlling_entity(&poi, &log).unwrap();
    assert_eq!(control.entity_id, t2);
    assert_eq!(control.tier, 2);

    log.push(correct(fixture.tier_two, t1, 10));
    let control = controlling_entity(&poi, &log).unwrap();
    assert_eq!(control.entity_id, t2);
    assert_eq!(control.tier, 2);
    assert_eq!(control.captured_at, at(5));

    // Polling the same log again yields the same answer.
    let resolver = CaptureResolver::new(&log);
    assert_eq!(resolver.controlling_entity(&poi), Some(control));
}

#[test]
fn snapshot_projection_for_viewer() {
    let fixture = Fixture::new();
    let (team, rival) = (EntityId::new(), EntityId::new());
    let session = SessionId::new();
    let now = at(100);

    let raw = json!({
        "sessionId": session,
        "now": now,
        "pointsOfInterest": fixture.points_of_interest(),
        "submissions": [
            { "id": SubmissionId::new(), "challengeId": fixture.tier_one, "entityId": team,
              "isCorrect": true, "createdAt": at(0) },
            { "id": SubmissionId::new(), "challengeId": fixture.neighbor_challenge,
              "entityId": team, "isCorrect": true, "createdAt": at(3) },
            { "id": SubmissionId::new(), "challengeId": fixture.tier_two, "entityId": rival,
              "isCorrect": false, "createdAt": at(4) }
        ],
        "discoveries": [
            { "entityId": team, "poiId": fixture.poi, "createdAt": at(0) },
            { "entityId": team, "poiId": fixture.neighbor, "createdAt": at(1) },
            { "entityId": rival, "poiId": fixture.poi, "createdAt": at(2) }
        ],
        "effects": [
            { "itemId": 1, "targetEntityId": EntityId::new(), "appliesAgainstEntityId": rival,
              "expiresAt": at(400) }
        ],
        "locations": { (team.to_string()): "44.9779,-93.265,8" }
    });
    let snapshot = MatchSnapshot::from_json(&raw.to_string()).unwrap();
    let config = EngineConfig::default();
    let mut clusterer = AdjacencyClusterer::from_config(&config.adjacency);

    let view = project_match(&snapshot, team, &config, &mut clusterer);
    assert!(view.obscured);
    assert_eq!(view.obscured_until, Some(at(400)));
    assert_eq!(view.points_of_interest.len(), 2);

    let mill = view.points_of_interest.iter().find(|p| p.id == fixture.poi).unwrap();
    assert_eq!(mill.name.as_deref(), Some("Mill Ruins"));
    let expected_clue = scramble_text("Where the falls once turned the mills", &team.to_string());
    assert_eq!(mill.clue, expected_clue);
    assert_eq!(mill.control.map(|c| c.entity_id), Some(team));
    assert!(mill.distance_meters.unwrap() < 20.0);
    let tier_two = mill.challenges.iter().find(|c| c.tier == 2).unwrap();
    assert!(tier_two.can_submit);
    let tier_one = mill.challenges.iter().find(|c| c.tier == 1).unwrap();
    assert!(tier_one.spent);
    assert!(!tier_one.can_submit);

    // The team holds both ends, so the single link is drawn in its color.
    assert_eq!(view.links.len(), 1);
    assert_eq!(view.links[0].style.color, team_color(team));
    assert_eq!(view.links[0].style.opacity, 1.0);

    // The caster sees plain text, no location, and no link: it has only
    // discovered one end.
    let rival_view = project_match(&snapshot, rival, &config, &mut clusterer);
    assert!(!rival_view.obscured);
    let rival_mill = rival_view
        .points_of_interest
        .iter()
        .find(|p| p.id == fixture.poi)
        .unwrap();
    assert_eq!(rival_mill.clue, "Where the falls once turned the mills");
    assert!(rival_mill.distance_meters.is_none());
    assert!(rival_view.links.is_empty());
    let neighbor = rival_view
        .points_of_interest
        .iter()
        .find(|p| p.id == fixture.neighbor)
        .unwrap();
    assert!(neighbor.name.is_none());
}

#[test]
fn pair_memo_is_shared_across_viewers_in_a_session() {
    let fixture = Fixture::new();
    let pois: Vec<PointOfInterest> =
        serde_json::from_value(fixture.points_of_interest()).unwrap();
    let session = SessionId::new();
    let mut clusterer = AdjacencyClusterer::default();

    let first = clusterer.unique_pairs_within_distance(session, &pois);
    let second = clusterer.unique_pairs_within_distance(session, &pois);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 1);

    let next_match = clusterer.unique_pairs_within_distance(SessionId::new(), &pois);
    assert!(!Arc::ptr_eq(&first, &next_match));
    assert_eq!(*first, *next_match);
}

#[test]
fn malformed_snapshots_are_typed_errors() {
    let fixture = Fixture::new();
    let mut pois = fixture.points_of_interest();
    pois[0]["coordinate"]["latitude"] = json!(123.0);
    let raw = json!({
        "sessionId": SessionId::new(),
        "now": at(0),
        "pointsOfInterest": pois,
    });
    let err = MatchSnapshot::from_json(&raw.to_string()).unwrap_err();
    assert!(matches!(err, CoreError::InvalidCoordinate { poi, .. } if poi == fixture.poi));

    let not_numeric = r#"{"sessionId": "00000000-0000-0000-0000-000000000000", "now": 5}"#;
    assert!(matches!(
        MatchSnapshot::from_json(not_numeric),
        Err(CoreError::Json { .. })
    ));
}
