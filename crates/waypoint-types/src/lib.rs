//! Shared type definitions for the Waypoint quest and territory engine.
//!
//! This crate is the single source of truth for the records the engine
//! reads from the upstream API. Types defined here flow to `TypeScript`
//! via `ts-rs` for the map and quest-log clients.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all record identifiers
//! - [`enums`] -- Inventory item classification
//! - [`structs`] -- POIs, challenges, zones, submission/discovery logs, effects, quests

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::ItemKind;
pub use ids::{
    ChallengeId, EntityId, ItemId, PoiId, QuestId, SessionId, SubmissionId, TagId, ZoneId,
};
pub use structs::{
    Challenge, Coordinate, Discovery, InventoryItemEffect, Objective, PointOfInterest, Quest,
    QuestNode, Submission, Tag, Zone,
};
