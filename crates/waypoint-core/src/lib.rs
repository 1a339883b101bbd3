//! Quest progression and territory capture for the Waypoint engine.
//!
//! Everything here is a pure query over data fetched elsewhere: the static
//! POI and quest graph, plus the append-only submission, discovery, and
//! effect logs. Nothing is stored on the records themselves. Control,
//! completion, and visibility are recomputed on every read, so repeated
//! polling of a growing log is always safe.
//!
//! # Data flow
//!
//! ```text
//! quests ──► reachable POIs ──► control per POI ──► adjacency links ──► effects ──► view
//!                                       ▲
//!                          proximity gate (per action)
//! ```
//!
//! # Modules
//!
//! - [`quest`] -- Quest tree traversal: next-task lookup, progress,
//!   completion-gated POI collection.
//! - [`capture`] -- [`CaptureResolver`]: controlling entity, tier locks,
//!   submit eligibility.
//! - [`adjacency`] -- [`AdjacencyClusterer`] pair memo and control-link styling.
//! - [`discovery`] -- Per-entity discovery lookups.
//! - [`effects`] -- Active item effects and the seeded text scramble.
//! - [`view`] -- Per-viewer projection of a whole [`MatchSnapshot`].
//! - [`config`] -- Configuration loading from `waypoint-config.yaml`.
//! - [`error`] -- [`CoreError`] for malformed input.
//!
//! [`CaptureResolver`]: capture::CaptureResolver
//! [`AdjacencyClusterer`]: adjacency::AdjacencyClusterer
//! [`MatchSnapshot`]: view::MatchSnapshot
//! [`CoreError`]: error::CoreError

pub mod adjacency;
pub mod capture;
pub mod config;
pub mod discovery;
pub mod effects;
pub mod error;
pub mod quest;
pub mod view;

pub use adjacency::{
    AdjacencyClusterer, AdjacencyPair, DEFAULT_ADJACENCY_THRESHOLD_METERS, Link, LinkStyle,
    resolve_link_style, team_color, visible_links,
};
pub use capture::{CaptureResolver, Control, TierScope, controlling_entity};
pub use config::{ConfigError, EngineConfig};
pub use discovery::{DiscoveryIndex, has_discovered};
pub use effects::{EffectModifier, active_effects_against, scramble_text};
pub use error::CoreError;
pub use quest::{NodeKey, NodeMatch, Progress, count_progress, find_node_for_challenge};
pub use view::{MatchSnapshot, MatchView, PoiView, project_match, project_point_of_interest};
