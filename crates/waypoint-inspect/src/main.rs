//! Inspection binary for the Waypoint engine.
//!
//! Loads a JSON match snapshot, runs the full engine data flow for one
//! viewing entity, and prints the projected view as JSON on stdout. Logs
//! go to stderr so the output can be piped.
//!
//! # Startup Sequence
//!
//! 1. Parse arguments
//! 2. Load configuration from `waypoint-config.yaml` (or `--config`)
//! 3. Initialize structured logging (tracing)
//! 4. Decode and validate the snapshot
//! 5. Project the match for the viewer and write it out

mod error;

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;
use tracing_subscriber::EnvFilter;
use waypoint_core::config::{EngineConfig, LogFormat, LoggingConfig};
use waypoint_core::{AdjacencyClusterer, MatchSnapshot, project_match};
use waypoint_types::EntityId;

use crate::error::InspectError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "waypoint-config.yaml";

/// Parsed command line.
#[derive(Debug)]
struct Args {
    snapshot: PathBuf,
    viewer: EntityId,
    config: PathBuf,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if argument parsing, configuration, snapshot decoding,
/// or output fails.
fn main() -> Result<(), InspectError> {
    // 1. Parse arguments.
    let args = parse_args(std::env::args().skip(1))?;

    // 2. Load configuration.
    let (config, from_file) = load_config(&args.config)?;

    // 3. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        config = %args.config.display(),
        from_file,
        adjacency_threshold_m = config.adjacency.threshold_meters,
        capture_range_m = config.proximity.capture_meters,
        "Configuration loaded"
    );

    // 4. Decode and validate the snapshot.
    let raw = std::fs::read_to_string(&args.snapshot).map_err(|source| {
        InspectError::ReadSnapshot {
            path: args.snapshot.clone(),
            source,
        }
    })?;
    let snapshot = MatchSnapshot::from_json(&raw)?;
    info!(
        session = %snapshot.session_id,
        quests = snapshot.quests.len(),
        points_of_interest = snapshot.points_of_interest.len(),
        submissions = snapshot.submissions.len(),
        "Snapshot loaded"
    );

    // 5. Project and write.
    let mut clusterer = AdjacencyClusterer::from_config(&config.adjacency);
    let view = project_match(&snapshot, args.viewer, &config, &mut clusterer);
    info!(
        viewer = %args.viewer,
        points_of_interest = view.points_of_interest.len(),
        links = view.links.len(),
        obscured = view.obscured,
        "Match projected"
    );

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &view)?;
    writeln!(stdout).map_err(|source| InspectError::Write { source })?;
    Ok(())
}

/// Parse `<snapshot> <viewer> [--config <path>]`.
fn parse_args(mut argv: impl Iterator<Item = String>) -> Result<Args, InspectError> {
    let mut positional = Vec::new();
    let mut config = PathBuf::from(DEFAULT_CONFIG_PATH);

    while let Some(arg) = argv.next() {
        if arg == "--config" {
            let path = argv.next().ok_or_else(|| InspectError::Usage {
                message: String::from("--config needs a path"),
            })?;
            config = PathBuf::from(path);
        } else {
            positional.push(arg);
        }
    }

    let mut positional = positional.into_iter();
    let (Some(snapshot), Some(viewer), None) =
        (positional.next(), positional.next(), positional.next())
    else {
        return Err(InspectError::Usage {
            message: String::from("expected a snapshot path and a viewer id"),
        });
    };

    let viewer = uuid::Uuid::parse_str(&viewer)
        .map(EntityId::from)
        .map_err(|source| InspectError::InvalidViewer {
            value: viewer,
            source,
        })?;

    Ok(Args {
        snapshot: PathBuf::from(snapshot),
        viewer,
        config,
    })
}

/// Load configuration, falling back to defaults when the file is absent.
///
/// The flag is `true` when the file was read.
fn load_config(path: &Path) -> Result<(EngineConfig, bool), InspectError> {
    if path.exists() {
        Ok((EngineConfig::from_file(path)?, true))
    } else {
        Ok((EngineConfig::parse("")?, false))
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init(),
    }
}
