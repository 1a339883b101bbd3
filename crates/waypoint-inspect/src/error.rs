//! Error types for the inspection binary.
//!
//! [`InspectError`] wraps every failure mode between reading arguments and
//! writing the projected view, so `main` can propagate with `?`.

use std::path::PathBuf;

/// Command-line synopsis.
pub const USAGE: &str = "waypoint-inspect <snapshot.json> <viewer-entity-id> [--config <path>]";

/// Top-level error for the inspection binary.
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    /// The command line was not understood.
    #[error("{message}\n\nusage: {usage}", usage = USAGE)]
    Usage {
        /// What was wrong with the arguments.
        message: String,
    },

    /// The viewer argument is not a UUID.
    #[error("invalid viewer id {value:?}: {source}")]
    InvalidViewer {
        /// The raw argument.
        value: String,
        /// The parse failure.
        source: uuid::Error,
    },

    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: waypoint_core::ConfigError,
    },

    /// The snapshot file could not be read.
    #[error("failed to read snapshot {}: {source}", path.display())]
    ReadSnapshot {
        /// Snapshot path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The snapshot failed to decode or validate.
    #[error("snapshot error: {source}")]
    Snapshot {
        /// The underlying core error.
        #[from]
        source: waypoint_core::CoreError,
    },

    /// The projected view could not be written.
    #[error("failed to write view: {source}")]
    Output {
        /// The underlying encode or write error.
        #[from]
        source: serde_json::Error,
    },

    /// Writing to stdout failed.
    #[error("failed to write to stdout: {source}")]
    Write {
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
