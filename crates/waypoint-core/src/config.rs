//! Configuration loading and typed config structures for the Waypoint engine.
//!
//! The canonical configuration lives in `waypoint-config.yaml`. Every field
//! has a default matching the values the game clients ship with, so an
//! empty or missing file yields a working engine.

use std::path::Path;

use serde::Deserialize;
use waypoint_world::ProximityThresholds;

use crate::adjacency::DEFAULT_ADJACENCY_THRESHOLD_METERS;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override held a value of the wrong type.
    #[error("invalid value for {name}: {value:?}")]
    InvalidOverride {
        /// Environment variable name.
        name: &'static str,
        /// The raw value.
        value: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Environment variable overriding `adjacency.threshold_meters`.
pub const ENV_ADJACENCY_THRESHOLD: &str = "WAYPOINT_ADJACENCY_THRESHOLD_M";

/// Environment variable overriding `logging.level`.
pub const ENV_LOG_LEVEL: &str = "WAYPOINT_LOG_LEVEL";

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Distance thresholds per gated action.
    #[serde(default)]
    pub proximity: ProximityThresholds,

    /// Adjacency clustering parameters.
    #[serde(default)]
    pub adjacency: AdjacencyConfig,

    /// Control-link styling.
    #[serde(default)]
    pub links: LinkConfig,

    /// Capture resolution options.
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `WAYPOINT_ADJACENCY_THRESHOLD_M` overrides `adjacency.threshold_meters`
    /// - `WAYPOINT_LOG_LEVEL` overrides `logging.level`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::InvalidOverride`] for a malformed override.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::InvalidOverride`] for a malformed override.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] when the adjacency threshold
    /// override is not a positive number.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(raw) = lookup(ENV_ADJACENCY_THRESHOLD) {
            let threshold = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .ok_or_else(|| ConfigError::InvalidOverride {
                    name: ENV_ADJACENCY_THRESHOLD,
                    value: raw.clone(),
                })?;
            self.adjacency.threshold_meters = threshold;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        Ok(())
    }
}

/// Adjacency clustering configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdjacencyConfig {
    /// POI pairs strictly closer than this are linked.
    #[serde(default = "default_adjacency_threshold")]
    pub threshold_meters: f64,
}

impl Default for AdjacencyConfig {
    fn default() -> Self {
        Self {
            threshold_meters: default_adjacency_threshold(),
        }
    }
}

/// Styling for control links between adjacent POIs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinkConfig {
    /// Color of links not held end-to-end by one entity.
    #[serde(default = "default_neutral_color")]
    pub neutral_color: String,

    /// Opacity of neutral links.
    #[serde(default = "default_neutral_opacity")]
    pub neutral_opacity: f64,

    /// Opacity of links held end-to-end by one entity.
    #[serde(default = "default_controlled_opacity")]
    pub controlled_opacity: f64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            neutral_color: default_neutral_color(),
            neutral_opacity: default_neutral_opacity(),
            controlled_opacity: default_controlled_opacity(),
        }
    }
}

/// Which submissions close a tier in the per-tier lock display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierScopeMode {
    /// A correct answer by anyone spends the tier.
    #[default]
    Global,
    /// Only the viewing entity's own correct answers close a tier.
    Viewer,
}

/// Capture resolution configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CaptureConfig {
    /// Tier lock semantics for the viewer projection.
    #[serde(default)]
    pub tier_scope: TierScopeMode,
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Line format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_adjacency_threshold() -> f64 {
    DEFAULT_ADJACENCY_THRESHOLD_METERS
}

fn default_neutral_color() -> String {
    String::from("grey")
}

const fn default_neutral_opacity() -> f64 {
    0.5
}

const fn default_controlled_opacity() -> f64 {
    1.0
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_client_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.proximity.capture_meters, 100.0);
        assert_eq!(config.proximity.open_chest_meters, 10.0);
        assert_eq!(config.adjacency.threshold_meters, 800.0);
        assert_eq!(config.links.neutral_color, "grey");
        assert_eq!(config.links.neutral_opacity, 0.5);
        assert_eq!(config.links.controlled_opacity, 1.0);
        assert_eq!(config.capture.tier_scope, TierScopeMode::Global);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r##"
proximity:
  discover_meters: 150.0
  capture_meters: 75.0
  open_chest_meters: 5.0

adjacency:
  threshold_meters: 300.0

links:
  neutral_color: "#888888"
  neutral_opacity: 0.25
  controlled_opacity: 0.9

capture:
  tier_scope: viewer

logging:
  level: debug
  format: json
"##;
        let mut config: EngineConfig = serde_yml::from_str(yaml).unwrap();
        config.apply_overrides(|_| None).unwrap();
        assert_eq!(config.proximity.discover_meters, 150.0);
        assert_eq!(config.proximity.capture_meters, 75.0);
        assert_eq!(config.proximity.open_chest_meters, 5.0);
        assert_eq!(config.adjacency.threshold_meters, 300.0);
        assert_eq!(config.links.neutral_color, "#888888");
        assert_eq!(config.capture.tier_scope, TierScopeMode::Viewer);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: EngineConfig = serde_yml::from_str("links:\n  neutral_opacity: 0.3\n").unwrap();
        assert_eq!(config.links.neutral_opacity, 0.3);
        assert_eq!(config.links.neutral_color, "grey");
        assert_eq!(config.adjacency.threshold_meters, 800.0);
    }

    #[test]
    fn overrides_replace_yaml_values() {
        let mut config = EngineConfig::default();
        config
            .apply_overrides(|name| match name {
                ENV_ADJACENCY_THRESHOLD => Some(String::from("450")),
                ENV_LOG_LEVEL => Some(String::from("trace")),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.adjacency.threshold_meters, 450.0);
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn malformed_threshold_override_is_rejected() {
        let mut config = EngineConfig::default();
        let result = config.apply_overrides(|name| {
            (name == ENV_ADJACENCY_THRESHOLD).then(|| String::from("-5"))
        });
        assert!(matches!(
            result,
            Err(ConfigError::InvalidOverride {
                name: ENV_ADJACENCY_THRESHOLD,
                ..
            })
        ));
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let shipped: EngineConfig =
            serde_yml::from_str(include_str!("../../../waypoint-config.yaml")).unwrap();
        assert_eq!(shipped, EngineConfig::default());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result: Result<EngineConfig, _> = serde_yml::from_str("adjacency: [not, a, map]");
        assert!(result.is_err());
    }
}
