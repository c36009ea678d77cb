//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `floodadapt-config.yaml` at the
//! project root. Every section and field has a default, so a missing file
//! or an empty section yields the reference model. Both loaders validate
//! before returning: out-of-range values fail here, never mid-run.
//!
//! The `FLOODADAPT_SEED` environment variable overrides `world.seed`.

use std::path::Path;

use floodadapt_agents::{
    BehaviourConfig, ConfigurationError, DistributionSpec, GovernmentConfig,
    HouseholdProfileConfig,
};
use floodadapt_world::{
    ExposureModel, FloodMapConfig, Floodplain, MapDomain, NetworkKind, WorldError,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::scheduler::ActivationOrder;

/// Environment variable overriding `world.seed`.
pub const SEED_ENV_VAR: &str = "FLOODADAPT_SEED";

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

    /// A behaviour, household, or government value is out of range.
    #[error("invalid configuration: {source}")]
    Invalid {
        /// The underlying validation error.
        #[from]
        source: ConfigurationError,
    },

    /// A geographic or network value is out of range.
    #[error("invalid world configuration: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `floodadapt-config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Run-level settings (seed, size, length, activation order).
    #[serde(default)]
    pub world: WorldConfig,

    /// Bounding box households are placed in.
    #[serde(default)]
    pub domain: MapDomain,

    /// Floodplain polygons.
    #[serde(default)]
    pub floodplain: Floodplain,

    /// Flood map used for estimated depths.
    #[serde(default)]
    pub flood_map: FloodMapConfig,

    /// Depth-damage curve.
    #[serde(default)]
    pub exposure: ExposureModel,

    /// Social network generator.
    #[serde(default)]
    pub network: NetworkKind,

    /// Household profile distributions.
    #[serde(default)]
    pub households: HouseholdProfileConfig,

    /// Decision engine parameters.
    #[serde(default)]
    pub behaviour: BehaviourConfig,

    /// Government policy.
    #[serde(default)]
    pub government: GovernmentConfig,

    /// The flood event; `null` disables it.
    #[serde(default = "default_flood_shock")]
    pub flood_shock: Option<FloodShockConfig>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            domain: MapDomain::default(),
            floodplain: Floodplain::default(),
            flood_map: FloodMapConfig::default(),
            exposure: ExposureModel::default(),
            network: NetworkKind::default(),
            households: HouseholdProfileConfig::default(),
            behaviour: BehaviourConfig::default(),
            government: GovernmentConfig::default(),
            flood_shock: default_flood_shock(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or a validation
    /// error if any value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(raw) = std::env::var(SEED_ENV_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => self.world.seed = seed,
                Err(e) => warn!(
                    variable = SEED_ENV_VAR,
                    value = raw,
                    error = %e,
                    "Ignoring unparsable seed override"
                ),
            }
        }
    }

    /// Check every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.domain.validate()?;
        self.floodplain.validate()?;
        self.flood_map.validate()?;
        self.exposure.validate()?;
        let count = usize::try_from(self.world.household_count).unwrap_or(usize::MAX);
        self.network.validate(count)?;
        self.households.validate()?;
        self.behaviour.validate()?;
        self.government.validate()?;
        if let Some(shock) = &self.flood_shock {
            shock.validate()?;
        }
        Ok(())
    }
}

/// Run-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Number of households to spawn.
    #[serde(default = "default_household_count")]
    pub household_count: u32,

    /// Number of ticks to run.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Household activation order within a tick.
    #[serde(default)]
    pub activation: ActivationOrder,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            household_count: default_household_count(),
            max_ticks: default_max_ticks(),
            activation: ActivationOrder::default(),
        }
    }
}

/// The single flood event of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodShockConfig {
    /// Tick at which the flood happens, before households act.
    #[serde(default = "default_shock_tick")]
    pub tick: u64,

    /// Actual depth as a multiple of estimated depth, drawn per household.
    #[serde(default = "default_depth_factor")]
    pub depth_factor: DistributionSpec,
}

impl Default for FloodShockConfig {
    fn default() -> Self {
        Self {
            tick: default_shock_tick(),
            depth_factor: default_depth_factor(),
        }
    }
}

impl FloodShockConfig {
    /// The shock must land on a real tick.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.tick == 0 {
            return Err(ConfigurationError::OutOfRange {
                field: "flood_shock.tick".to_owned(),
                reason: "ticks start at 1".to_owned(),
            });
        }
        self.depth_factor.validate("flood_shock.depth_factor")
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG`
    /// is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn default_seed() -> u64 {
    42
}

const fn default_household_count() -> u32 {
    50
}

const fn default_max_ticks() -> u64 {
    20
}

const fn default_shock_tick() -> u64 {
    5
}

const fn default_depth_factor() -> DistributionSpec {
    DistributionSpec::Uniform {
        low: 0.5,
        high: 1.2,
    }
}

fn default_flood_shock() -> Option<FloodShockConfig> {
    Some(FloodShockConfig::default())
}

fn default_log_level() -> String {
    String::from("info")
}
