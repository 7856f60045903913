//! Configuration loading and typed config structures for the Outpost
//! simulation.
//!
//! The canonical configuration lives in `outpost-config.yaml` at the project
//! root. Every field has a default, so a partial (or empty) file is valid.

use std::path::Path;

use outpost_agents::{SurvivorStats, TaskConfig, YieldTable};
use outpost_types::{JobKind, RegionCoord};
use serde::Deserialize;

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

    /// A value parsed but is out of range.
    #[error("invalid config value: {reason}")]
    Invalid {
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `outpost-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World layout and timing.
    #[serde(default)]
    pub world: WorldConfig,

    /// Survivor names and stats.
    #[serde(default)]
    pub survivors: SurvivorConfig,

    /// Movement and action timing.
    #[serde(default)]
    pub tasks: TaskConfig,

    /// Yield tables per prop kind.
    #[serde(default)]
    pub yields: YieldTable,

    /// Enabled jobs.
    #[serde(default)]
    pub jobs: JobsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Run boundaries.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values a run cannot recover from.
    ///
    /// Movement and action timing must let every task finish: survivors need
    /// a positive speed, and the arrival tolerance and action duration must
    /// be finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("world.tick_seconds", self.world.tick_seconds)?;
        positive("survivors.speed", self.survivors.speed)?;
        positive("survivors.height", self.survivors.height)?;
        non_negative("tasks.arrival_epsilon", self.tasks.arrival_epsilon)?;
        non_negative("tasks.action_seconds", self.tasks.action_seconds)?;
        for (name, entry) in [
            ("yields.tree", &self.yields.tree),
            ("yields.crop", &self.yields.crop),
            ("yields.rock", &self.yields.rock),
        ] {
            if !(0.0..=1.0).contains(&entry.secondary_chance) {
                return Err(ConfigError::Invalid {
                    reason: format!(
                        "{name}.secondary_chance must be within [0, 1], got {}",
                        entry.secondary_chance
                    ),
                });
            }
        }
        Ok(())
    }
}

fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            reason: format!("{name} must be finite and positive, got {value}"),
        })
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            reason: format!("{name} must be finite and non-negative, got {value}"),
        })
    }
}

/// World layout and timing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable colony name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds between ticks (0 runs flat out).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Simulated seconds covered by one tick.
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: f32,

    /// Regions along x.
    #[serde(default = "default_grid_side")]
    pub width: u32,

    /// Regions along z.
    #[serde(default = "default_grid_side")]
    pub depth: u32,

    /// Tiles per region side.
    #[serde(default = "default_region_size")]
    pub region_size: u32,

    /// Regions laid out as grass, as `[x, y]` pairs.
    #[serde(default = "default_grass_regions")]
    pub grass_regions: Vec<[u32; 2]>,

    /// Trees planted per forest region.
    #[serde(default = "default_trees_per_forest")]
    pub trees_per_forest: u32,

    /// Crops planted per grass region.
    #[serde(default = "default_crops_per_grass")]
    pub crops_per_grass: u32,
}

impl WorldConfig {
    /// Grass region coordinates.
    pub fn grass_coords(&self) -> impl Iterator<Item = RegionCoord> + '_ {
        self.grass_regions.iter().map(|[x, y]| RegionCoord::new(*x, *y))
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
            tick_seconds: default_tick_seconds(),
            width: default_grid_side(),
            depth: default_grid_side(),
            region_size: default_region_size(),
            grass_regions: default_grass_regions(),
            trees_per_forest: default_trees_per_forest(),
            crops_per_grass: default_crops_per_grass(),
        }
    }
}

/// Survivor configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SurvivorConfig {
    /// Name pool survivors draw from.
    #[serde(default = "default_names")]
    pub names: Vec<String>,

    /// Survivors spawned at the shelter.
    #[serde(default = "default_survivor_count")]
    pub count: u32,

    /// Movement speed in world units per second.
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// Body height in world units.
    #[serde(default = "default_height")]
    pub height: f32,
}

impl SurvivorConfig {
    /// Stats shared by every spawned survivor.
    pub const fn stats(&self) -> SurvivorStats {
        SurvivorStats {
            height: self.height,
            speed: self.speed,
        }
    }
}

impl Default for SurvivorConfig {
    fn default() -> Self {
        Self {
            names: default_names(),
            count: default_survivor_count(),
            speed: default_speed(),
            height: default_height(),
        }
    }
}

/// Job registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobsConfig {
    /// Job kinds available to the player.
    #[serde(default = "default_enabled_jobs")]
    pub enabled: Vec<JobKind>,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_jobs(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Run boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop after this many ticks.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Stop early once no survivor has work and no input is pending.
    #[serde(default = "default_true")]
    pub stop_when_idle: bool,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            stop_when_idle: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Outpost".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    0
}

const fn default_tick_seconds() -> f32 {
    0.1
}

const fn default_grid_side() -> u32 {
    5
}

const fn default_region_size() -> u32 {
    8
}

fn default_grass_regions() -> Vec<[u32; 2]> {
    vec![[1, 2], [3, 2]]
}

const fn default_trees_per_forest() -> u32 {
    4
}

const fn default_crops_per_grass() -> u32 {
    4
}

fn default_names() -> Vec<String> {
    [
        "Ash", "Briar", "Cole", "Dell", "Ember", "Fenn", "Gale", "Hollis",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

const fn default_survivor_count() -> u32 {
    2
}

const fn default_speed() -> f32 {
    3.0
}

const fn default_height() -> f32 {
    2.0
}

fn default_enabled_jobs() -> Vec<JobKind> {
    JobKind::ALL.to_vec()
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_max_ticks() -> u64 {
    600
}

const fn default_true() -> bool {
    true
}
