//! Tree and simulation configuration.

use serde::{Deserialize, Serialize};
use tracing::info;
use std::path::Path;

use crate::error::ConfigError;
use crate::geometry::AxisAlignedBox;

/// Default config file name used by [`Config::load`].
pub const CONFIG_FILE: &str = "quadtree.toml";

/// Clearance kept between spawned particles and the region edge, so that
/// every particle is strictly inside the root.
pub const SPAWN_EDGE_GAP: f64 = 1e-9;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub region: RegionConfig,
    #[serde(default)]
    pub scenario: ScenarioConfig,
}

impl Config {
    /// Load configuration from `quadtree.toml` or write and use defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load configuration from `path`, creating it with defaults if missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Self::from_toml(&contents)?
        } else {
            info!("No {} found, creating default config", path.display());
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            default_config
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section for values the tree cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tree.validate()?;
        self.region.validate()?;
        self.scenario.validate()?;
        if self.scenario.max_radius + SPAWN_EDGE_GAP >= self.region.half_width {
            return Err(ConfigError::Invalid(format!(
                "scenario.max_radius {} plus edge gap {} does not fit inside region half-width {}",
                self.scenario.max_radius, SPAWN_EDGE_GAP, self.region.half_width
            )));
        }
        Ok(())
    }
}

/// Subdivision parameters shared by every node of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TreeConfig {
    /// Width at or below which nodes stop subdividing.
    #[serde(default = "default_min_width")]
    pub min_width: f64,
    /// Objects a node stores directly before it subdivides.
    #[serde(default = "default_max_objects")]
    pub max_objects: usize,
    /// What a full node does with an object that straddles its quadrants.
    #[serde(default)]
    pub overflow: Overflow,
}

/// Handling of straddling objects arriving at a full, subdivided node.
///
/// Leaves at the width floor accept every object regardless of this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Overflow {
    /// Store it anyway, letting the node exceed `max_objects`.
    #[default]
    Keep,
    /// Refuse it with [`InsertError::CapacityExceeded`](crate::InsertError::CapacityExceeded).
    Reject,
}

impl TreeConfig {
    pub fn new(min_width: f64, max_objects: usize) -> Self {
        Self { min_width, max_objects, overflow: Overflow::default() }
    }

    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_width.is_finite() || self.min_width <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tree.min_width must be finite and positive, got {}",
                self.min_width
            )));
        }
        if self.max_objects == 0 {
            return Err(ConfigError::Invalid("tree.max_objects must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            min_width: default_min_width(),
            max_objects: default_max_objects(),
            overflow: Overflow::default(),
        }
    }
}

fn default_min_width() -> f64 {
    0.01
}
fn default_max_objects() -> usize {
    4
}

/// Square region covered by the root node.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RegionConfig {
    #[serde(default = "default_center")]
    pub center_x: f64,
    #[serde(default = "default_center")]
    pub center_y: f64,
    #[serde(default = "default_half_width")]
    pub half_width: f64,
}

impl RegionConfig {
    pub fn bounds(&self) -> AxisAlignedBox {
        AxisAlignedBox::from_center(self.center_x, self.center_y, self.half_width)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.center_x.is_finite() || !self.center_y.is_finite() {
            return Err(ConfigError::Invalid("region center must be finite".into()));
        }
        if !self.half_width.is_finite() || self.half_width <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "region.half_width must be finite and positive, got {}",
                self.half_width
            )));
        }
        Ok(())
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            center_x: default_center(),
            center_y: default_center(),
            half_width: default_half_width(),
        }
    }
}

fn default_center() -> f64 {
    0.5
}
fn default_half_width() -> f64 {
    0.5
}

/// Random particle scenario driven by the simulation binary.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioConfig {
    /// Particles spawned per round.
    #[serde(default = "default_particles")]
    pub particles: usize,
    #[serde(default = "default_min_radius")]
    pub min_radius: f64,
    #[serde(default = "default_max_radius")]
    pub max_radius: f64,
    /// Number of rebuild rounds.
    #[serde(default = "default_rounds")]
    pub rounds: usize,
    /// Fixed RNG seed; a random one is drawn when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Cross-check every round against the brute-force pair search.
    #[serde(default = "default_verify")]
    pub verify: bool,
}

impl ScenarioConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = self.min_radius >= 0.0 && self.min_radius <= self.max_radius;
        if !(ordered && self.max_radius.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "scenario radii must satisfy 0 <= min_radius <= max_radius, got {}..{}",
                self.min_radius, self.max_radius
            )));
        }
        Ok(())
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            particles: default_particles(),
            min_radius: default_min_radius(),
            max_radius: default_max_radius(),
            rounds: default_rounds(),
            seed: None,
            verify: default_verify(),
        }
    }
}

fn default_particles() -> usize {
    500
}
fn default_min_radius() -> f64 {
    0.002
}
fn default_max_radius() -> f64 {
    0.01
}
fn default_rounds() -> usize {
    10
}
fn default_verify() -> bool {
    true
}
