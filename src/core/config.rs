//! Layout generation configuration with documented constants
//!
//! One immutable `LayoutConfig` is built up front and handed to the
//! generation pipeline by reference. Nothing downstream mutates it.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{LayoutError, Result};

/// Configuration for town layout generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Seed for the single generator every random draw comes from
    pub seed: u64,

    // === LAND SUBDIVISION ===
    /// Side length of the square plot of land (abstract km)
    ///
    /// Must be a power of two so quadtree cells land on even grid lines.
    /// The street grid has `land_size / 2 + 1` streets per axis.
    pub land_size: u32,

    /// Number of cluster centres sampled points gather around
    pub loci: usize,

    /// Number of points inserted into the quadtree
    ///
    /// More samples = more splits = smaller leaves and fewer tracts.
    pub samples: usize,

    /// Items a quadtree node holds before it splits
    pub quadtree_capacity: usize,

    /// Hard depth limit for quadtree splitting
    pub quadtree_max_depth: u32,

    // === TRACTS ===
    /// Layouts with fewer tracts than this are thrown away and regenerated
    pub min_tracts: usize,

    /// Upper bound on regeneration attempts before giving up
    pub max_generation_attempts: u32,

    // === STREET NAMES ===
    /// Chance an east-west street gets an ordinal name ("3rd Street")
    pub chance_street_gets_numbered_name: f64,

    /// Chance a north-south avenue gets an ordinal name ("3rd Avenue")
    pub chance_avenue_gets_numbered_name: f64,

    // === PARALLELIZATION ===
    /// Minimum parcel pair count before the distance table is built in parallel
    ///
    /// Below this threshold, thread overhead exceeds benefits.
    pub parallel_threshold: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: 0,

            land_size: 16,
            loci: 3,
            samples: 32,
            quadtree_capacity: 10,
            quadtree_max_depth: 20,

            min_tracts: 3,
            max_generation_attempts: 64,

            chance_street_gets_numbered_name: 0.8,
            chance_avenue_gets_numbered_name: 0.0,

            parallel_threshold: 256,
        }
    }
}

impl LayoutConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Parse a config from TOML; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: LayoutConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Number of the outermost street on either axis
    pub fn border_street_number(&self) -> i32 {
        (self.land_size / 2) as i32 + 1
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.land_size < 4 || !self.land_size.is_power_of_two() {
            return Err(LayoutError::InvalidConfig(format!(
                "land_size ({}) must be a power of two no smaller than 4",
                self.land_size
            )));
        }

        if self.loci == 0 || self.samples == 0 {
            return Err(LayoutError::InvalidConfig(
                "loci and samples must both be positive".into(),
            ));
        }

        if self.quadtree_capacity == 0 {
            return Err(LayoutError::InvalidConfig(
                "quadtree_capacity must be positive".into(),
            ));
        }

        if self.max_generation_attempts == 0 {
            return Err(LayoutError::InvalidConfig(
                "max_generation_attempts must be positive".into(),
            ));
        }

        for (name, chance) in [
            ("chance_street_gets_numbered_name", self.chance_street_gets_numbered_name),
            ("chance_avenue_gets_numbered_name", self.chance_avenue_gets_numbered_name),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(LayoutError::InvalidConfig(format!(
                    "{} ({}) must lie in [0, 1]",
                    name, chance
                )));
            }
        }

        Ok(())
    }
}
