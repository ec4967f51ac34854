//! Construction rules with documented defaults
//!
//! Rules are sampled once when a construct starts. The sampled extents are
//! advisory: they guide the caller's generation heuristics and are never
//! enforced by placement itself. The only hard limit is
//! `max_component_cells`, which guards against runaway box sizes.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::error::{Result, ShipwrightError};
use super::types::Cell;

/// Per-axis extent ranges for a construct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionRules {
    // === EXTENTS (advisory) ===
    /// Half-width range along X (cells either side of the centerline)
    ///
    /// X is the primary mirror axis, so extents are measured from zero.
    pub min_x: i32,
    pub max_x: i32,

    /// Half-height range along Y
    pub min_y: i32,
    pub max_y: i32,

    /// Length range along Z (bow to stern)
    pub min_z: i32,
    pub max_z: i32,

    /// Slack allowed beyond the sampled extents before a cell counts as
    /// outside the construct
    ///
    /// Generators use this to let greebles and thruster bells poke past the
    /// hull silhouette without rejecting the whole layout.
    #[serde(default)]
    pub max_overage_tolerance: i32,

    // === HARD LIMITS ===
    /// Maximum cells a single component may cover
    ///
    /// The largest catalog parts are 5x5x5 (125 cells); 4096 leaves room for
    /// custom hull slabs while keeping one placement call bounded.
    #[serde(default = "default_max_component_cells")]
    pub max_component_cells: u64,
}

fn default_max_component_cells() -> u64 {
    4096
}

impl Default for ConstructionRules {
    fn default() -> Self {
        Self {
            // Small frigate silhouette
            min_x: 3,
            max_x: 8,
            min_y: 2,
            max_y: 6,
            min_z: 8,
            max_z: 20,

            max_overage_tolerance: 1,
            max_component_cells: default_max_component_cells(),
        }
    }
}

impl ConstructionRules {
    /// Create rules with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate rules for internal consistency
    ///
    /// Returns every problem found, not just the first.
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (axis, min, max) in [
            ("x", self.min_x, self.max_x),
            ("y", self.min_y, self.max_y),
            ("z", self.min_z, self.max_z),
        ] {
            if min < 0 {
                errors.push(format!("min_{} ({}) must not be negative", axis, min));
            }
            if min > max {
                errors.push(format!("min_{} ({}) exceeds max_{} ({})", axis, min, axis, max));
            }
        }

        if self.max_overage_tolerance < 0 {
            errors.push(format!(
                "max_overage_tolerance ({}) must not be negative",
                self.max_overage_tolerance
            ));
        }

        if self.max_component_cells == 0 {
            errors.push("max_component_cells must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Extents sampled from [`ConstructionRules`] for one construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructExtents {
    pub width_x: i32,
    pub height_y: i32,
    pub length_z: i32,
    pub tolerance: i32,
}

impl ConstructExtents {
    /// Sample extents once, uniformly and inclusively within each axis range
    ///
    /// The generator is passed in explicitly so a seed reproduces the same
    /// construct.
    pub fn sample(rules: &ConstructionRules, rng: &mut ChaCha8Rng) -> Result<Self> {
        rules.validate().map_err(ShipwrightError::InvalidRules)?;

        Ok(Self {
            width_x: rng.gen_range(rules.min_x..=rules.max_x),
            height_y: rng.gen_range(rules.min_y..=rules.max_y),
            length_z: rng.gen_range(rules.min_z..=rules.max_z),
            tolerance: rules.max_overage_tolerance,
        })
    }

    /// Returns true if the cell lies within the extents plus tolerance
    pub fn contains(&self, cell: Cell) -> bool {
        let within = |v: i32, extent: i32| {
            i64::from(v.unsigned_abs()) <= i64::from(extent) + i64::from(self.tolerance)
        };
        within(cell.x, self.width_x) && within(cell.y, self.height_y) && within(cell.z, self.length_z)
    }
}
