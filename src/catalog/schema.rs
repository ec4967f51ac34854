//! Catalog data types for TOML deserialization.

use serde::{Deserialize, Serialize};

use crate::grid::Orientation;

/// Functional category of a block
///
/// Generators ask for a category; the reference library maps it to a
/// concrete block and its canonical orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockCategory {
    // Structure
    Armor,
    Conveyor,
    Light,
    // Control
    Cockpit,
    Seat,
    Gyroscope,
    Antenna,
    Beacon,
    // Propulsion and power
    Thruster,
    JumpDrive,
    Reactor,
    Battery,
    // Utility
    Cargo,
    Medical,
    Production,
    Gravity,
    Tool,
    // Weapons
    Weapon,
    Turret,
}

impl std::fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Identifier of a concrete block type, e.g. `Thrust/LargeBlockLargeThrust`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A block identifier paired with the orientation it should be placed in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrefabDescriptor {
    pub block: BlockId,
    #[serde(default)]
    pub orientation: Orientation,
}

impl PrefabDescriptor {
    pub fn new(block: impl Into<BlockId>, orientation: Orientation) -> Self {
        Self {
            block: block.into(),
            orientation,
        }
    }
}

/// A block type known to the registry
///
/// Identity only: geometry comes from the caller's bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: BlockId,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
}
