//! Reference prefabs: canonical block placement per category.
//!
//! Each category owns a small reference prefab, a list of blocks keyed by
//! their min corner. A generator picks the reference block by its relative
//! cell and the library answers with the block id and orientation to use.
//! Parts that are not mirror-symmetric can carry explicit variants for their
//! X, Y and XY mirrors (often a left/right-handed twin block).

use ahash::AHashMap;
use serde::Deserialize;
use std::path::Path;

use super::schema::{BlockCategory, BlockId, PrefabDescriptor};
use super::{CatalogError, ReferenceLibrary};
use crate::core::types::Cell;
use crate::grid::Orientation;

/// Replacement descriptor for a mirrored copy
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MirrorVariant {
    /// Twin block to use instead of the original, if any
    #[serde(default)]
    pub block: Option<BlockId>,
    pub orientation: Orientation,
}

/// One block of a category's reference prefab
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReferenceBlock {
    pub min: Cell,
    pub block: BlockId,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub mirror_x: Option<MirrorVariant>,
    #[serde(default)]
    pub mirror_y: Option<MirrorVariant>,
    #[serde(default)]
    pub mirror_xy: Option<MirrorVariant>,
}

impl ReferenceBlock {
    pub fn new(min: Cell, block: impl Into<BlockId>, orientation: Orientation) -> Self {
        Self {
            min,
            block: block.into(),
            orientation,
            mirror_x: None,
            mirror_y: None,
            mirror_xy: None,
        }
    }

    pub fn descriptor(&self) -> PrefabDescriptor {
        PrefabDescriptor::new(self.block.clone(), self.orientation)
    }

    fn variants(&self) -> [&Option<MirrorVariant>; 3] {
        [&self.mirror_x, &self.mirror_y, &self.mirror_xy]
    }

    fn variant(&self, mirror_x: bool, mirror_y: bool) -> Option<&MirrorVariant> {
        match (mirror_x, mirror_y) {
            (true, false) => self.mirror_x.as_ref(),
            (false, true) => self.mirror_y.as_ref(),
            (true, true) => self.mirror_xy.as_ref(),
            (false, false) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PrefabFile {
    #[serde(default, rename = "prefab")]
    prefabs: Vec<PrefabDef>,
}

#[derive(Debug, Deserialize)]
struct PrefabDef {
    category: BlockCategory,
    #[serde(default, rename = "block")]
    blocks: Vec<ReferenceBlock>,
}

/// In-memory reference library
#[derive(Debug, Clone, Default)]
pub struct PrefabLibrary {
    prefabs: AHashMap<BlockCategory, Vec<ReferenceBlock>>,
}

impl PrefabLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reference block; each (category, min) pair may appear once
    ///
    /// Mirror variants are looked up by (block, orientation), so blocks sharing
    /// both within a category must also share their variants.
    pub fn register(
        &mut self,
        category: BlockCategory,
        block: ReferenceBlock,
    ) -> Result<(), CatalogError> {
        let blocks = self.prefabs.entry(category).or_default();
        if blocks.iter().any(|b| b.min == block.min) {
            return Err(CatalogError::DuplicatePrefab {
                category,
                cell: block.min,
            });
        }
        if blocks.iter().any(|b| {
            b.block == block.block
                && b.orientation == block.orientation
                && b.variants() != block.variants()
        }) {
            return Err(CatalogError::AmbiguousMirror {
                category,
                block: block.block,
            });
        }
        blocks.push(block);
        Ok(())
    }

    /// Parse a library from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let mut library = Self::new();
        library.extend_from_toml_str(content)?;
        Ok(library)
    }

    fn extend_from_toml_str(&mut self, content: &str) -> Result<usize, CatalogError> {
        let file: PrefabFile =
            toml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;

        let mut added = 0;
        for def in file.prefabs {
            for block in def.blocks {
                self.register(def.category, block)?;
                added += 1;
            }
        }
        Ok(added)
    }

    /// Load reference blocks from a TOML file into this library
    pub fn load_file(&mut self, path: &Path) -> Result<usize, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        self.extend_from_toml_str(&content)
            .map_err(|e| match e {
                CatalogError::Parse(msg) => {
                    CatalogError::Parse(format!("{}: {}", path.display(), msg))
                }
                other => other,
            })
    }

    /// Load all .toml files from a directory recursively
    pub fn load_directory(&mut self, path: &Path) -> Result<usize, CatalogError> {
        let mut added = 0;
        for entry in std::fs::read_dir(path)? {
            let entry_path = entry?.path();
            if entry_path.is_dir() {
                added += self.load_directory(&entry_path)?;
            } else if entry_path.extension().map_or(false, |ext| ext == "toml") {
                added += self.load_file(&entry_path)?;
            }
        }
        Ok(added)
    }

    /// Reference blocks of one category
    pub fn blocks(&self, category: BlockCategory) -> &[ReferenceBlock] {
        self.prefabs
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn categories(&self) -> impl Iterator<Item = BlockCategory> + '_ {
        self.prefabs.keys().copied()
    }

    /// Total number of reference blocks
    pub fn len(&self) -> usize {
        self.prefabs.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReferenceLibrary for PrefabLibrary {
    fn prefab_at(&self, category: BlockCategory, relative_cell: Cell) -> Option<PrefabDescriptor> {
        self.blocks(category)
            .iter()
            .find(|b| b.min == relative_cell)
            .map(ReferenceBlock::descriptor)
    }

    /// Explicit variant if the catalog has one, otherwise the reflected frame
    fn mirrored_orientation(
        &self,
        category: BlockCategory,
        descriptor: &PrefabDescriptor,
        mirror_x: bool,
        mirror_y: bool,
    ) -> PrefabDescriptor {
        let variant = self
            .blocks(category)
            .iter()
            .filter(|b| b.block == descriptor.block && b.orientation == descriptor.orientation)
            .find_map(|b| b.variant(mirror_x, mirror_y));

        match variant {
            Some(v) => PrefabDescriptor {
                block: v.block.clone().unwrap_or_else(|| descriptor.block.clone()),
                orientation: v.orientation,
            },
            None => PrefabDescriptor {
                block: descriptor.block.clone(),
                orientation: descriptor.orientation.reflected(mirror_x, mirror_y),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction;
    use glam::IVec3;

    const LIBRARY_TOML: &str = r#"
[[prefab]]
category = "thruster"

[[prefab.block]]
min = [0, 0, 0]
block = "Thrust/LargeBlockLargeThrust"
orientation = { forward = "backward", up = "up" }

[[prefab.block]]
min = [0, 0, 3]
block = "Thrust/LargeBlockSmallThrust"
orientation = { forward = "backward", up = "up" }

[[prefab]]
category = "armor"

[[prefab.block]]
min = [0, 0, 0]
block = "CubeBlock/LargeBlockArmorSlope"
orientation = { forward = "forward", up = "right" }
mirror_x = { block = "CubeBlock/LargeBlockArmorSlopeLeft", orientation = { forward = "forward", up = "right" } }
"#;

    #[test]
    fn test_load_from_toml() {
        let library = PrefabLibrary::from_toml_str(LIBRARY_TOML).unwrap();
        assert_eq!(library.len(), 3);
        assert_eq!(library.blocks(BlockCategory::Thruster).len(), 2);
        assert!(library.blocks(BlockCategory::Cockpit).is_empty());
    }

    #[test]
    fn test_prefab_at_by_relative_cell() {
        let library = PrefabLibrary::from_toml_str(LIBRARY_TOML).unwrap();

        let small = library
            .prefab_at(BlockCategory::Thruster, IVec3::new(0, 0, 3))
            .unwrap();
        assert_eq!(small.block, BlockId::from("Thrust/LargeBlockSmallThrust"));
        assert_eq!(small.orientation.forward(), Direction::Backward);

        assert!(library
            .prefab_at(BlockCategory::Thruster, IVec3::new(1, 0, 0))
            .is_none());
        assert!(library.prefab_at(BlockCategory::Reactor, IVec3::ZERO).is_none());
    }

    #[test]
    fn test_mirrored_uses_explicit_variant() {
        let library = PrefabLibrary::from_toml_str(LIBRARY_TOML).unwrap();
        let slope = library.prefab_at(BlockCategory::Armor, IVec3::ZERO).unwrap();

        let mirrored = library.mirrored_orientation(BlockCategory::Armor, &slope, true, false);
        assert_eq!(mirrored.block, BlockId::from("CubeBlock/LargeBlockArmorSlopeLeft"));
        assert_eq!(mirrored.orientation, slope.orientation);
    }

    #[test]
    fn test_mirrored_falls_back_to_reflection() {
        let library = PrefabLibrary::from_toml_str(LIBRARY_TOML).unwrap();
        let slope = library.prefab_at(BlockCategory::Armor, IVec3::ZERO).unwrap();

        // No mirror_y variant: up = right is kept, since a Y mirror only
        // swaps up and down
        let mirrored = library.mirrored_orientation(BlockCategory::Armor, &slope, false, true);
        assert_eq!(mirrored.block, slope.block);
        assert_eq!(mirrored.orientation.up(), Direction::Right);

        // XY mirror of up = right flips it to left
        let mirrored = library.mirrored_orientation(BlockCategory::Armor, &slope, true, true);
        assert_eq!(mirrored.orientation.up(), Direction::Left);
    }

    #[test]
    fn test_duplicate_reference_block_rejected() {
        let mut library = PrefabLibrary::new();
        let block = ReferenceBlock::new(IVec3::ZERO, "Cockpit/Small", Orientation::IDENTITY);
        library.register(BlockCategory::Cockpit, block.clone()).unwrap();

        let err = library.register(BlockCategory::Cockpit, block).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicatePrefab { .. }));
    }

    #[test]
    fn test_conflicting_mirror_variants_rejected() {
        let slope = Orientation::new(Direction::Forward, Direction::Right).unwrap();
        let left = MirrorVariant {
            block: Some(BlockId::from("CubeBlock/LargeBlockArmorSlopeLeft")),
            orientation: slope,
        };
        let mut library = PrefabLibrary::new();
        library
            .register(
                BlockCategory::Armor,
                ReferenceBlock {
                    mirror_x: Some(left.clone()),
                    ..ReferenceBlock::new(IVec3::ZERO, "CubeBlock/LargeBlockArmorSlope", slope)
                },
            )
            .unwrap();

        // Same block and frame elsewhere in the prefab, same twin: fine
        library
            .register(
                BlockCategory::Armor,
                ReferenceBlock {
                    mirror_x: Some(left),
                    ..ReferenceBlock::new(IVec3::X, "CubeBlock/LargeBlockArmorSlope", slope)
                },
            )
            .unwrap();

        // Same block and frame with no twin would make the lookup order-dependent
        let err = library
            .register(
                BlockCategory::Armor,
                ReferenceBlock::new(IVec3::new(2, 0, 0), "CubeBlock/LargeBlockArmorSlope", slope),
            )
            .unwrap_err();
        assert!(matches!(err, CatalogError::AmbiguousMirror { category: BlockCategory::Armor, .. }));
        assert_eq!(library.len(), 2);

        // Other categories are independent
        library
            .register(
                BlockCategory::Tool,
                ReferenceBlock::new(IVec3::ZERO, "CubeBlock/LargeBlockArmorSlope", slope),
            )
            .unwrap();
    }

    #[test]
    fn test_invalid_orientation_is_parse_error() {
        let toml_str = r#"
[[prefab]]
category = "cockpit"

[[prefab.block]]
min = [0, 0, 0]
block = "Cockpit/Small"
orientation = { forward = "up", up = "down" }
"#;
        let err = PrefabLibrary::from_toml_str(toml_str).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }
}
