//! Shape and block catalogs consumed by the construct engine
//!
//! The engine only sees the two traits below. `PrefabLibrary` and
//! `BlockCatalog` are TOML-backed implementations; any other source (a game's
//! definition database, a test double) can stand in for them. Both are read
//! only during generation, so one instance can serve many constructs at once.

pub mod prefab;
pub mod registry;
pub mod schema;

pub use prefab::{MirrorVariant, PrefabLibrary, ReferenceBlock};
pub use registry::BlockCatalog;
pub use schema::{BlockCategory, BlockId, CatalogEntry, PrefabDescriptor};

use thiserror::Error;

use crate::core::types::Cell;

/// Canonical shapes and orientations per block category
pub trait ReferenceLibrary {
    /// Descriptor of the reference block whose min corner sits at
    /// `relative_cell` in the category's reference prefab
    fn prefab_at(&self, category: BlockCategory, relative_cell: Cell) -> Option<PrefabDescriptor>;

    /// Descriptor for a copy of `descriptor` mirrored on X and/or Y
    fn mirrored_orientation(
        &self,
        category: BlockCategory,
        descriptor: &PrefabDescriptor,
        mirror_x: bool,
        mirror_y: bool,
    ) -> PrefabDescriptor;
}

/// Resolves block identifiers to catalog entries
pub trait BlockRegistry {
    fn resolve(&self, id: &BlockId) -> Option<&CatalogEntry>;
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation errors: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Duplicate reference block for {category} at {cell}")]
    DuplicatePrefab { category: BlockCategory, cell: Cell },

    #[error("{category} has several {block} references with the same orientation but different mirror variants")]
    AmbiguousMirror { category: BlockCategory, block: BlockId },
}
