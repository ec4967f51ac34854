//! Block catalog for resolving block identifiers.
//!
//! Provides `BlockCatalog`, which holds the known block types and handles
//! TOML file loading. Entries are identity only; a block's footprint is
//! always the bounding box the caller places it with.

use ahash::AHashMap;
use serde::Deserialize;
use std::path::Path;

use super::schema::{BlockId, CatalogEntry};
use super::{BlockRegistry, CatalogError};

#[derive(Debug, Deserialize)]
struct BlockFile {
    #[serde(default, rename = "block")]
    blocks: Vec<CatalogEntry>,
}

/// Registry of block types indexed by id
#[derive(Debug, Clone, Default)]
pub struct BlockCatalog {
    entries: AHashMap<BlockId, CatalogEntry>,
}

impl BlockCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry, replacing any previous entry with the same id
    pub fn register(&mut self, entry: CatalogEntry) -> Option<CatalogEntry> {
        self.entries.insert(entry.id.clone(), entry)
    }

    /// Parse a catalog from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        catalog.extend_from_toml_str(content)?;
        Ok(catalog)
    }

    fn extend_from_toml_str(&mut self, content: &str) -> Result<usize, CatalogError> {
        let file: BlockFile =
            toml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;

        let errors: Vec<String> = file
            .blocks
            .iter()
            .filter(|entry| entry.id.as_str().trim().is_empty())
            .map(|entry| format!("block '{}' has an empty id", entry.display_name))
            .collect();
        if !errors.is_empty() {
            return Err(CatalogError::Validation(errors));
        }

        let count = file.blocks.len();
        for entry in file.blocks {
            self.register(entry);
        }
        Ok(count)
    }

    /// Load entries from a TOML file into this catalog
    pub fn load_file(&mut self, path: &Path) -> Result<usize, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        self.extend_from_toml_str(&content).map_err(|e| match e {
            CatalogError::Parse(msg) => CatalogError::Parse(format!("{}: {}", path.display(), msg)),
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

    pub fn get(&self, id: &BlockId) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BlockRegistry for BlockCatalog {
    fn resolve(&self, id: &BlockId) -> Option<&CatalogEntry> {
        self.get(id)
    }
}
