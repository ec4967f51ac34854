//! Per-cell restriction tags
//!
//! Every cell carries at most one tag. A placement declares a mask of tags
//! it is willing to coexist with; an untagged cell is always acceptable.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::Cell;

/// What occupies or reserves a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionTag {
    #[default]
    None,
    /// Claimed by a placed component
    Component,
    /// Kept clear for something else, e.g. thrust exhaust
    ReservedZone,
}

impl RestrictionTag {
    const fn bit(self) -> u8 {
        match self {
            RestrictionTag::None => 0,
            RestrictionTag::Component => 1,
            RestrictionTag::ReservedZone => 1 << 1,
        }
    }
}

impl std::fmt::Display for RestrictionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Set of restriction tags a placement may overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<RestrictionTag>", into = "Vec<RestrictionTag>")]
pub struct RestrictionMask(u8);

impl RestrictionMask {
    pub const EMPTY: RestrictionMask = RestrictionMask(0);
    pub const RESERVED_ZONE: RestrictionMask = RestrictionMask(RestrictionTag::ReservedZone.bit());

    pub const fn with(self, tag: RestrictionTag) -> Self {
        RestrictionMask(self.0 | tag.bit())
    }

    /// Membership test; `None` has no bit and is never a member
    pub const fn contains(self, tag: RestrictionTag) -> bool {
        let bit = tag.bit();
        bit != 0 && self.0 & bit == bit
    }

    /// Returns true if a cell carrying `tag` is acceptable under this mask
    pub const fn permits(self, tag: RestrictionTag) -> bool {
        matches!(tag, RestrictionTag::None) || self.contains(tag)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn tags(self) -> impl Iterator<Item = RestrictionTag> {
        [RestrictionTag::Component, RestrictionTag::ReservedZone]
            .into_iter()
            .filter(move |&tag| self.contains(tag))
    }
}

impl From<RestrictionTag> for RestrictionMask {
    fn from(tag: RestrictionTag) -> Self {
        RestrictionMask::EMPTY.with(tag)
    }
}

impl FromIterator<RestrictionTag> for RestrictionMask {
    fn from_iter<I: IntoIterator<Item = RestrictionTag>>(iter: I) -> Self {
        iter.into_iter().fold(RestrictionMask::EMPTY, RestrictionMask::with)
    }
}

impl From<Vec<RestrictionTag>> for RestrictionMask {
    fn from(tags: Vec<RestrictionTag>) -> Self {
        tags.into_iter().collect()
    }
}

impl From<RestrictionMask> for Vec<RestrictionTag> {
    fn from(mask: RestrictionMask) -> Self {
        mask.tags().collect()
    }
}

/// Cell -> restriction tag; untagged cells are not stored
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestrictionOverlay {
    tags: AHashMap<Cell, RestrictionTag>,
}

impl RestrictionOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag at a cell, `None` if untagged
    pub fn get(&self, cell: Cell) -> RestrictionTag {
        self.tags.get(&cell).copied().unwrap_or_default()
    }

    /// Set a cell's tag; setting `None` clears it
    pub fn set(&mut self, cell: Cell, tag: RestrictionTag) {
        if tag == RestrictionTag::None {
            self.tags.remove(&cell);
        } else {
            self.tags.insert(cell, tag);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, RestrictionTag)> + '_ {
        self.tags.iter().map(|(&cell, &tag)| (cell, tag))
    }

    /// Number of tagged cells
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
