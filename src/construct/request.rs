//! Placement requests and instance slots

use serde::{Deserialize, Serialize};

use crate::catalog::BlockCategory;
use crate::core::types::{BoundingBox, Cell};
use crate::grid::{RestrictionMask, RestrictionTag};
use crate::symmetry::MirrorAxis;

/// Which mirrored copies a placement asks for
///
/// X and Y together also produce the XY copy, so a request yields 1, 2 or 4
/// instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Symmetry {
    #[serde(default)]
    pub x: bool,
    #[serde(default)]
    pub y: bool,
}

impl Symmetry {
    pub const NONE: Symmetry = Symmetry { x: false, y: false };
    pub const X: Symmetry = Symmetry { x: true, y: false };
    pub const Y: Symmetry = Symmetry { x: false, y: true };
    pub const XY: Symmetry = Symmetry { x: true, y: true };

    /// Mirror copies in creation order: X, Y, XY
    pub fn mirrors(self) -> impl Iterator<Item = MirrorAxis> {
        MirrorAxis::requested(self.x, self.y)
    }

    /// Total instances including the primary
    pub fn instance_count(self) -> usize {
        1 + self.mirrors().count()
    }
}

/// Role of an instance within one placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstanceSlot {
    Primary,
    MirrorX,
    MirrorY,
    MirrorXY,
}

impl InstanceSlot {
    pub const ALL: [InstanceSlot; 4] = [
        InstanceSlot::Primary,
        InstanceSlot::MirrorX,
        InstanceSlot::MirrorY,
        InstanceSlot::MirrorXY,
    ];

    pub fn index(self) -> usize {
        match self {
            InstanceSlot::Primary => 0,
            InstanceSlot::MirrorX => 1,
            InstanceSlot::MirrorY => 2,
            InstanceSlot::MirrorXY => 3,
        }
    }
}

impl From<MirrorAxis> for InstanceSlot {
    fn from(axis: MirrorAxis) -> Self {
        match axis {
            MirrorAxis::X => InstanceSlot::MirrorX,
            MirrorAxis::Y => InstanceSlot::MirrorY,
            MirrorAxis::XY => InstanceSlot::MirrorXY,
        }
    }
}

impl std::fmt::Display for InstanceSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// A request to place one block (plus its mirrors)
///
/// `reference_key` selects the block within the category's reference
/// prefab; `allowed` lists the tags this placement may sit on top of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub category: BlockCategory,
    pub min: Cell,
    pub max: Cell,
    #[serde(default)]
    pub reference_key: Cell,
    #[serde(default)]
    pub symmetry: Symmetry,
    #[serde(default)]
    pub allowed: RestrictionMask,
}

impl PlacementRequest {
    pub fn new(category: BlockCategory, min: Cell, max: Cell) -> Self {
        Self {
            category,
            min,
            max,
            reference_key: Cell::ZERO,
            symmetry: Symmetry::NONE,
            allowed: RestrictionMask::EMPTY,
        }
    }

    /// Single-cell placement
    pub fn at(category: BlockCategory, cell: Cell) -> Self {
        Self::new(category, cell, cell)
    }

    pub fn with_reference(mut self, reference_key: Cell) -> Self {
        self.reference_key = reference_key;
        self
    }

    pub fn with_symmetry(mut self, use_x: bool, use_y: bool) -> Self {
        self.symmetry = Symmetry { x: use_x, y: use_y };
        self
    }

    /// Permit overlapping cells that carry `tag`
    pub fn allowing(mut self, tag: RestrictionTag) -> Self {
        self.allowed = self.allowed.with(tag);
        self
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.min, self.max)
    }
}
