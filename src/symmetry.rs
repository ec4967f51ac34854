//! Mirror transforms for symmetric placement
//!
//! Mirroring reflects a box about zero on X, Y, or both, keeping its width
//! on every reflected axis. Orientations are never derived here by plain
//! negation; the reference library decides how a mirrored part faces.

use serde::{Deserialize, Serialize};

use crate::core::types::BoundingBox;

/// Mirror plane(s) for a symmetric copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MirrorAxis {
    X,
    Y,
    XY,
}

impl MirrorAxis {
    /// Creation order for the mirrored copies of one placement
    pub const ORDER: [MirrorAxis; 3] = [MirrorAxis::X, MirrorAxis::Y, MirrorAxis::XY];

    /// (mirror_x, mirror_y) flags
    pub fn flags(self) -> (bool, bool) {
        match self {
            MirrorAxis::X => (true, false),
            MirrorAxis::Y => (false, true),
            MirrorAxis::XY => (true, true),
        }
    }

    /// Mirror copies requested by a pair of symmetry flags, in creation order
    pub fn requested(use_x: bool, use_y: bool) -> impl Iterator<Item = MirrorAxis> {
        MirrorAxis::ORDER.into_iter().filter(move |axis| match axis {
            MirrorAxis::X => use_x,
            MirrorAxis::Y => use_y,
            MirrorAxis::XY => use_x && use_y,
        })
    }
}

impl std::fmt::Display for MirrorAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Reflect one axis span `[min, max]` about zero
///
/// With `span = max - min`, the mirrored corners are `-min - span` and
/// `-max + span`, i.e. `[-max, -min]`. A span touching zero maps onto
/// itself at zero, which the placement pre-check treats as self-overlap.
/// Returns `None` when a mirrored corner falls outside the i32 range
/// (only `i32::MIN` has no reflection).
pub fn reflect_span(min: i32, max: i32) -> Option<(i32, i32)> {
    let (min, max) = (i64::from(min), i64::from(max));
    let span = max - min;
    let lo = i32::try_from(-min - span).ok()?;
    let hi = i32::try_from(-max + span).ok()?;
    Some((lo, hi))
}

/// Mirror a box about zero on the given axis or axes; Z always passes through
///
/// `None` if the reflection does not fit on the grid.
pub fn mirror_box(bbox: &BoundingBox, axis: MirrorAxis) -> Option<BoundingBox> {
    let (mirror_x, mirror_y) = axis.flags();
    let mut min = bbox.min;
    let mut max = bbox.max;

    if mirror_x {
        (min.x, max.x) = reflect_span(bbox.min.x, bbox.max.x)?;
    }
    if mirror_y {
        (min.y, max.y) = reflect_span(bbox.min.y, bbox.max.y)?;
    }

    Some(BoundingBox::new(min, max))
}
