//! Core type definitions used throughout the codebase

use glam::IVec3;
use serde::{Deserialize, Serialize};

/// One unit of the integer placement grid (local to a construct)
pub type Cell = IVec3;

/// Inclusive axis-aligned box of cells
///
/// `min` and `max` are kept exactly as supplied. A box is well formed when
/// `min <= max` on every axis; an inverted box covers no cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Cell,
    pub max: Cell,
}

impl BoundingBox {
    pub fn new(min: Cell, max: Cell) -> Self {
        Self { min, max }
    }

    /// Box covering exactly one cell
    pub fn single(cell: Cell) -> Self {
        Self { min: cell, max: cell }
    }

    /// Returns true if min <= max on every axis
    pub fn is_well_formed(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    pub fn is_single_cell(&self) -> bool {
        self.min == self.max
    }

    /// Number of cells covered: (dx+1)(dy+1)(dz+1), zero for inverted boxes
    ///
    /// Saturates at `u64::MAX` for boxes spanning most of the i32 range.
    pub fn cell_count(&self) -> u64 {
        if !self.is_well_formed() {
            return 0;
        }
        let span = |lo: i32, hi: i32| (i64::from(hi) - i64::from(lo) + 1) as u64;
        span(self.min.x, self.max.x)
            .saturating_mul(span(self.min.y, self.max.y))
            .saturating_mul(span(self.min.z, self.max.z))
    }

    /// Every cell in the box, x outermost, z innermost
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (min, max) = (self.min, self.max);
        (min.x..=max.x).flat_map(move |x| {
            (min.y..=max.y).flat_map(move |y| (min.z..=max.z).map(move |z| IVec3::new(x, y, z)))
        })
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.cmpge(self.min).all() && cell.cmple(self.max).all()
    }

    /// Returns true if the two boxes share at least one cell
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.is_well_formed()
            && other.is_well_formed()
            && self.min.cmple(other.max).all()
            && other.min.cmple(self.max).all()
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_single_cell() {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}..{}", self.min, self.max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cell_box() {
        let bbox = BoundingBox::single(IVec3::new(1, 2, 3));
        assert!(bbox.is_single_cell());
        assert_eq!(bbox.cell_count(), 1);
        assert_eq!(bbox.cells().collect::<Vec<_>>(), vec![IVec3::new(1, 2, 3)]);
    }

    #[test]
    fn test_cell_count_matches_enumeration() {
        let bbox = BoundingBox::new(IVec3::new(-1, 0, 2), IVec3::new(1, 1, 5));
        // (2+1) * (1+1) * (3+1)
        assert_eq!(bbox.cell_count(), 24);
        assert_eq!(bbox.cells().count(), 24);
    }

    #[test]
    fn test_cell_count_saturates_on_full_range() {
        let bbox = BoundingBox::new(IVec3::new(i32::MIN, i32::MIN, 0), IVec3::new(i32::MAX, i32::MAX, 0));
        assert_eq!(bbox.cell_count(), u64::MAX);

        let wide = BoundingBox::new(IVec3::new(i32::MIN, 0, 0), IVec3::new(i32::MAX, 0, 0));
        assert_eq!(wide.cell_count(), 1 << 32);
    }

    #[test]
    fn test_cells_are_inclusive() {
        let bbox = BoundingBox::new(IVec3::new(0, 0, 0), IVec3::new(1, 0, 0));
        let cells: Vec<_> = bbox.cells().collect();
        assert_eq!(cells, vec![IVec3::new(0, 0, 0), IVec3::new(1, 0, 0)]);
    }

    #[test]
    fn test_inverted_box_is_empty() {
        let bbox = BoundingBox::new(IVec3::new(2, 0, 0), IVec3::new(1, 0, 0));
        assert!(!bbox.is_well_formed());
        assert_eq!(bbox.cell_count(), 0);
        assert_eq!(bbox.cells().count(), 0);
    }

    #[test]
    fn test_contains_and_intersects() {
        let a = BoundingBox::new(IVec3::new(0, 0, 0), IVec3::new(2, 2, 2));
        let b = BoundingBox::new(IVec3::new(2, 2, 2), IVec3::new(4, 4, 4));
        let c = BoundingBox::new(IVec3::new(3, 0, 0), IVec3::new(4, 1, 1));

        assert!(a.contains(IVec3::new(2, 0, 1)));
        assert!(!a.contains(IVec3::new(3, 0, 0)));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_display() {
        assert_eq!(BoundingBox::single(IVec3::ZERO).to_string(), "[0, 0, 0]");
        assert_eq!(
            BoundingBox::new(IVec3::ZERO, IVec3::ONE).to_string(),
            "[0, 0, 0]..[1, 1, 1]"
        );
    }
}
