//! Combined cell map and restriction overlay with all-or-nothing reservation
//!
//! Reservation checks every requested cell before touching either map, so a
//! failed call leaves both maps exactly as they were. Component cells are
//! exclusive: a cell already claimed by a component can never be claimed by
//! another one, whatever the caller's overlap mask says.

use ahash::AHashMap;

use super::cell_map::{CellMap, ComponentId};
use super::restriction::{RestrictionMask, RestrictionOverlay, RestrictionTag};
use crate::core::types::{BoundingBox, Cell};

/// First cell that blocked a reservation and the tag it carried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellConflict {
    pub cell: Cell,
    pub tag: RestrictionTag,
}

/// Record of a committed reservation, enough to undo it exactly
#[derive(Debug, Clone)]
pub struct Reservation {
    component: Option<ComponentId>,
    previous: Vec<(Cell, RestrictionTag)>,
}

impl Reservation {
    pub fn cell_count(&self) -> usize {
        self.previous.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Occupancy {
    cells: CellMap,
    restrictions: RestrictionOverlay,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Component occupying a cell, if any
    pub fn lookup(&self, cell: Cell) -> Option<ComponentId> {
        self.cells.get(cell)
    }

    pub fn tag_at(&self, cell: Cell) -> RestrictionTag {
        self.restrictions.get(cell)
    }

    pub fn cell_map(&self) -> &CellMap {
        &self.cells
    }

    pub fn restrictions(&self) -> &RestrictionOverlay {
        &self.restrictions
    }

    /// Check whether one cell can take a new `tag` under the `allowed` mask
    pub fn check_cell(
        &self,
        cell: Cell,
        tag: RestrictionTag,
        allowed: RestrictionMask,
    ) -> Result<(), CellConflict> {
        let existing = self.restrictions.get(cell);

        if tag == RestrictionTag::Component && self.cells.contains(cell) {
            return Err(CellConflict {
                cell,
                tag: RestrictionTag::Component,
            });
        }

        if !allowed.permits(existing) {
            return Err(CellConflict { cell, tag: existing });
        }

        Ok(())
    }

    /// Check a whole cell set; stops at the first conflict
    pub fn check(
        &self,
        cells: &[Cell],
        tag: RestrictionTag,
        allowed: RestrictionMask,
    ) -> Result<(), CellConflict> {
        cells
            .iter()
            .try_for_each(|&cell| self.check_cell(cell, tag, allowed))
    }

    /// Reserve every cell in `cells` with `tag`, or none of them
    ///
    /// With `component` set the cells are also claimed in the cell map.
    pub fn reserve(
        &mut self,
        cells: &[Cell],
        component: Option<ComponentId>,
        tag: RestrictionTag,
        allowed: RestrictionMask,
    ) -> Result<Reservation, CellConflict> {
        self.check(cells, tag, allowed)?;

        let mut previous = Vec::with_capacity(cells.len());
        for &cell in cells {
            previous.push((cell, self.restrictions.get(cell)));
            if let Some(id) = component {
                self.cells.insert(cell, id);
            }
            self.restrictions.set(cell, tag);
        }

        Ok(Reservation {
            component,
            previous,
        })
    }

    /// Undo a reservation, restoring the tags it overwrote
    pub fn rollback(&mut self, reservation: Reservation) {
        for (cell, tag) in reservation.previous.into_iter().rev() {
            if let Some(id) = reservation.component {
                if self.cells.get(cell) == Some(id) {
                    self.cells.remove(cell);
                }
            }
            self.restrictions.set(cell, tag);
        }
    }

    /// Check the cell map against the component footprints
    ///
    /// Returns one message per violation: a claimed cell not tagged as a
    /// component, a claimed cell outside its owner's box, a box cell not
    /// claimed by its owner, or a component-tagged cell with no owner.
    pub fn audit(
        &self,
        components: impl IntoIterator<Item = (ComponentId, BoundingBox)>,
    ) -> Vec<String> {
        let mut errors = Vec::new();
        let footprints: AHashMap<ComponentId, BoundingBox> = components.into_iter().collect();

        for (cell, id) in self.cells.iter() {
            let tag = self.restrictions.get(cell);
            if tag != RestrictionTag::Component {
                errors.push(format!("cell {} claimed by {} is tagged {}", cell, id, tag));
            }
            match footprints.get(&id) {
                Some(bbox) if bbox.contains(cell) => {}
                Some(bbox) => errors.push(format!(
                    "cell {} claimed by {} lies outside its box {}",
                    cell, id, bbox
                )),
                None => errors.push(format!("cell {} claimed by unknown component {}", cell, id)),
            }
        }

        let mut ids: Vec<_> = footprints.keys().copied().collect();
        ids.sort();
        for id in ids {
            let bbox = footprints[&id];
            for cell in bbox.cells() {
                if self.cells.get(cell) != Some(id) {
                    errors.push(format!("cell {} of {} is not claimed by it", cell, id));
                }
            }
        }

        for (cell, tag) in self.restrictions.iter() {
            if tag == RestrictionTag::Component && !self.cells.contains(cell) {
                errors.push(format!("cell {} is tagged Component but has no owner", cell));
            }
        }

        errors
    }
}
