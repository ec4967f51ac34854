//! Construct engine: validated, transactional block placement.
//!
//! A placement call resolves its reference block, plans the primary and any
//! mirrored instances, checks every planned cell against the current state
//! and against the other instances of the same call, and only then reserves
//! anything. Either every instance is created or none is.

use ahash::AHashSet;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::catalog::{BlockCategory, BlockId, BlockRegistry, PrefabDescriptor, ReferenceLibrary};
use crate::core::config::{ConstructExtents, ConstructionRules};
use crate::core::error::Result;
use crate::core::types::{BoundingBox, Cell};
use crate::grid::{
    CellConflict, ComponentId, Occupancy, Orientation, RestrictionMask, RestrictionTag,
};
use crate::symmetry::mirror_box;

use super::log::{ConstructionLog, LogEntry, LogOutcome};
use super::output::ConstructOutput;
use super::request::{InstanceSlot, PlacementRequest};

/// Why a placement was refused
///
/// None of these are fatal to the construct; the caller picks another
/// placement or skips the step.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    #[error("no reference block for {category} at {key}")]
    UnknownReference { category: BlockCategory, key: Cell },

    #[error("unknown block type {0}")]
    UnknownBlockType(BlockId),

    #[error("cell {cell} unavailable (tagged {tag})")]
    OverlapConflict { cell: Cell, tag: RestrictionTag },

    #[error("construction failure: {0}")]
    ConstructionFailure(String),
}

impl From<CellConflict> for PlacementError {
    fn from(conflict: CellConflict) -> Self {
        PlacementError::OverlapConflict {
            cell: conflict.cell,
            tag: conflict.tag,
        }
    }
}

/// A placed block. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRecord {
    pub id: ComponentId,
    pub category: BlockCategory,
    pub block: BlockId,
    pub bounds: BoundingBox,
    pub orientation: Orientation,
    pub slot: InstanceSlot,
}

/// Components created by one successful placement, in creation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementReport {
    pub components: Vec<ComponentId>,
}

#[derive(Debug, Clone)]
struct PlannedInstance {
    slot: InstanceSlot,
    block: BlockId,
    bounds: BoundingBox,
    orientation: Orientation,
}

/// Builds one construct; single owner, sequential calls
pub struct ConstructEngine<'a, L: ?Sized, R: ?Sized> {
    rules: ConstructionRules,
    extents: ConstructExtents,
    library: &'a L,
    registry: &'a R,
    occupancy: Occupancy,
    components: Vec<ComponentRecord>,
    /// Most recent record per instance slot, for anchoring the next step
    last_placed: [Option<ComponentId>; 4],
    log: ConstructionLog,
}

impl<'a, L, R> ConstructEngine<'a, L, R>
where
    L: ReferenceLibrary + ?Sized,
    R: BlockRegistry + ?Sized,
{
    /// Start a construct, sampling its extents once from `rules`
    pub fn new(
        rules: ConstructionRules,
        rng: &mut ChaCha8Rng,
        library: &'a L,
        registry: &'a R,
    ) -> Result<Self> {
        let extents = ConstructExtents::sample(&rules, rng)?;
        tracing::debug!(
            width_x = extents.width_x,
            height_y = extents.height_y,
            length_z = extents.length_z,
            "Sampled construct extents"
        );

        Ok(Self {
            rules,
            extents,
            library,
            registry,
            occupancy: Occupancy::new(),
            components: Vec::new(),
            last_placed: [None; 4],
            log: ConstructionLog::new(),
        })
    }

    /// Place a block and its requested mirrors, all or nothing
    pub fn place(
        &mut self,
        request: &PlacementRequest,
    ) -> std::result::Result<PlacementReport, PlacementError> {
        let descriptor = match self.reference(request) {
            Ok(descriptor) => descriptor,
            Err(err) => {
                self.log_rejection(Some(request.category), request.bounds(), None, &err);
                return Err(err);
            }
        };

        let planned = match self.plan(request, &descriptor) {
            Ok(planned) => planned,
            Err(err) => {
                self.log_rejection(Some(request.category), request.bounds(), Some(&descriptor), &err);
                return Err(err);
            }
        };

        self.commit(request, &descriptor, planned)
    }

    /// Run every check `place` would, without changing or logging anything
    pub fn can_place(&self, request: &PlacementRequest) -> std::result::Result<(), PlacementError> {
        let descriptor = self.reference(request)?;
        self.plan(request, &descriptor).map(|_| ())
    }

    /// Tag a box as a reserved zone (no component), all or nothing
    ///
    /// Zones may cover untagged cells or other zones, never components.
    /// Returns the number of cells tagged.
    pub fn reserve_zone(
        &mut self,
        min: Cell,
        max: Cell,
    ) -> std::result::Result<usize, PlacementError> {
        let bounds = BoundingBox::new(min, max);
        let result = self.validate_bounds(&bounds).and_then(|()| {
            let cells: Vec<Cell> = bounds.cells().collect();
            self.occupancy
                .reserve(
                    &cells,
                    None,
                    RestrictionTag::ReservedZone,
                    RestrictionMask::RESERVED_ZONE,
                )
                .map(|reservation| reservation.cell_count())
                .map_err(PlacementError::from)
        });

        match &result {
            Ok(_) => self.log.push(LogEntry {
                category: None,
                block: None,
                bounds,
                orientation: None,
                slot: None,
                outcome: LogOutcome::ZoneReserved,
            }),
            Err(err) => self.log_rejection(None, bounds, None, err),
        }
        result
    }

    fn reference(
        &self,
        request: &PlacementRequest,
    ) -> std::result::Result<PrefabDescriptor, PlacementError> {
        self.library
            .prefab_at(request.category, request.reference_key)
            .ok_or(PlacementError::UnknownReference {
                category: request.category,
                key: request.reference_key,
            })
    }

    fn plan(
        &self,
        request: &PlacementRequest,
        descriptor: &PrefabDescriptor,
    ) -> std::result::Result<Vec<PlannedInstance>, PlacementError> {
        self.resolve(&descriptor.block)?;

        let bounds = request.bounds();
        self.validate_bounds(&bounds)?;

        let mut planned = Vec::with_capacity(request.symmetry.instance_count());
        planned.push(PlannedInstance {
            slot: InstanceSlot::Primary,
            block: descriptor.block.clone(),
            bounds,
            orientation: descriptor.orientation,
        });

        for axis in request.symmetry.mirrors() {
            let (mirror_x, mirror_y) = axis.flags();
            let mirrored =
                self.library
                    .mirrored_orientation(request.category, descriptor, mirror_x, mirror_y);
            self.resolve(&mirrored.block)?;
            let mirrored_bounds = mirror_box(&bounds, axis).ok_or_else(|| {
                PlacementError::ConstructionFailure(format!(
                    "{} mirror of {} falls outside the grid",
                    axis, bounds
                ))
            })?;

            planned.push(PlannedInstance {
                slot: axis.into(),
                block: mirrored.block,
                bounds: mirrored_bounds,
                orientation: mirrored.orientation,
            });
        }

        // Same inclusive cell walk as reservation; instances of this call
        // must not overlap each other either
        let mut claimed = AHashSet::new();
        for instance in &planned {
            for cell in instance.bounds.cells() {
                if !claimed.insert(cell) {
                    return Err(PlacementError::OverlapConflict {
                        cell,
                        tag: RestrictionTag::Component,
                    });
                }
                self.occupancy
                    .check_cell(cell, RestrictionTag::Component, request.allowed)?;
            }
        }

        Ok(planned)
    }

    fn commit(
        &mut self,
        request: &PlacementRequest,
        descriptor: &PrefabDescriptor,
        planned: Vec<PlannedInstance>,
    ) -> std::result::Result<PlacementReport, PlacementError> {
        let first_new = self.components.len();
        let mut reservations = Vec::with_capacity(planned.len());

        for instance in planned {
            let id = ComponentId(self.components.len() as u32);
            let cells: Vec<Cell> = instance.bounds.cells().collect();

            match self.occupancy.reserve(
                &cells,
                Some(id),
                RestrictionTag::Component,
                request.allowed,
            ) {
                Ok(reservation) => reservations.push(reservation),
                Err(conflict) => {
                    // Unreachable after a clean plan, but never leave a partial group
                    for reservation in reservations.into_iter().rev() {
                        self.occupancy.rollback(reservation);
                    }
                    self.components.truncate(first_new);
                    let err = PlacementError::from(conflict);
                    self.log_rejection(
                        Some(request.category),
                        request.bounds(),
                        Some(descriptor),
                        &err,
                    );
                    return Err(err);
                }
            }

            self.components.push(ComponentRecord {
                id,
                category: request.category,
                block: instance.block,
                bounds: instance.bounds,
                orientation: instance.orientation,
                slot: instance.slot,
            });
        }

        let mut created = Vec::with_capacity(self.components.len() - first_new);
        for record in &self.components[first_new..] {
            self.last_placed[record.slot.index()] = Some(record.id);
            created.push(record.id);
            self.log.push(LogEntry {
                category: Some(record.category),
                block: Some(record.block.clone()),
                bounds: record.bounds,
                orientation: Some(record.orientation),
                slot: Some(record.slot),
                outcome: LogOutcome::Placed,
            });
        }

        Ok(PlacementReport {
            components: created,
        })
    }

    fn resolve(&self, block: &BlockId) -> std::result::Result<(), PlacementError> {
        self.registry
            .resolve(block)
            .map(|_| ())
            .ok_or_else(|| PlacementError::UnknownBlockType(block.clone()))
    }

    fn validate_bounds(&self, bounds: &BoundingBox) -> std::result::Result<(), PlacementError> {
        if !bounds.is_well_formed() {
            return Err(PlacementError::ConstructionFailure(format!(
                "inverted bounding box {}..{}",
                bounds.min, bounds.max
            )));
        }
        let count = bounds.cell_count();
        if count > self.rules.max_component_cells {
            return Err(PlacementError::ConstructionFailure(format!(
                "bounding box {} covers {} cells, limit is {}",
                bounds, count, self.rules.max_component_cells
            )));
        }
        Ok(())
    }

    /// `descriptor` is the resolved reference block, once known
    fn log_rejection(
        &mut self,
        category: Option<BlockCategory>,
        bounds: BoundingBox,
        descriptor: Option<&PrefabDescriptor>,
        err: &PlacementError,
    ) {
        self.log.push(LogEntry {
            category,
            block: descriptor.map(|d| d.block.clone()),
            bounds,
            orientation: descriptor.map(|d| d.orientation),
            slot: None,
            outcome: LogOutcome::Rejected(err.to_string()),
        });
    }

    /// Component occupying a cell
    pub fn block_at(&self, cell: Cell) -> Option<&ComponentRecord> {
        self.occupancy
            .lookup(cell)
            .and_then(|id| self.component(id))
    }

    pub fn restriction_at(&self, cell: Cell) -> RestrictionTag {
        self.occupancy.tag_at(cell)
    }

    pub fn component(&self, id: ComponentId) -> Option<&ComponentRecord> {
        self.components.get(id.0 as usize)
    }

    /// Every placed component, in creation order
    pub fn components(&self) -> &[ComponentRecord] {
        &self.components
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Number of cells claimed by components
    pub fn occupied_cell_count(&self) -> usize {
        self.occupancy.cell_map().len()
    }

    /// Most recent record created in a slot, by any placement
    pub fn last_placed(&self, slot: InstanceSlot) -> Option<&ComponentRecord> {
        self.last_placed[slot.index()].and_then(|id| self.component(id))
    }

    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    pub fn log(&self) -> &ConstructionLog {
        &self.log
    }

    pub fn rules(&self) -> &ConstructionRules {
        &self.rules
    }

    pub fn extents(&self) -> ConstructExtents {
        self.extents
    }

    /// Advisory only: placement never checks this
    pub fn within_extents(&self, cell: Cell) -> bool {
        self.extents.contains(cell)
    }

    /// Invariant violations between the maps and the records; empty when sound
    pub fn audit(&self) -> Vec<String> {
        self.occupancy
            .audit(self.components.iter().map(|c| (c.id, c.bounds)))
    }

    pub fn output(&self) -> ConstructOutput {
        ConstructOutput::from_records(&self.components)
    }

    pub fn finish(self) -> ConstructOutput {
        self.output()
    }
}
