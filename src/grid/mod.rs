//! Integer placement grid: orientations, per-cell tags and occupancy

pub mod cell_map;
pub mod occupancy;
pub mod orientation;
pub mod restriction;

pub use cell_map::{CellMap, ComponentId};
pub use occupancy::{CellConflict, Occupancy, Reservation};
pub use orientation::{Direction, Orientation};
pub use restriction::{RestrictionMask, RestrictionOverlay, RestrictionTag};
