//! Cell -> occupying component

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::Cell;

/// Index of a placed component within its construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub u32);

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which component occupies each claimed cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellMap {
    cells: AHashMap<Cell, ComponentId>,
}

impl CellMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, cell: Cell) -> Option<ComponentId> {
        self.cells.get(&cell).copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains_key(&cell)
    }

    pub fn insert(&mut self, cell: Cell, component: ComponentId) -> Option<ComponentId> {
        self.cells.insert(cell, component)
    }

    pub fn remove(&mut self, cell: Cell) -> Option<ComponentId> {
        self.cells.remove(&cell)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, ComponentId)> + '_ {
        self.cells.iter().map(|(&cell, &id)| (cell, id))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    #[test]
    fn test_insert_and_lookup() {
        let mut map = CellMap::new();
        map.insert(IVec3::new(1, 0, 0), ComponentId(0));
        map.insert(IVec3::new(2, 0, 0), ComponentId(0));
        map.insert(IVec3::new(5, 0, 0), ComponentId(1));

        assert_eq!(map.get(IVec3::new(1, 0, 0)), Some(ComponentId(0)));
        assert_eq!(map.get(IVec3::new(3, 0, 0)), None);
        assert_eq!(map.len(), 3);
        assert_eq!(map.iter().filter(|&(_, id)| id == ComponentId(0)).count(), 2);
    }
}
