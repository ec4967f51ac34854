//! Finished construct, ready for an external materialization step

use serde::{Deserialize, Serialize};

use crate::catalog::BlockId;
use crate::core::types::Cell;
use crate::grid::Orientation;

use super::engine::ComponentRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedBlock {
    pub block: BlockId,
    pub min: Cell,
    pub orientation: Orientation,
}

impl From<&ComponentRecord> for PlacedBlock {
    fn from(record: &ComponentRecord) -> Self {
        Self {
            block: record.block.clone(),
            min: record.bounds.min,
            orientation: record.orientation,
        }
    }
}

/// Blocks in placement order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructOutput {
    pub blocks: Vec<PlacedBlock>,
}

impl ConstructOutput {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ComponentRecord>) -> Self {
        Self {
            blocks: records.into_iter().map(PlacedBlock::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
