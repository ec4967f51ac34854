//! Append-only construction trail
//!
//! One entry per placement attempt (or per created instance on success).
//! Meant for offline reading; every entry is also emitted as a tracing event.

use crate::catalog::{BlockCategory, BlockId};
use crate::core::types::BoundingBox;
use crate::grid::Orientation;

use super::request::InstanceSlot;

#[derive(Debug, Clone, PartialEq)]
pub enum LogOutcome {
    Placed,
    ZoneReserved,
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// None for zone reservations
    pub category: Option<BlockCategory>,
    pub block: Option<BlockId>,
    pub bounds: BoundingBox,
    pub orientation: Option<Orientation>,
    pub slot: Option<InstanceSlot>,
    pub outcome: LogOutcome,
}

impl LogEntry {
    pub fn is_success(&self) -> bool {
        !matches!(self.outcome, LogOutcome::Rejected(_))
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            LogOutcome::Placed => write!(f, "Block Placed Successfully")?,
            LogOutcome::ZoneReserved => write!(f, "Zone Reserved")?,
            LogOutcome::Rejected(reason) => write!(f, "Placement Rejected ({})", reason)?,
        }
        if let Some(category) = self.category {
            write!(f, " - {}", category)?;
        }
        if let Some(slot) = self.slot {
            write!(f, " - {}", slot)?;
        }
        if let Some(block) = &self.block {
            write!(f, " - {}", block)?;
        }
        write!(f, " - {}", self.bounds)?;
        if let Some(orientation) = self.orientation {
            write!(f, " - {}", orientation)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructionLog {
    entries: Vec<LogEntry>,
}

impl ConstructionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LogEntry) {
        tracing::debug!(success = entry.is_success(), "{}", entry);
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_success()).count()
    }
}

impl std::fmt::Display for ConstructionLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    fn placed() -> LogEntry {
        LogEntry {
            category: Some(BlockCategory::Cockpit),
            block: Some(BlockId::from("Cockpit/LargeBlockCockpit")),
            bounds: BoundingBox::single(IVec3::ZERO),
            orientation: Some(Orientation::IDENTITY),
            slot: Some(InstanceSlot::Primary),
            outcome: LogOutcome::Placed,
        }
    }

    #[test]
    fn test_entry_line() {
        assert_eq!(
            placed().to_string(),
            "Block Placed Successfully - Cockpit - Primary - Cockpit/LargeBlockCockpit - [0, 0, 0] - [Forward: Forward, Up: Up]"
        );
    }

    #[test]
    fn test_log_is_line_per_entry() {
        let mut log = ConstructionLog::new();
        log.push(placed());
        log.push(LogEntry {
            category: Some(BlockCategory::Reactor),
            block: None,
            bounds: BoundingBox::single(IVec3::X),
            orientation: None,
            slot: None,
            outcome: LogOutcome::Rejected("unknown reference".into()),
        });

        assert_eq!(log.len(), 2);
        assert_eq!(log.failures(), 1);
        let text = log.to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().starts_with("Placement Rejected (unknown reference) - Reactor"));
    }
}
