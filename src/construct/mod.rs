//! Construct building: engine, requests, log, output, plans and batches

pub mod batch;
pub mod engine;
pub mod log;
pub mod output;
pub mod plan;
pub mod request;

pub use batch::run_batch;
pub use engine::{ComponentRecord, ConstructEngine, PlacementError, PlacementReport};
pub use log::{ConstructionLog, LogEntry, LogOutcome};
pub use output::{ConstructOutput, PlacedBlock};
pub use plan::{check_output_names, ConstructPlan, PlanOutcome, PlanStep, StepResult};
pub use request::{InstanceSlot, PlacementRequest, Symmetry};
