//! Scripted construct plans
//!
//! A plan is a fixed list of placement and zone steps replayed in order on
//! a fresh engine. Failed steps are recorded and skipped, the way a
//! generator would drop a branch and carry on.

use ahash::AHashSet;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::catalog::{BlockRegistry, ReferenceLibrary};
use crate::core::config::{ConstructExtents, ConstructionRules};
use crate::core::error::{Result, ShipwrightError};
use crate::core::types::Cell;
use crate::grid::ComponentId;

use super::engine::{ConstructEngine, PlacementError};
use super::log::ConstructionLog;
use super::output::ConstructOutput;
use super::request::PlacementRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanStep {
    Place(PlacementRequest),
    ReserveZone { min: Cell, max: Cell },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructPlan {
    pub name: String,
    /// Seed for sampling the construct's extents
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub rules: ConstructionRules,
    #[serde(default, rename = "step")]
    pub steps: Vec<PlanStep>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    Placed(Vec<ComponentId>),
    ZoneReserved(usize),
    Failed(PlacementError),
}

impl StepResult {
    pub fn is_success(&self) -> bool {
        !matches!(self, StepResult::Failed(_))
    }
}

/// Everything produced by replaying one plan
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub name: String,
    pub extents: ConstructExtents,
    pub steps: Vec<StepResult>,
    pub output: ConstructOutput,
    pub log: ConstructionLog,
}

impl PlanOutcome {
    pub fn failed_steps(&self) -> usize {
        self.steps.iter().filter(|s| !s.is_success()).count()
    }
}

impl ConstructPlan {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Plan name as an output file stem
    ///
    /// Only ASCII letters, digits, `-`, `_` and inner `.` are accepted, so the
    /// name can never point outside the output directory.
    pub fn file_stem(&self) -> Result<&str> {
        let name = self.name.as_str();
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

        if valid {
            Ok(name)
        } else {
            Err(ShipwrightError::Plan(format!(
                "plan name {:?} is not usable as a file name",
                name
            )))
        }
    }

    /// Replay every step on a fresh engine
    ///
    /// Only invalid rules abort the run; placement failures are collected.
    pub fn run<L, R>(&self, library: &L, registry: &R) -> Result<PlanOutcome>
    where
        L: ReferenceLibrary + ?Sized,
        R: BlockRegistry + ?Sized,
    {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut engine = ConstructEngine::new(self.rules.clone(), &mut rng, library, registry)?;

        let steps: Vec<StepResult> = self
            .steps
            .iter()
            .map(|step| match step {
                PlanStep::Place(request) => match engine.place(request) {
                    Ok(report) => StepResult::Placed(report.components),
                    Err(err) => StepResult::Failed(err),
                },
                PlanStep::ReserveZone { min, max } => match engine.reserve_zone(*min, *max) {
                    Ok(cells) => StepResult::ZoneReserved(cells),
                    Err(err) => StepResult::Failed(err),
                },
            })
            .collect();

        let outcome = PlanOutcome {
            name: self.name.clone(),
            extents: engine.extents(),
            steps,
            log: engine.log().clone(),
            output: engine.finish(),
        };

        tracing::info!(
            plan = %outcome.name,
            blocks = outcome.output.len(),
            failed_steps = outcome.failed_steps(),
            "Construct plan complete"
        );

        Ok(outcome)
    }
}

/// Check that every plan has a usable, distinct output file stem
pub fn check_output_names(plans: &[ConstructPlan]) -> Result<()> {
    let mut seen = AHashSet::new();
    for plan in plans {
        let stem = plan.file_stem()?;
        if !seen.insert(stem) {
            return Err(ShipwrightError::Plan(format!(
                "more than one plan is named {:?}",
                stem
            )));
        }
    }
    Ok(())
}
