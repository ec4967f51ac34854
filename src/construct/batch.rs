//! Parallel generation of independent constructs
//!
//! Each plan gets its own engine on a rayon worker; nothing mutable is
//! shared. The catalogs are only read, so one copy serves every worker.

use rayon::prelude::*;

use crate::catalog::{BlockRegistry, ReferenceLibrary};
use crate::core::error::Result;

use super::plan::{ConstructPlan, PlanOutcome};

/// Run every plan, results in input order
pub fn run_batch<L, R>(plans: &[ConstructPlan], library: &L, registry: &R) -> Vec<Result<PlanOutcome>>
where
    L: ReferenceLibrary + Sync + ?Sized,
    R: BlockRegistry + Sync + ?Sized,
{
    let results: Vec<Result<PlanOutcome>> = plans
        .par_iter()
        .map(|plan| plan.run(library, registry))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    tracing::info!(
        plans = plans.len(),
        failed,
        "Batch generation complete"
    );

    results
}
