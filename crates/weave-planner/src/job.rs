//! Running a planning problem to completion.

use crate::collector::{Admission, Collected, PlanCollector};
use crate::error::Result;
use crate::graph::Plan;
use crate::planner::Planner;
use crate::process::PlanningProcess;
use crate::problem::PlanningProblem;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Outcome of a planning run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanningReport {
    /// Plans accepted by the collector.
    pub plans: usize,
    /// Depth of the deepest plan accepted by the collector.
    pub max_depth: usize,
}

/// Tracks the plans the wrapped collector keeps, by depth.
struct CountingCollector<'a> {
    inner: &'a mut dyn PlanCollector,
    kept: BTreeMap<usize, usize>,
}

impl CountingCollector<'_> {
    fn release(&mut self, depth: usize) {
        if let Some(count) = self.kept.get_mut(&depth) {
            *count -= 1;
            if *count == 0 {
                self.kept.remove(&depth);
            }
        }
    }

    fn report(&self) -> PlanningReport {
        PlanningReport {
            plans: self.kept.values().sum(),
            max_depth: self.kept.keys().next_back().copied().unwrap_or_default(),
        }
    }
}

impl PlanCollector for CountingCollector<'_> {
    fn admit(&mut self, plan: Plan) -> Collected {
        let depth = plan.depth();
        let collected = self.inner.admit(plan);
        match collected.admission {
            Admission::Kept => *self.kept.entry(depth).or_default() += 1,
            Admission::Replaced { evicted_depth } => {
                self.release(evicted_depth);
                *self.kept.entry(depth).or_default() += 1;
            }
            Admission::Rejected => {}
        }
        collected
    }
}

/// Drives a [`PlanningProcess`] until it is done.
pub struct PlannerJob<'a> {
    planner: &'a dyn Planner,
}

impl<'a> PlannerJob<'a> {
    #[must_use]
    pub fn new(planner: &'a dyn Planner) -> Self {
        Self { planner }
    }

    /// Plans for `problem`, handing every plan to `collector`. The report
    /// covers the plans `collector` kept.
    ///
    /// A run which collected plans succeeds even if a later step fails; the
    /// failure is logged.
    ///
    /// # Errors
    /// Returns the planning error of a run which collected no plans.
    pub fn run(
        &self,
        problem: PlanningProblem,
        collector: &mut dyn PlanCollector,
    ) -> Result<PlanningReport> {
        let mut counting = CountingCollector { inner: collector, kept: BTreeMap::new() };
        let mut process = PlanningProcess::new(self.planner, &mut counting, problem);

        let mut failure = None;
        while !process.is_done() {
            if let Err(e) = process.advance() {
                failure = Some(e);
                break;
            }
        }
        drop(process);

        let report = counting.report();
        match failure {
            Some(e) if report.plans == 0 => Err(e),
            Some(e) => {
                warn!(error = %e, plans = report.plans, "planning stopped early");
                Ok(report)
            }
            None => {
                info!(plans = report.plans, max_depth = report.max_depth, "planning finished");
                Ok(report)
            }
        }
    }
}
