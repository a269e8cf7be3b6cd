//! Rating of plans.
//!
//! A rating is a cost: lower ratings denote better plans. Raters may reject
//! a plan altogether by returning no rating.

use crate::graph::{
    ActionProvision, Graph, Level, LevelRef, Plan, PropertyProvision, TaskProvision,
};
use std::cmp::Ordering;
use std::fmt;
use weave_models::Action;

/// A cost score of a plan, totally ordered.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rating(f64);

impl Rating {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Rating {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rating {}

impl PartialOrd for Rating {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rating {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A plan together with its rating, ordered by rating.
#[derive(Debug, Clone)]
pub struct RatedPlan {
    plan: Plan,
    rating: Rating,
}

impl RatedPlan {
    #[must_use]
    pub fn new(plan: Plan, rating: Rating) -> Self {
        Self { plan, rating }
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn into_plan(self) -> Plan {
        self.plan
    }
}

impl PartialEq for RatedPlan {
    fn eq(&self, other: &Self) -> bool {
        self.rating == other.rating
    }
}

impl Eq for RatedPlan {}

impl PartialOrd for RatedPlan {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RatedPlan {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rating.cmp(&other.rating)
    }
}

/// Rates plans. `None` rejects a plan.
pub trait PlanRater: Send + Sync {
    fn rate(&self, plan: &Plan) -> Option<Rating>;
}

/// Rates the parts of a plan visited by a [`TraversingPlanRater`].
///
/// Every part rates 0 unless overridden; `None` rejects the whole plan.
pub trait PlanRaterVisitor: Send + Sync {
    fn rate_graph(&self, _graph: &Graph) -> Option<i64> {
        Some(0)
    }

    fn rate_level(&self, _level: LevelRef<'_>) -> Option<i64> {
        Some(0)
    }

    fn rate_task_provision(&self, _provision: &TaskProvision) -> Option<i64> {
        Some(0)
    }

    fn rate_action_provision(&self, _provision: &ActionProvision) -> Option<i64> {
        Some(0)
    }

    fn rate_property_provision(&self, _provision: &PropertyProvision) -> Option<i64> {
        Some(0)
    }

    fn rate_action(&self, _action: &Action) -> Option<i64> {
        Some(0)
    }
}

/// Sums the visitor's ratings over every part of a plan.
///
/// A plan whose total overflows is rejected.
///
/// The initial level is visited first, followed by the extension levels
/// from the most recent to the oldest.
#[derive(Debug, Clone, Default)]
pub struct TraversingPlanRater<V> {
    visitor: V,
}

impl<V: PlanRaterVisitor> TraversingPlanRater<V> {
    #[must_use]
    pub fn new(visitor: V) -> Self {
        Self { visitor }
    }

    fn traverse(&self, graph: &Graph) -> Option<i64> {
        let v = &self.visitor;
        let mut total = v.rate_graph(graph)?;

        let initial = graph.initial_level();
        total = total.checked_add(v.rate_level(LevelRef::Initial(initial))?)?;
        for provision in initial.task_provisions() {
            total = total.checked_add(v.rate_task_provision(provision)?)?;
        }
        for action in initial.required_actions() {
            total = total.checked_add(v.rate_action(action)?)?;
        }

        for level in graph.extension_levels_rev() {
            total = total.checked_add(v.rate_level(LevelRef::Extension(level))?)?;
            for provision in level.action_provisions() {
                total = total.checked_add(v.rate_action_provision(provision)?)?;
                for pp in provision.property_provisions() {
                    total = total.checked_add(v.rate_property_provision(pp)?)?;
                }
            }
            for action in level.required_actions() {
                total = total.checked_add(v.rate_action(action)?)?;
            }
        }

        Some(total)
    }
}

impl<V: PlanRaterVisitor> PlanRater for TraversingPlanRater<V> {
    #[allow(clippy::cast_precision_loss)]
    fn rate(&self, plan: &Plan) -> Option<Rating> {
        self.traverse(plan.graph()).map(|total| Rating::new(total as f64))
    }
}

/// Penalises every user interaction a plan requires.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionCountRater;

impl PlanRaterVisitor for InteractionCountRater {
    fn rate_action(&self, action: &Action) -> Option<i64> {
        i64::try_from(action.interactions().len()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::InitialLevel;
    use weave_models::{Interaction, Task, Widget};

    fn plan_with(action: Action, t: &Task) -> Plan {
        Plan::new(Graph::new(
            InitialLevel::new([TaskProvision::from_parts(t.clone(), t.clone(), action).unwrap()])
                .unwrap(),
        ))
        .unwrap()
    }

    #[test]
    fn test_rating_order() {
        assert!(Rating::new(1.0) < Rating::new(2.5));
        assert_eq!(Rating::new(0.0), Rating::default());
        assert_eq!(Rating::new(3.0).max(Rating::new(-1.0)).value(), 3.0);
    }

    #[test]
    fn test_interaction_count() {
        let t = Task::new("t").unwrap();
        let action = Action::builder(Widget::new("w").unwrap())
            .realizes(t.clone())
            .interaction(Interaction::new("click"))
            .interaction(Interaction::new("type"))
            .build();

        let rater = TraversingPlanRater::new(InteractionCountRater);
        assert_eq!(rater.rate(&plan_with(action, &t)), Some(Rating::new(2.0)));
    }

    struct Rejecting;

    impl PlanRaterVisitor for Rejecting {
        fn rate_task_provision(&self, _provision: &TaskProvision) -> Option<i64> {
            None
        }
    }

    #[test]
    fn test_visitor_rejects_plan() {
        let t = Task::new("t").unwrap();
        let action = Action::builder(Widget::new("w").unwrap()).realizes(t.clone()).build();

        assert_eq!(TraversingPlanRater::new(Rejecting).rate(&plan_with(action, &t)), None);
    }

    struct Saturating;

    impl PlanRaterVisitor for Saturating {
        fn rate_graph(&self, _graph: &Graph) -> Option<i64> {
            Some(i64::MAX)
        }

        fn rate_action(&self, _action: &Action) -> Option<i64> {
            Some(1)
        }
    }

    #[test]
    fn test_overflowing_total_rejects_plan() {
        let t = Task::new("t").unwrap();
        let action = Action::builder(Widget::new("w").unwrap()).realizes(t.clone()).build();

        assert_eq!(TraversingPlanRater::new(Saturating).rate(&plan_with(action, &t)), None);
    }
}
