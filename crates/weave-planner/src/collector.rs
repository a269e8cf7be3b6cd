//! Sinks for the plans of a planning run.

use crate::graph::Plan;
use crate::rating::{PlanRater, RatedPlan};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::debug;

/// How planning continues after a plan has been collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectDecision {
    /// Keep extracting plans.
    Continue,
    /// Stop extracting at the current depth and move on to the next one.
    SkipLevel,
    /// Stop planning.
    Stop,
}

/// What a collector did with an offered plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The plan is kept.
    Kept,
    /// The plan was dropped.
    Rejected,
    /// The plan is kept in place of an evicted plan of `evicted_depth`.
    Replaced { evicted_depth: usize },
}

/// The result of offering a plan to a collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collected {
    pub admission: Admission,
    pub decision: CollectDecision,
}

impl Collected {
    #[must_use]
    pub fn kept(decision: CollectDecision) -> Self {
        Self { admission: Admission::Kept, decision }
    }

    #[must_use]
    pub fn rejected(decision: CollectDecision) -> Self {
        Self { admission: Admission::Rejected, decision }
    }
}

/// Receives plans in the order they are discovered.
pub trait PlanCollector {
    /// Offers `plan`, reporting whether it was kept.
    fn admit(&mut self, plan: Plan) -> Collected;

    fn collect(&mut self, plan: Plan) -> CollectDecision {
        self.admit(plan).decision
    }
}

/// A closure takes ownership of every plan it receives.
impl<F> PlanCollector for F
where
    F: FnMut(Plan) -> CollectDecision,
{
    fn admit(&mut self, plan: Plan) -> Collected {
        Collected::kept(self(plan))
    }
}

/// Keeps plans in discovery order, optionally up to a limit.
///
/// A limit of zero keeps no plans and stops planning at the first plan.
#[derive(Debug, Clone, Default)]
pub struct SequentialPlanCollector {
    plans: Vec<Plan>,
    limit: Option<usize>,
}

impl SequentialPlanCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collector asking to stop once `limit` plans are collected.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self { plans: Vec::new(), limit: Some(limit) }
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn into_plans(self) -> Vec<Plan> {
        self.plans
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.plans.len() >= limit)
    }
}

impl PlanCollector for SequentialPlanCollector {
    fn admit(&mut self, plan: Plan) -> Collected {
        if self.is_full() {
            return Collected::rejected(CollectDecision::Stop);
        }
        self.plans.push(plan);
        Collected::kept(if self.is_full() { CollectDecision::Stop } else { CollectDecision::Continue })
    }
}

/// Heap entry ordered by rating, then by discovery.
#[derive(Debug)]
struct Entry {
    rated: RatedPlan,
    seq: u64,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rated.cmp(&other.rated).then(self.seq.cmp(&other.seq))
    }
}

/// Keeps the best rated plans.
///
/// Plans the rater rejects are dropped. With a capacity, the worst rated
/// plan is evicted whenever the collector overflows; among equal ratings the
/// earlier plan stays.
pub struct RatingPlanCollector {
    rater: Box<dyn PlanRater>,
    capacity: Option<usize>,
    // Max-heap: the worst plan is on top.
    heap: BinaryHeap<Entry>,
    seq: u64,
}

impl RatingPlanCollector {
    #[must_use]
    pub fn new(rater: Box<dyn PlanRater>) -> Self {
        Self { rater, capacity: None, heap: BinaryHeap::new(), seq: 0 }
    }

    #[must_use]
    pub fn with_capacity(rater: Box<dyn PlanRater>, capacity: usize) -> Self {
        Self { capacity: Some(capacity), ..Self::new(rater) }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Collected plans, best first.
    pub fn into_ranked(self) -> Vec<RatedPlan> {
        self.heap.into_sorted_vec().into_iter().map(|e| e.rated).collect()
    }
}

impl PlanCollector for RatingPlanCollector {
    fn admit(&mut self, plan: Plan) -> Collected {
        let Some(rating) = self.rater.rate(&plan) else {
            debug!(depth = plan.depth(), "rejected plan");
            return Collected::rejected(CollectDecision::Continue);
        };
        let seq = self.seq;
        self.heap.push(Entry { rated: RatedPlan::new(plan, rating), seq });
        self.seq += 1;

        let admission = match self.capacity {
            Some(capacity) if self.heap.len() > capacity => match self.heap.pop() {
                Some(evicted) if evicted.seq == seq => Admission::Rejected,
                Some(evicted) => Admission::Replaced { evicted_depth: evicted.rated.plan().depth() },
                None => Admission::Kept,
            },
            _ => Admission::Kept,
        };
        Collected { admission, decision: CollectDecision::Continue }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Graph, InitialLevel, TaskProvision};
    use crate::rating::{InteractionCountRater, Rating, TraversingPlanRater};
    use weave_models::{Action, Interaction, Task, Widget};

    fn plan(interactions: usize) -> Plan {
        let t = Task::new("t").unwrap();
        let mut builder = Action::builder(Widget::new("w").unwrap()).realizes(t.clone());
        for i in 0..interactions {
            builder = builder.interaction(Interaction::new(format!("step {i}")));
        }
        let provision = TaskProvision::from_parts(t.clone(), t, builder.build()).unwrap();
        Plan::new(Graph::new(InitialLevel::new([provision]).unwrap())).unwrap()
    }

    #[test]
    fn test_sequential_collector_limit() {
        let mut collector = SequentialPlanCollector::with_limit(2);
        assert_eq!(collector.collect(plan(0)), CollectDecision::Continue);
        assert_eq!(collector.collect(plan(1)), CollectDecision::Stop);
        assert_eq!(collector.collect(plan(2)), CollectDecision::Stop);
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn test_closure_collector() {
        let mut seen = 0;
        let mut collector = |_plan: Plan| {
            seen += 1;
            CollectDecision::SkipLevel
        };
        assert_eq!(collector.collect(plan(0)), CollectDecision::SkipLevel);
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_rating_collector_keeps_best() {
        let rater = Box::new(TraversingPlanRater::new(InteractionCountRater));
        let mut collector = RatingPlanCollector::with_capacity(rater, 2);
        for n in [3, 1, 2, 0] {
            assert_eq!(collector.collect(plan(n)), CollectDecision::Continue);
        }

        let ratings: Vec<Rating> = collector.into_ranked().iter().map(RatedPlan::rating).collect();
        assert_eq!(ratings, vec![Rating::new(0.0), Rating::new(1.0)]);
    }

    #[test]
    fn test_zero_limit_keeps_nothing() {
        let mut collector = SequentialPlanCollector::with_limit(0);
        assert_eq!(collector.admit(plan(0)), Collected::rejected(CollectDecision::Stop));
        assert!(collector.is_empty());
    }

    struct RejectAll;

    impl PlanRater for RejectAll {
        fn rate(&self, _plan: &Plan) -> Option<Rating> {
            None
        }
    }

    #[test]
    fn test_rating_collector_admissions() {
        let mut rejecting = RatingPlanCollector::new(Box::new(RejectAll));
        assert_eq!(rejecting.admit(plan(0)), Collected::rejected(CollectDecision::Continue));
        assert!(rejecting.is_empty());

        let rater = Box::new(TraversingPlanRater::new(InteractionCountRater));
        let mut collector = RatingPlanCollector::with_capacity(rater, 1);
        assert_eq!(collector.admit(plan(2)), Collected::kept(CollectDecision::Continue));
        assert_eq!(collector.admit(plan(3)), Collected::rejected(CollectDecision::Continue));
        assert_eq!(
            collector.admit(plan(1)).admission,
            Admission::Replaced { evicted_depth: 1 }
        );
        assert_eq!(collector.len(), 1);
    }
}
