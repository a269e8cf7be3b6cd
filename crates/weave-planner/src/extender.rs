//! Backward extension of a planning graph by one level.
//!
//! For each required action of the last level which is not enabled, the
//! extender looks for support: an optional precursor of the same widget and
//! property provisions covering the filled pre-conditions the precursor
//! leaves open. Every alternative becomes an action provision of the new
//! level; alternatives for one action are kept side by side.

use crate::combinatorics::ProductSet;
use crate::cycle::CyclicDependencyDetector;
use crate::error::{PlanningError, Result};
use crate::graph::{ActionProvision, ExtensionLevel, Graph, Level, PropertyProvision};
use crate::providers::{PrecursorActionProvider, PropertyProvisionProvider};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info};
use weave_models::{Action, Property};

/// Extends a graph by one level.
pub trait GraphExtender: Send + Sync {
    /// Returns `graph` extended by a level supporting its unsatisfied
    /// required actions.
    ///
    /// # Errors
    /// Returns `PlanningError::SatisfiedGraph` if there is nothing left to
    /// support and `PlanningError::NoActionProvisions` if no required action
    /// can be supported.
    fn extend_graph(&self, graph: &Graph) -> Result<Graph>;
}

/// A potential action provision, lacking its property provisions.
struct Candidate {
    request: Action,
    precursor: Option<Action>,
    required_properties: BTreeSet<Property>,
}

pub struct DefaultGraphExtender {
    precursors: Arc<dyn PrecursorActionProvider>,
    properties: Arc<dyn PropertyProvisionProvider>,
    cycles: Arc<dyn CyclicDependencyDetector>,
}

impl DefaultGraphExtender {
    #[must_use]
    pub fn new(
        precursors: Arc<dyn PrecursorActionProvider>,
        properties: Arc<dyn PropertyProvisionProvider>,
        cycles: Arc<dyn CyclicDependencyDetector>,
    ) -> Self {
        Self { precursors, properties, cycles }
    }

    fn find_candidates(&self, request: &Action, graph: &Graph) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for precursor in self.precursors.precursor_actions_for(request) {
            if !precursor.can_be_precursor_of(request) {
                continue;
            }
            if self.cycles.creates_cyclic_dependency_via(&precursor, request, graph) {
                debug!(action = %request, precursor = %precursor, "rejected cyclic precursor");
                continue;
            }
            let Ok(required_properties) = request.filled_properties_not_satisfied_by(&precursor)
            else {
                continue;
            };
            // A precursor must at least fill something if the request could do without.
            if !request.requires_precursor()
                && required_properties.len() == request.filled_pre_properties().len()
            {
                continue;
            }
            candidates.push(Candidate {
                request: request.clone(),
                precursor: Some(precursor),
                required_properties,
            });
        }

        if !request.requires_precursor() {
            candidates.push(Candidate {
                request: request.clone(),
                precursor: None,
                required_properties: request.filled_pre_properties().clone(),
            });
        }

        candidates
    }

    fn create_action_provisions(
        &self,
        candidate: Candidate,
        index: &BTreeMap<Property, Vec<PropertyProvision>>,
        graph: &Graph,
    ) -> Vec<ActionProvision> {
        if candidate.required_properties.is_empty() {
            return ActionProvision::new(candidate.request, candidate.precursor, [])
                .into_iter()
                .collect();
        }

        let alternatives: Vec<Vec<PropertyProvision>> = candidate
            .required_properties
            .iter()
            .map(|p| index.get(p).cloned().unwrap_or_default())
            .collect();

        ProductSet::new(alternatives)
            .filter(|combination| {
                have_disjoint_providing_actions(combination)
                    && !combination.iter().any(|pp| {
                        self.cycles.creates_cyclic_dependency_via(
                            pp.providing_action(),
                            &candidate.request,
                            graph,
                        )
                    })
            })
            .filter_map(|combination| {
                ActionProvision::new(
                    candidate.request.clone(),
                    candidate.precursor.clone(),
                    combination,
                )
                .inspect_err(|e| debug!(action = %candidate.request, error = %e, "skipped provision"))
                .ok()
            })
            .collect()
    }
}

impl GraphExtender for DefaultGraphExtender {
    fn extend_graph(&self, graph: &Graph) -> Result<Graph> {
        let unsatisfied: Vec<Action> = graph
            .last_level()
            .required_actions()
            .iter()
            .filter(|a| !a.is_enabled())
            .cloned()
            .collect();
        if unsatisfied.is_empty() {
            return Err(PlanningError::SatisfiedGraph);
        }

        let candidates: Vec<Candidate> =
            unsatisfied.iter().flat_map(|a| self.find_candidates(a, graph)).collect();

        let required: BTreeSet<Property> =
            candidates.iter().flat_map(|c| c.required_properties.iter().cloned()).collect();
        let mut index: BTreeMap<Property, Vec<PropertyProvision>> = BTreeMap::new();
        if !required.is_empty() {
            for provision in self.properties.provisions_for_properties(&required) {
                index.entry(provision.request().clone()).or_default().push(provision);
            }
        }

        let provisions: BTreeSet<ActionProvision> = candidates
            .into_iter()
            .flat_map(|c| self.create_action_provisions(c, &index, graph))
            .collect();
        if provisions.is_empty() {
            return Err(PlanningError::NoActionProvisions);
        }

        let extended = graph.extend_with(ExtensionLevel::new(provisions)?)?;
        info!(
            depth = extended.depth(),
            provisions = extended.last_extension_level().map_or(0, |l| l.action_provisions().len()),
            "extended planning graph"
        );
        Ok(extended)
    }
}

/// No providing action may represent another one of the same combination.
fn have_disjoint_providing_actions(provisions: &[PropertyProvision]) -> bool {
    provisions.iter().all(|x| {
        provisions.iter().all(|y| {
            let (a1, a2) = (x.providing_action(), y.providing_action());
            a1 == a2 || !a1.represents(a2)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::PathWalkingCyclicDependencyDetector;
    use crate::graph::{InitialLevel, TaskProvision};
    use crate::providers::{BasicPrecursorActionProvider, BasicPropertyProvisionProvider};
    use weave_models::{InMemoryRepository, PropositionSet, Repository, Task, Type, Widget};

    fn property(name: &str) -> Property {
        Property::new(name, Type::new("text").unwrap()).unwrap()
    }

    fn extender(repository: InMemoryRepository) -> DefaultGraphExtender {
        let repository: Arc<dyn Repository> = Arc::new(repository);
        DefaultGraphExtender::new(
            Arc::new(BasicPrecursorActionProvider::new(repository.clone())),
            Arc::new(BasicPropertyProvisionProvider::new(repository)),
            Arc::new(PathWalkingCyclicDependencyDetector),
        )
    }

    fn graph_for(t: &Task, action: &Action) -> Graph {
        Graph::new(
            InitialLevel::new([TaskProvision::from_parts(t.clone(), t.clone(), action.clone()).unwrap()])
                .unwrap(),
        )
    }

    #[test]
    fn test_extends_with_property_provisions() {
        let p = property("p1");
        let t = Task::new("t").unwrap();
        let a1 = Action::builder(Widget::new("w").unwrap())
            .pre_conditions(PropositionSet::filled([p.clone()]))
            .realizes(t.clone())
            .build();
        let a2 = Action::builder(Widget::new("x").unwrap())
            .effects(PropositionSet::filled([p.clone()]))
            .publishes(p.clone())
            .build();
        let repository = InMemoryRepository::new().with_action(a1.clone()).with_action(a2.clone());

        let graph = extender(repository).extend_graph(&graph_for(&t, &a1)).unwrap();

        let expected = ActionProvision::without_precursor(
            a1,
            [PropertyProvision::from_parts(p.clone(), p, a2).unwrap()],
        )
        .unwrap();
        assert_eq!(graph.depth(), 2);
        assert_eq!(
            graph.last_extension_level().unwrap().action_provisions(),
            &BTreeSet::from([expected])
        );
    }

    #[test]
    fn test_extends_with_precursor() {
        let p = property("p");
        let w = Widget::new("w").unwrap();
        let t = Task::new("t").unwrap();
        let a1 = Action::builder(w.clone())
            .pre_conditions(PropositionSet::cleared([p.clone()]))
            .realizes(t.clone())
            .build();
        let a3 = Action::builder(w).effects(PropositionSet::cleared([p])).build();
        let repository = InMemoryRepository::new().with_action(a1.clone()).with_action(a3.clone());

        let graph = extender(repository).extend_graph(&graph_for(&t, &a1)).unwrap();

        let expected =
            ActionProvision::with_precursor(a1, a3, Vec::<PropertyProvision>::new()).unwrap();
        assert_eq!(
            graph.last_extension_level().unwrap().action_provisions(),
            &BTreeSet::from([expected])
        );
        assert!(graph.is_satisfied());
    }

    #[test]
    fn test_rejects_satisfied_graph() {
        let t = Task::new("t").unwrap();
        let a = Action::builder(Widget::new("w").unwrap()).realizes(t.clone()).build();
        let repository = InMemoryRepository::new().with_action(a.clone());

        let result = extender(repository).extend_graph(&graph_for(&t, &a));
        assert_eq!(result, Err(PlanningError::SatisfiedGraph));
    }

    #[test]
    fn test_fails_without_support() {
        let t = Task::new("t").unwrap();
        let a = Action::builder(Widget::new("w").unwrap())
            .pre_conditions(PropositionSet::filled([property("p")]))
            .realizes(t.clone())
            .build();
        let repository = InMemoryRepository::new().with_action(a.clone());

        let result = extender(repository).extend_graph(&graph_for(&t, &a));
        assert_eq!(result, Err(PlanningError::NoActionProvisions));
    }

    #[test]
    fn test_disjoint_providing_actions() {
        let p = property("p");
        let q = property("q");
        let w = Widget::new("x").unwrap();
        let fp = Action::builder(w.clone())
            .effects(PropositionSet::filled([p.clone()]))
            .publishes(p.clone())
            .build();
        let fq = Action::builder(w)
            .effects(PropositionSet::filled([q.clone()]))
            .publishes(q.clone())
            .build();
        let both = Action::compose([fp.clone(), fq.clone()]).unwrap();

        let separate = vec![
            PropertyProvision::from_parts(p.clone(), p.clone(), fp.clone()).unwrap(),
            PropertyProvision::from_parts(q.clone(), q.clone(), fq).unwrap(),
        ];
        let overlapping = vec![
            PropertyProvision::from_parts(p.clone(), p, fp).unwrap(),
            PropertyProvision::from_parts(q.clone(), q, both).unwrap(),
        ];
        assert!(have_disjoint_providing_actions(&separate));
        assert!(!have_disjoint_providing_actions(&overlapping));
    }
}
