//! Shared fixtures for Weave planner integration tests.
//!
//! Each fixture returns a repository together with the actions it holds so
//! tests can compare graph contents against them.

#![allow(dead_code)]

use std::sync::Arc;
use weave_models::{Action, InMemoryRepository, Property, PropositionSet, Repository, Task, Type, Widget};
use weave_planner::Goal;

pub fn property(name: &str) -> Property {
    Property::new(name, Type::new("text").unwrap()).unwrap()
}

pub fn widget(id: &str) -> Widget {
    Widget::new(id).unwrap()
}

pub fn task(id: &str) -> Task {
    Task::new(id).unwrap()
}

pub fn goal(id: &str) -> Goal {
    Goal::new([task(id)]).unwrap()
}

/// Action of `widget` publishing `property` by filling it.
pub fn publisher(widget_id: &str, property: &Property) -> Action {
    Action::builder(widget(widget_id))
        .effects(PropositionSet::filled([property.clone()]))
        .publishes(property.clone())
        .build()
}

/// Action of `widget` realizing `t` once every property of `needs` is filled.
pub fn consumer(widget_id: &str, t: &Task, needs: &[Property]) -> Action {
    Action::builder(widget(widget_id))
        .pre_conditions(PropositionSet::filled(needs.iter().cloned()))
        .realizes(t.clone())
        .build()
}

pub fn repository(actions: &[Action]) -> Arc<dyn Repository> {
    let mut repository = InMemoryRepository::new();
    for action in actions {
        repository.add_action(action.clone());
    }
    Arc::new(repository)
}

/// Task `t` realized by `a1` of widget `w`, which needs `p1` filled; `a2` of
/// widget `x` publishes `p1`.
pub struct ChainFixture {
    pub t: Task,
    pub p1: Property,
    pub a1: Action,
    pub a2: Action,
    pub repository: Arc<dyn Repository>,
}

pub fn chain_fixture() -> ChainFixture {
    let t = task("t");
    let p1 = property("p1");
    let a1 = consumer("w", &t, &[p1.clone()]);
    let a2 = publisher("x", &p1);
    let repository = repository(&[a1.clone(), a2.clone()]);
    ChainFixture { t, p1, a1, a2, repository }
}

/// Task `t` realized either by the enabled `a1` or by `a2`, which needs `p`
/// from `a3` of another widget.
pub struct AlternativesFixture {
    pub t: Task,
    pub p: Property,
    pub a1: Action,
    pub a2: Action,
    pub a3: Action,
    pub repository: Arc<dyn Repository>,
}

pub fn alternatives_fixture() -> AlternativesFixture {
    let t = task("t");
    let p = property("p");
    let a1 = Action::builder(widget("w")).realizes(t.clone()).build();
    let a2 = consumer("w", &t, &[p.clone()]);
    let a3 = publisher("x", &p);
    let repository = repository(&[a1.clone(), a2.clone(), a3.clone()]);
    AlternativesFixture { t, p, a1, a2, a3, repository }
}
