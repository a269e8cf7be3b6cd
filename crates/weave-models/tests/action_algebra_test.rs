//! Integration tests for the proposition and action algebra.

use std::collections::BTreeSet;
use weave_models::{Action, Property, Proposition, PropositionSet, Task, Type, Widget};

fn property(name: &str) -> Property {
    Property::new(name, Type::new("text").unwrap()).unwrap()
}

fn widget(id: &str) -> Widget {
    Widget::new(id).unwrap()
}

#[test]
fn test_no_contradictory_propositions() {
    for name in ["a", "b", "location", "query"] {
        let p = property(name);
        let result = PropositionSet::new([Proposition::cleared(p.clone()), Proposition::filled(p)]);
        assert!(result.is_err(), "contradiction accepted for {name}");
    }
}

#[test]
fn test_post_condition_derivation() {
    let to_clear = [property("c1"), property("c2")];
    let to_fill = [property("f1")];
    let pre = PropositionSet::from_properties(
        [property("c1"), property("x")],
        [property("f1"), property("y")],
    )
    .unwrap();
    let effects = PropositionSet::from_properties(to_clear.clone(), to_fill.clone()).unwrap();

    let post = effects.create_post_conditions(&pre);

    let touched: BTreeSet<Property> = to_clear.iter().chain(to_fill.iter()).cloned().collect();
    let mut expected: Vec<Proposition> = to_clear.iter().cloned().map(Proposition::cleared).collect();
    expected.extend(to_fill.iter().cloned().map(Proposition::filled));
    expected.extend(pre.iter().filter(|q| !touched.contains(q.property())).cloned());

    assert_eq!(post, PropositionSet::new(expected).unwrap());
}

#[test]
fn test_composability() {
    let a = Action::builder(widget("w")).realizes(Task::new("t").unwrap()).build();
    assert_eq!(Action::compose([a.clone()]).unwrap(), a);

    let other = Action::builder(widget("x")).build();
    assert!(Action::compose([a.clone(), other]).is_err());

    let fills = Action::builder(widget("w"))
        .effects(PropositionSet::filled([property("p")]))
        .publishes(property("p"))
        .build();
    let needs_cleared = Action::builder(widget("w"))
        .pre_conditions(PropositionSet::cleared([property("p")]))
        .build();
    assert!(Action::compose([fills, needs_cleared]).is_err());
}

#[test]
fn test_represents_transitivity() {
    let a = Action::builder(widget("w")).realizes(Task::new("a").unwrap()).build();
    let b = Action::builder(widget("w")).realizes(Task::new("b").unwrap()).build();
    let e = Action::builder(widget("w")).realizes(Task::new("e").unwrap()).build();

    let c = Action::compose([a.clone(), b.clone()]).unwrap();
    let d = Action::compose([c, e]).unwrap();

    assert!(d.represents(&a));
    assert!(d.represents(&b));
}

#[test]
fn test_mutex_is_symmetric() {
    let actions = vec![
        Action::builder(widget("w"))
            .pre_conditions(PropositionSet::cleared([property("p")]))
            .build(),
        Action::builder(widget("w"))
            .pre_conditions(PropositionSet::filled([property("p")]))
            .build(),
        Action::builder(widget("w"))
            .effects(PropositionSet::filled([property("p")]))
            .build(),
        Action::builder(widget("w"))
            .effects(PropositionSet::cleared([property("q")]))
            .build(),
    ];

    for x in &actions {
        for y in &actions {
            assert_eq!(Action::is_mutex(x, y), Action::is_mutex(y, x));
        }
    }
}
