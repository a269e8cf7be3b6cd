//! Widget actions and the algebra over them.
//!
//! An action belongs to one widget, has pre-conditions and effects, and may
//! publish properties, realize tasks and require user interactions. Composite
//! actions bundle pairwise non-mutex actions of one widget into a single
//! interaction step.
//!
//! Actions are immutable values shared behind an [`Arc`]. Equality, ordering
//! and hashing are structural over the derived fields; the constituents of a
//! composite take no part in them.

use crate::error::{ModelError, Result};
use crate::identifiers::{Interaction, Property, Task, Widget};
use crate::proposition::PropositionSet;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug)]
enum ActionKind {
    Atomic,
    Composite(BTreeSet<Action>),
}

#[derive(Debug)]
struct ActionData {
    widget: Widget,
    pre_conditions: PropositionSet,
    effects: PropositionSet,
    post_conditions: PropositionSet,
    published_properties: BTreeSet<Property>,
    realized_tasks: BTreeSet<Task>,
    interactions: BTreeSet<Interaction>,
    kind: ActionKind,
    // Property views used by the mutex tests.
    pre_cleared: BTreeSet<Property>,
    pre_filled: BTreeSet<Property>,
    post_cleared: BTreeSet<Property>,
    post_filled: BTreeSet<Property>,
}

impl ActionData {
    fn new(
        widget: Widget,
        pre_conditions: PropositionSet,
        effects: PropositionSet,
        published_properties: BTreeSet<Property>,
        realized_tasks: BTreeSet<Task>,
        interactions: BTreeSet<Interaction>,
        kind: ActionKind,
    ) -> Self {
        let post_conditions = effects.create_post_conditions(&pre_conditions);
        Self {
            pre_cleared: pre_conditions.cleared_properties(),
            pre_filled: pre_conditions.filled_properties(),
            post_cleared: post_conditions.cleared_properties(),
            post_filled: post_conditions.filled_properties(),
            widget,
            pre_conditions,
            effects,
            post_conditions,
            published_properties,
            realized_tasks,
            interactions,
            kind,
        }
    }
}

/// An action of a widget, either atomic or composite.
#[derive(Clone)]
pub struct Action(Arc<ActionData>);

impl Action {
    /// Starts building an atomic action of `widget`.
    #[must_use]
    pub fn builder(widget: Widget) -> ActionBuilder {
        ActionBuilder::new(widget)
    }

    /// Creates an action which only maintains the given pre-conditions.
    #[must_use]
    pub fn maintenance(widget: Widget, pre_conditions: PropositionSet) -> Self {
        Self::builder(widget).pre_conditions(pre_conditions).build()
    }

    pub fn widget(&self) -> &Widget {
        &self.0.widget
    }

    pub fn pre_conditions(&self) -> &PropositionSet {
        &self.0.pre_conditions
    }

    pub fn effects(&self) -> &PropositionSet {
        &self.0.effects
    }

    pub fn post_conditions(&self) -> &PropositionSet {
        &self.0.post_conditions
    }

    pub fn published_properties(&self) -> &BTreeSet<Property> {
        &self.0.published_properties
    }

    pub fn realized_tasks(&self) -> &BTreeSet<Task> {
        &self.0.realized_tasks
    }

    pub fn interactions(&self) -> &BTreeSet<Interaction> {
        &self.0.interactions
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.0.kind, ActionKind::Composite(_))
    }

    /// Returns the constituents of a composite action, or nothing for an
    /// atomic one.
    pub fn constituents(&self) -> impl Iterator<Item = &Action> {
        let actions = match &self.0.kind {
            ActionKind::Atomic => None,
            ActionKind::Composite(actions) => Some(actions),
        };
        actions.into_iter().flatten()
    }

    /// An action is enabled when it has no pre-conditions.
    pub fn is_enabled(&self) -> bool {
        self.0.pre_conditions.is_empty()
    }

    /// True when the action does nothing but keep its pre-conditions.
    pub fn is_maintenance(&self) -> bool {
        self.0.published_properties.is_empty()
            && self.0.realized_tasks.is_empty()
            && self.0.interactions.is_empty()
            && self.0.pre_conditions == self.0.post_conditions
    }

    pub fn publishes(&self, property: &Property) -> bool {
        self.0.published_properties.contains(property)
    }

    pub fn realizes(&self, task: &Task) -> bool {
        self.0.realized_tasks.contains(task)
    }

    pub fn belongs_to_same_widget(&self, other: &Action) -> bool {
        self.0.widget == other.0.widget
    }

    /// Cleared pre-conditions can only be established from within the same
    /// widget, so an action having any of them needs a precursor.
    pub fn requires_precursor(&self) -> bool {
        !self.0.pre_cleared.is_empty()
    }

    /// Checks whether this action, executed immediately before `other`,
    /// establishes every pre-condition of `other` that no other widget can
    /// satisfy.
    pub fn can_be_precursor_of(&self, other: &Action) -> bool {
        self.belongs_to_same_widget(other)
            && other.0.pre_cleared.iter().all(|p| self.0.post_cleared.contains(p))
    }

    /// Returns the properties `self` requires filled which `precursor` does
    /// not fill.
    ///
    /// # Errors
    /// Returns `ModelError::WidgetMismatch` if `precursor` belongs to another
    /// widget.
    pub fn filled_properties_not_satisfied_by(
        &self,
        precursor: &Action,
    ) -> Result<BTreeSet<Property>> {
        if !self.belongs_to_same_widget(precursor) {
            return Err(ModelError::WidgetMismatch {
                expected: self.0.widget.to_string(),
                actual: precursor.0.widget.to_string(),
            });
        }
        Ok(self
            .0
            .pre_filled
            .iter()
            .filter(|p| !precursor.0.post_filled.contains(*p))
            .cloned()
            .collect())
    }

    /// Properties `self` requires cleared.
    pub fn cleared_pre_properties(&self) -> &BTreeSet<Property> {
        &self.0.pre_cleared
    }

    /// Properties `self` requires filled.
    pub fn filled_pre_properties(&self) -> &BTreeSet<Property> {
        &self.0.pre_filled
    }

    /// An atomic action represents only an equal action. A composite
    /// additionally represents everything its constituents represent.
    pub fn represents(&self, other: &Action) -> bool {
        self == other || self.constituents().any(|a| a.represents(other))
    }

    /// Checks whether two distinct actions exclude each other.
    ///
    /// Two actions are mutex when they have competing needs, inconsistent
    /// effects or interfere with each other, in either direction.
    pub fn is_mutex(x: &Action, y: &Action) -> bool {
        x != y && (Self::is_mutex_directed(x, y) || Self::is_mutex_directed(y, x))
    }

    fn is_mutex_directed(x: &Action, y: &Action) -> bool {
        // competing needs
        intersects(&x.0.pre_cleared, &y.0.pre_filled)
            // inconsistent effects
            || intersects(&x.0.post_cleared, &y.0.post_filled)
            // interference
            || intersects(&x.0.pre_cleared, &y.0.post_filled)
    }

    /// A collection is composable when it is non-empty, all actions belong to
    /// the same widget and no two of them are mutex.
    pub fn is_composable<'a>(actions: impl IntoIterator<Item = &'a Action>) -> bool {
        let actions: Vec<&Action> = actions.into_iter().collect();
        let Some(first) = actions.first() else {
            return false;
        };
        actions.iter().enumerate().all(|(i, x)| {
            x.belongs_to_same_widget(first)
                && actions[i + 1..].iter().all(|y| !Self::is_mutex(x, y))
        })
    }

    /// Composes actions into a single action.
    ///
    /// A single action composes to itself. Two or more composable actions
    /// form a composite whose fields are the unions of their fields.
    ///
    /// # Errors
    /// Returns `ModelError::EmptyComposition` for no actions and
    /// `ModelError::NotComposable` if the actions are not composable.
    pub fn compose(actions: impl IntoIterator<Item = Action>) -> Result<Action> {
        let actions: BTreeSet<Action> = actions.into_iter().collect();
        let mut iter = actions.iter();
        let first = match (iter.next(), iter.next()) {
            (None, _) => return Err(ModelError::EmptyComposition),
            (Some(only), None) => return Ok(only.clone()),
            (Some(first), Some(_)) => first.clone(),
        };
        if !Self::is_composable(&actions) {
            return Err(ModelError::NotComposable);
        }

        let mut pre_conditions = PropositionSet::empty();
        let mut effects = PropositionSet::empty();
        let mut published_properties = BTreeSet::new();
        let mut realized_tasks = BTreeSet::new();
        let mut interactions = BTreeSet::new();
        for a in &actions {
            pre_conditions = pre_conditions.union(&a.0.pre_conditions)?;
            effects = effects.union(&a.0.effects)?;
            published_properties.extend(a.0.published_properties.iter().cloned());
            realized_tasks.extend(a.0.realized_tasks.iter().cloned());
            interactions.extend(a.0.interactions.iter().cloned());
        }

        Ok(Action(Arc::new(ActionData::new(
            first.0.widget.clone(),
            pre_conditions,
            effects,
            published_properties,
            realized_tasks,
            interactions,
            ActionKind::Composite(actions),
        ))))
    }

    #[allow(clippy::type_complexity)]
    fn key(
        &self,
    ) -> (
        &Widget,
        &PropositionSet,
        &PropositionSet,
        &PropositionSet,
        &BTreeSet<Property>,
        &BTreeSet<Task>,
        &BTreeSet<Interaction>,
    ) {
        let d = &self.0;
        (
            &d.widget,
            &d.pre_conditions,
            &d.effects,
            &d.post_conditions,
            &d.published_properties,
            &d.realized_tasks,
            &d.interactions,
        )
    }
}

fn intersects(a: &BTreeSet<Property>, b: &BTreeSet<Property>) -> bool {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().any(|p| large.contains(p))
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.key() == other.key()
    }
}

impl Eq for Action {}

impl PartialOrd for Action {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Action {
    fn cmp(&self, other: &Self) -> Ordering {
        if Arc::ptr_eq(&self.0, &other.0) {
            return Ordering::Equal;
        }
        self.key().cmp(&other.key())
    }
}

impl Hash for Action {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.0;
        let mut s = f.debug_struct(if self.is_composite() { "CompositeAction" } else { "Action" });
        s.field("widget", &d.widget.as_str())
            .field("pre", &d.pre_conditions.to_string())
            .field("effects", &d.effects.to_string());
        if !d.published_properties.is_empty() {
            s.field("publishes", &d.published_properties);
        }
        if !d.realized_tasks.is_empty() {
            s.field("realizes", &d.realized_tasks);
        }
        s.finish()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.0;
        write!(f, "{}[pre={}, effects={}", d.widget, d.pre_conditions, d.effects)?;
        if !d.realized_tasks.is_empty() {
            let tasks: Vec<&str> = d.realized_tasks.iter().map(Task::as_str).collect();
            write!(f, ", realizes={}", tasks.join("|"))?;
        }
        if !d.published_properties.is_empty() {
            let props: Vec<String> =
                d.published_properties.iter().map(ToString::to_string).collect();
            write!(f, ", publishes={}", props.join("|"))?;
        }
        f.write_str("]")
    }
}

/// Builder for atomic actions.
#[derive(Debug, Clone)]
pub struct ActionBuilder {
    widget: Widget,
    pre_conditions: PropositionSet,
    effects: PropositionSet,
    published_properties: BTreeSet<Property>,
    realized_tasks: BTreeSet<Task>,
    interactions: BTreeSet<Interaction>,
}

impl ActionBuilder {
    fn new(widget: Widget) -> Self {
        Self {
            widget,
            pre_conditions: PropositionSet::empty(),
            effects: PropositionSet::empty(),
            published_properties: BTreeSet::new(),
            realized_tasks: BTreeSet::new(),
            interactions: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn pre_conditions(mut self, pre_conditions: PropositionSet) -> Self {
        self.pre_conditions = pre_conditions;
        self
    }

    #[must_use]
    pub fn effects(mut self, effects: PropositionSet) -> Self {
        self.effects = effects;
        self
    }

    #[must_use]
    pub fn publishes(mut self, property: Property) -> Self {
        self.published_properties.insert(property);
        self
    }

    #[must_use]
    pub fn realizes(mut self, task: Task) -> Self {
        self.realized_tasks.insert(task);
        self
    }

    #[must_use]
    pub fn interaction(mut self, interaction: Interaction) -> Self {
        self.interactions.insert(interaction);
        self
    }

    #[must_use]
    pub fn build(self) -> Action {
        Action(Arc::new(ActionData::new(
            self.widget,
            self.pre_conditions,
            self.effects,
            self.published_properties,
            self.realized_tasks,
            self.interactions,
            ActionKind::Atomic,
        )))
    }
}
