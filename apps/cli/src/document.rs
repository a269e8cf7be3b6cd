//! JSON mashup documents.
//!
//! ```json
//! {
//!   "goal": ["share-location"],
//!   "subtypes": [{ "sub": "city", "sup": "text" }],
//!   "widgets": [
//!     {
//!       "id": "map",
//!       "actions": [
//!         {
//!           "pre": { "filled": [{ "name": "location", "type": "text" }] },
//!           "realizes": ["share-location"],
//!           "interactions": ["pick a point"]
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```

use anyhow::{Context, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use weave_models::{Action, InMemoryRepository, Interaction, Property, PropositionSet, Task, Type, Widget};
use weave_planner::Goal;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MashupDocument {
    pub goal: Vec<Task>,
    #[serde(default)]
    pub subtypes: Vec<SubtypeDocument>,
    pub widgets: Vec<WidgetDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubtypeDocument {
    pub sub: Type,
    pub sup: Type,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WidgetDocument {
    pub id: Widget,
    #[serde(default)]
    pub actions: Vec<ActionDocument>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionDocument {
    #[serde(default)]
    pub pre: PropositionsDocument,
    #[serde(default)]
    pub effects: PropositionsDocument,
    #[serde(default)]
    pub publishes: Vec<Property>,
    #[serde(default)]
    pub realizes: Vec<Task>,
    #[serde(default)]
    pub interactions: Vec<String>,
}

/// Properties required or made filled and cleared.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropositionsDocument {
    #[serde(default)]
    pub filled: Vec<Property>,
    #[serde(default)]
    pub cleared: Vec<Property>,
}

impl PropositionsDocument {
    fn to_propositions(&self) -> anyhow::Result<PropositionSet> {
        Ok(PropositionSet::from_properties(self.cleared.iter().cloned(), self.filled.iter().cloned())?)
    }
}

impl MashupDocument {
    /// Reads a document from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read mashup document: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid mashup document: {}", path.display()))
    }

    pub fn goal(&self) -> anyhow::Result<Goal> {
        Goal::new(self.goal.iter().cloned()).context("Mashup document has no goal")
    }

    /// Builds a repository holding every action of the document.
    pub fn to_repository(&self) -> anyhow::Result<InMemoryRepository> {
        let mut repository = InMemoryRepository::new();
        for subtype in &self.subtypes {
            repository.declare_subtype(subtype.sub.clone(), subtype.sup.clone());
        }
        for widget in &self.widgets {
            if widget.actions.is_empty() {
                bail!("Widget {} has no actions", widget.id);
            }
            for (index, action) in widget.actions.iter().enumerate() {
                let action = build_action(&widget.id, action)
                    .with_context(|| format!("Invalid action #{} of widget {}", index + 1, widget.id))?;
                repository.add_action(action);
            }
        }
        Ok(repository)
    }
}

fn build_action(widget: &Widget, doc: &ActionDocument) -> anyhow::Result<Action> {
    let mut builder = Action::builder(widget.clone())
        .pre_conditions(doc.pre.to_propositions()?)
        .effects(doc.effects.to_propositions()?);
    for property in &doc.publishes {
        builder = builder.publishes(property.clone());
    }
    for task in &doc.realizes {
        builder = builder.realizes(task.clone());
    }
    for instruction in &doc.interactions {
        builder = builder.interaction(Interaction::new(instruction.as_str()));
    }
    Ok(builder.build())
}
