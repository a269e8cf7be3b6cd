use super::levels::{ExtensionLevel, InitialLevel, Level, LevelRef};
use super::{GraphError, Result};
use std::fmt;
use std::sync::Arc;

#[derive(PartialEq, Eq, Hash)]
enum Node {
    Initial(InitialLevel),
    Extended { base: Graph, level: ExtensionLevel, depth: usize },
}

/// An immutable chain of one initial level and zero or more extensions.
///
/// Cloning is cheap and extending shares the base graph, so a published
/// graph never changes underneath its readers.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Graph(Arc<Node>);

impl Graph {
    /// Creates a graph consisting of an initial level only.
    #[must_use]
    pub fn new(initial: InitialLevel) -> Self {
        Self(Arc::new(Node::Initial(initial)))
    }

    /// Creates a graph from an initial level and extensions, oldest first.
    ///
    /// # Errors
    /// Returns `GraphError::InsufficientExtension` if an extension requests
    /// actions its predecessor does not require.
    pub fn with_extensions(
        initial: InitialLevel,
        extensions: impl IntoIterator<Item = ExtensionLevel>,
    ) -> Result<Self> {
        extensions.into_iter().try_fold(Self::new(initial), |graph, level| graph.extend_with(level))
    }

    /// Returns a new graph with `level` appended.
    ///
    /// # Errors
    /// Returns `GraphError::InsufficientExtension` if the level requests
    /// actions not required by the current last level.
    pub fn extend_with(&self, level: ExtensionLevel) -> Result<Self> {
        if !level.can_extend_on(&self.last_level()) {
            return Err(GraphError::InsufficientExtension);
        }
        Ok(Self(Arc::new(Node::Extended {
            base: self.clone(),
            level,
            depth: self.depth() + 1,
        })))
    }

    /// Number of levels, the initial one included.
    pub fn depth(&self) -> usize {
        match &*self.0 {
            Node::Initial(_) => 1,
            Node::Extended { depth, .. } => *depth,
        }
    }

    /// Number of extension levels.
    pub fn extension_depth(&self) -> usize {
        self.depth() - 1
    }

    pub fn initial_level(&self) -> &InitialLevel {
        let mut graph = self;
        loop {
            match &*graph.0 {
                Node::Initial(level) => return level,
                Node::Extended { base, .. } => graph = base,
            }
        }
    }

    pub fn last_level(&self) -> LevelRef<'_> {
        match &*self.0 {
            Node::Initial(level) => LevelRef::Initial(level),
            Node::Extended { level, .. } => LevelRef::Extension(level),
        }
    }

    pub fn last_extension_level(&self) -> Option<&ExtensionLevel> {
        match &*self.0 {
            Node::Initial(_) => None,
            Node::Extended { level, .. } => Some(level),
        }
    }

    /// The graph this one was extended from.
    pub fn base_graph(&self) -> Option<&Graph> {
        match &*self.0 {
            Node::Initial(_) => None,
            Node::Extended { base, .. } => Some(base),
        }
    }

    /// Extension levels from the most recent to the oldest.
    pub fn extension_levels_rev(&self) -> impl Iterator<Item = &ExtensionLevel> {
        let mut current = Some(self);
        std::iter::from_fn(move || {
            let graph = current?;
            match &*graph.0 {
                Node::Initial(_) => {
                    current = None;
                    None
                }
                Node::Extended { base, level, .. } => {
                    current = Some(base);
                    Some(level)
                }
            }
        })
    }

    /// Extension levels from the oldest to the most recent.
    pub fn extension_levels(&self) -> Vec<&ExtensionLevel> {
        let mut levels: Vec<&ExtensionLevel> = self.extension_levels_rev().collect();
        levels.reverse();
        levels
    }

    /// Extension level at `index`, 0 being the oldest.
    pub fn extension_level(&self, index: usize) -> Option<&ExtensionLevel> {
        let skip = self.extension_depth().checked_sub(index + 1)?;
        self.extension_levels_rev().nth(skip)
    }

    /// Level at `position`, 0 being the initial level.
    pub fn level(&self, position: usize) -> Option<LevelRef<'_>> {
        match position {
            0 => Some(LevelRef::Initial(self.initial_level())),
            n => self.extension_level(n - 1).map(LevelRef::Extension),
        }
    }

    /// All levels, the initial level first.
    pub fn levels(&self) -> Vec<LevelRef<'_>> {
        std::iter::once(LevelRef::Initial(self.initial_level()))
            .chain(self.extension_levels().into_iter().map(LevelRef::Extension))
            .collect()
    }

    /// A graph is satisfied when its last level requires only enabled
    /// actions, so there is nothing left to extend.
    pub fn is_satisfied(&self) -> bool {
        self.last_level().is_enabled()
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        list.entry(self.initial_level());
        for level in self.extension_levels() {
            list.entry(level);
        }
        list.finish()
    }
}
