//! Identifiers and simple value types shared by all models.
//!
//! Widgets, tasks and types are identified by non-empty strings. Properties
//! pair a name with a type, interactions carry a free-form instruction.

use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            ///
            /// # Errors
            /// Returns `ModelError::EmptyIdentifier` if `id` is empty.
            pub fn new(id: impl Into<String>) -> Result<Self> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ModelError::EmptyIdentifier($kind));
                }
                Ok(Self(id))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ModelError;

            fn try_from(value: String) -> Result<Self> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

identifier!(
    /// A widget, the owner of actions and the building block of a mashup.
    Widget,
    "widget"
);

identifier!(
    /// A capability an action may realize and a goal may ask for.
    Task,
    "task"
);

identifier!(
    /// The type of a property value.
    Type,
    "type"
);

/// A named, typed value slot whose state is tracked by propositions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Property {
    name: String,
    #[serde(rename = "type")]
    ty: Type,
}

impl Property {
    /// Creates a new property.
    ///
    /// # Errors
    /// Returns `ModelError::EmptyIdentifier` if `name` is empty.
    pub fn new(name: impl Into<String>, ty: Type) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ModelError::EmptyIdentifier("property"));
        }
        Ok(Self { name, ty })
    }

    /// Returns the property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the property type.
    pub fn ty(&self) -> &Type {
        &self.ty
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.ty)
    }
}

/// A user interaction required to perform an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interaction {
    instruction: String,
}

impl Interaction {
    #[must_use]
    pub fn new(instruction: impl Into<String>) -> Self {
        Self { instruction: instruction.into() }
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.instruction)
    }
}
